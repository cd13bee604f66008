use eqcurve::mapping::EQUIVALENT_ZONES;
use eqcurve::{Channel, Equalizer, EqualizerConfig};

// Configuration constants.
const SAMPLE_RATE: u32 = 44100; // Standard audio sample rate.
const FILTER_LENGTH: usize = 2048; // FIR length balancing resolution and latency.
const BOOSTED_ZONE: usize = 5; // 1 kHz band.

fn main() -> eqcurve::Result<()> {
    //
    // Initialize logging with default filter set to "info".
    //
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting equalizer filter design demo...");

    let config = EqualizerConfig::new(FILTER_LENGTH)?.with_sample_rate(SAMPLE_RATE);
    let mut eq = Equalizer::new(config)?;

    //
    // Boost one zone to the top of the range and cut the highest one.
    //
    let boosted = eq.tables().zone_range(BOOSTED_ZONE);
    let top = eq.tables().zone_range(EQUIVALENT_ZONES.len() - 1);
    eq.change_zone_y(Channel::Left, boosted.start, 0.0);
    eq.change_zone_y(Channel::Left, top.start, 200.0);
    eq.update_filter(Channel::Left, true);

    //
    // Compare the measured response with and without normalization.
    //
    for normalized in [false, true] {
        eq.set_normalized(normalized);
        let peak = eq.update_actual_channel_curve(Channel::Left);
        log::info!("normalized={} | peak magnitude {:.4}", normalized, peak);

        for (zone, &hz) in EQUIVALENT_ZONES.iter().enumerate() {
            let range = eq.tables().zone_range(zone);
            let mid = (range.start + range.end) / 2;
            let wanted = eq.scale().y_to_db(eq.curve(Channel::Left)[mid] as f32);
            let actual = eq.scale().y_to_db(eq.actual_curve()[mid] as f32);
            log::info!("  {:>5} Hz | drawn {:>6.1} dB | actual {:>6.1} dB", hz, wanted, actual);
        }
    }

    for channel in Channel::BOTH {
        let kernel = eq.kernel(channel);
        let (centre, tap) = kernel
            .iter()
            .enumerate()
            .fold((0, 0.0f32), |best, (i, &v)| if v.abs() > best.1.abs() { (i, v) } else { best });
        log::info!("{:?} kernel: {} taps, largest tap {:.4} at {}", channel, kernel.len(), tap, centre);
    }

    Ok(())
}
