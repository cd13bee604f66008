use approx::assert_abs_diff_eq;
use eqcurve::filter::WindowKind;
use eqcurve::{Channel, EqError, Equalizer, EqualizerConfig, EqualizerOptions, FilterLength};

fn equalizer(n: usize) -> Equalizer {
    Equalizer::new(EqualizerConfig::new(n).unwrap().with_sample_rate(44100)).unwrap()
}

#[test]
fn flat_curve_passes_through() {
    let mut eq = equalizer(512);
    assert_eq!(eq.zero_y(), 127);

    eq.update_filter(Channel::Left, true);
    for channel in Channel::BOTH {
        let kernel = eq.kernel(channel);
        assert_eq!(kernel.len(), 512);
        for (t, &v) in kernel.iter().enumerate() {
            let want = if t == 128 { 1.0 } else { 0.0 };
            assert_abs_diff_eq!(v, want, epsilon = 1e-5);
        }
    }

    let peak = eq.update_actual_channel_curve(Channel::Left);
    assert_abs_diff_eq!(peak, 1.0, epsilon = 1e-4);
    assert_eq!(eq.actual_curve().len(), 512);
    assert!(eq.actual_curve().iter().all(|&y| y == 127));
}

#[test]
fn reconfigure_resizes_buffers() {
    let mut eq = equalizer(512);
    eq.reconfigure(1024).unwrap();

    assert_eq!(eq.filter_length(), 1024);
    assert_eq!(eq.kernel(Channel::Left).len(), 1024);
    assert_eq!(eq.kernel(Channel::Right).len(), 1024);
    assert_abs_diff_eq!(eq.kernel(Channel::Left)[256], 1.0, epsilon = 1e-5);

    eq.update_actual_channel_curve(Channel::Right);
    assert_eq!(eq.magnitudes().len(), 513);
    assert!(eq.actual_curve().iter().all(|&y| y == 127));
}

#[test]
fn bad_filter_length_is_a_configuration_error() {
    let mut eq = equalizer(512);
    assert_eq!(eq.reconfigure(500), Err(EqError::InvalidFilterLength(500)));
    assert_eq!(eq.filter_length(), 512);
    assert_eq!(eq.kernel(Channel::Left).len(), 512);

    assert_eq!(
        EqualizerConfig::new(500).err(),
        Some(EqError::InvalidFilterLength(500))
    );
    assert!(FilterLength::new(4).is_err());
}

#[test]
fn normalized_boost_stays_below_unity() {
    let mut eq = equalizer(1024);
    eq.change_zone_y(Channel::Left, 120, 0.0);
    eq.update_filter(Channel::Left, false);
    assert!(eq.measure_peak(Channel::Left) > 10.0);

    eq.set_normalized(true);
    assert!(eq.is_normalized());
    let peak = eq.update_actual_channel_curve(Channel::Left);
    assert!(peak <= 1.0 + 1e-3, "peak {}", peak);

    // The boosted zone is still the loudest part of the response.
    let actual = eq.actual_curve();
    assert!(actual[140] < actual[400]);
}

#[test]
fn boosted_zone_shows_in_actual_curve() {
    let mut eq = equalizer(2048);
    eq.change_zone_y(Channel::Left, 200, 60.0);
    eq.update_filter(Channel::Left, true);
    eq.update_actual_channel_curve(Channel::Left);

    let actual = eq.actual_curve();
    assert!((actual[210] - 60).abs() <= 3, "got {}", actual[210]);
    assert!((actual[450] - 127).abs() <= 3, "got {}", actual[450]);
}

#[test]
fn silence_yields_no_energy() {
    let mut eq = equalizer(256);
    eq.set_normalized(true);
    let silent = vec![eq.scale().minus_infinity_y(); 512];
    eq.set_curve(Channel::Left, &silent).unwrap();
    eq.update_filter(Channel::Left, true);

    assert!(eq.kernel(Channel::Left).iter().all(|&v| v == 0.0));
    assert_eq!(eq.update_actual_channel_curve(Channel::Left), 0.0);
    assert!(eq.actual_curve().iter().all(|&y| y == 256));
}

#[test]
fn coarser_curves_and_other_windows() {
    let options = EqualizerOptions {
        visible_bin_count: 256,
        analysis_window: WindowKind::Hamming,
        ..EqualizerOptions::default()
    };
    let config = EqualizerConfig::new(512).unwrap().with_options(options);
    let mut eq = Equalizer::new(config).unwrap();

    assert_eq!(eq.visible_frequencies().len(), 256);
    assert_eq!(eq.equivalent_zones_frequency_count()[10], 256);
    assert!(eq.actual_curve().iter().all(|&y| y == 127));

    let too_few = EqualizerOptions {
        visible_bin_count: 32,
        ..EqualizerOptions::default()
    };
    assert_eq!(
        Equalizer::new(EqualizerConfig::new(512).unwrap().with_options(too_few)).err(),
        Some(EqError::InvalidVisibleBinCount(32))
    );
}
