use super::{analyze, DesignContext, Workspace};
use crate::fft::{fft_real, Direction};
use crate::mapping::lerp;
use num_complex::Complex64;
use std::f64::consts::FRAC_PI_2;

/// What a call to [`synthesize`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Synthesis {
    /// Design passes run: 1, or 2 when the normalization pass kicked in.
    pub passes: usize,
    /// Peak of the first-pass kernel's windowed response, when normalizing.
    pub measured_peak: Option<f32>,
    /// Whether the kernel was rescaled to bring the peak down to unity.
    pub compensated: bool,
}

/// Designs a linear-phase FIR kernel whose response follows `curve`.
///
/// `kernel.len()` is the filter length and must be a power of two of at
/// least 8; `workspace` must have the same length. The kernel is written in
/// place.
pub fn synthesize(
    curve: &[i16],
    kernel: &mut [f32],
    ctx: &DesignContext,
    workspace: &mut Workspace,
) -> Synthesis {
    debug_assert_eq!(curve.len(), ctx.tables.visible_bin_count());
    debug_assert_eq!(kernel.len(), workspace.len());

    let mut report = Synthesis {
        passes: 0,
        measured_peak: None,
        compensated: false,
    };
    let mut gain = 1.0;

    loop {
        design_pass(curve, kernel, ctx, gain);
        report.passes += 1;

        if !ctx.normalized || report.compensated {
            break;
        }

        //
        // Measure what the first pass produced and redo it once, scaled.
        //
        let peak = analyze(kernel, ctx.window, workspace);
        report.measured_peak = Some(peak);

        if peak <= 0.0 {
            log::debug!("silent curve: normalization skipped");
            break;
        }
        if peak <= 1.0 {
            break;
        }

        gain = 1.0 / peak as f64;
        report.compensated = true;
    }

    log::debug!(
        "synthesized N={} in {} pass(es), peak {:?}",
        kernel.len(),
        report.passes,
        report.measured_peak
    );
    report
}

/// One uncompensated (or `gain`-scaled) design pass.
fn design_pass(curve: &[i16], kernel: &mut [f32], ctx: &DesignContext, gain: f64) {
    let n = kernel.len();

    fill_magnitudes(curve, kernel, ctx, gain);

    //
    // DC and Nyquist are purely real: just keep them at or below 0 dB.
    //
    kernel[0] = kernel[2].min(1.0);
    kernel[1] = kernel[n - 2].min(1.0);

    apply_linear_phase(kernel);
    fft_real(kernel, n, Direction::Inverse);
}

/// Writes the target magnitude of every FFT bin `1..n/2` to `kernel[2·bin]`.
fn fill_magnitudes(curve: &[i16], kernel: &mut [f32], ctx: &DesignContext, gain: f64) {
    let n = kernel.len();
    let half = n >> 1;
    let bw = ctx.bin_width(n);
    let vf = ctx.tables.visible_frequencies();
    let last = vf.len() - 1;
    let scale = ctx.scale;
    let magnitude = |y: f64| (scale.magnitude_of(y) * gain) as f32;

    let mut i = 1;
    let mut ii = 0;

    //
    // Below the first visible frequency the curve is flat.
    //
    while i < half && bw * (i as f64) < vf[0] as f64 {
        kernel[i << 1] = magnitude(curve[0] as f64);
        i += 1;
    }

    //
    // Several curve points per FFT bin: average them.
    //
    while ii < last && i < half && bw > vf[ii + 1] as f64 - vf[ii] as f64 {
        let freq = bw * i as f64;
        let mut sum = 0.0;
        let mut count = 0usize;

        loop {
            sum += curve[ii] as f64;
            count += 1;
            ii += 1;
            if !(freq > vf[ii] as f64 && ii < last) {
                break;
            }
        }

        kernel[i << 1] = magnitude(sum / count as f64);
        i += 1;
    }

    //
    // Several FFT bins per curve point: interpolate between neighbours.
    //
    while i < half {
        let freq = bw * i as f64;

        let y = if freq >= vf[last] as f64 {
            curve[last] as f64
        } else {
            while ii < last && freq > vf[ii + 1] as f64 {
                ii += 1;
            }
            let lo = ii.min(last - 1);
            lerp(
                vf[lo] as f64,
                curve[lo] as f64,
                vf[lo + 1] as f64,
                curve[lo + 1] as f64,
                freq,
            )
        };

        kernel[i << 1] = magnitude(y);
        i += 1;
    }
}

/// Polar to rectangular with phase `π/2 · bin`, which delays the impulse
/// response by `n/4` taps and centres it under the analysis window.
fn apply_linear_phase(kernel: &mut [f32]) {
    let half = kernel.len() >> 1;
    for bin in 1..half {
        let idx = bin << 1;
        let c = Complex64::from_polar(kernel[idx] as f64, FRAC_PI_2 * bin as f64);
        kernel[idx] = c.re as f32;
        kernel[idx + 1] = c.im as f32;
    }
}
