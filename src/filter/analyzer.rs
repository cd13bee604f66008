use super::{DesignContext, Workspace};
use crate::fft::{fft_real, Direction};
use crate::mapping::lerp;
use num_complex::Complex64;

/// Measures the magnitude response of `kernel` as the convolution engine is
/// assumed to see it.
///
/// Taps `0..=n/2` are weighted by `window` and the rest are zeroed, since the
/// designed kernels are centred on `n/4`. On return `workspace.magnitudes()`
/// holds bins `0..=n/2`: DC and Nyquist are the signed real values, every
/// other bin is `|X[k]|`. Returns the largest of them.
pub fn analyze(kernel: &[f32], window: &[f64], workspace: &mut Workspace) -> f32 {
    let n = kernel.len();
    let m = n >> 1;
    let tmp = workspace.scratch_mut();
    debug_assert_eq!(tmp.len(), n);
    debug_assert_eq!(window.len(), m + 1);

    for ((t, &k), &w) in tmp[..=m].iter_mut().zip(&kernel[..=m]).zip(window) {
        *t = (k as f64 * w) as f32;
    }
    tmp[m + 1..].fill(0.0);

    fft_real(tmp, n, Direction::Forward);

    //
    // Nyquist sits in slot 1 of the packed spectrum; park it until the
    // magnitudes have been compacted.
    //
    let nyquist = tmp[1];
    let mut peak = tmp[0].max(nyquist);

    for i in (2..n).step_by(2) {
        let mag = Complex64::new(tmp[i] as f64, tmp[i + 1] as f64).norm() as f32;
        tmp[i >> 1] = mag;
        if mag > peak {
            peak = mag;
        }
    }

    tmp[m] = nyquist;
    peak
}

/// Resamples a dense FFT magnitude spectrum (`n/2 + 1` bins) onto the
/// visible-bin axis, as curve pixels.
pub fn resample_to_curve(magnitudes: &[f32], ctx: &DesignContext, out: &mut [i16]) {
    let half = magnitudes.len() - 1;
    let bw = ctx.bin_width(half << 1);
    let vf = ctx.tables.visible_frequencies();
    let count = out.len();
    let last = count - 1;
    let scale = ctx.scale;
    debug_assert_eq!(count, vf.len());

    let mut i = 0;
    let mut ii = 0;

    //
    // FFT bins wider than the curve spacing: interpolate at each visible
    // frequency.
    //
    while ii < last && i < half && bw > vf[ii + 1] as f64 - vf[ii] as f64 {
        let mut freq = bw * i as f64;
        while i < half && freq + bw < vf[ii] as f64 {
            i += 1;
            freq = bw * i as f64;
        }

        let next = magnitudes[(i + 1).min(half)] as f64;
        out[ii] = scale.y_of(lerp(freq, magnitudes[i] as f64, freq + bw, next, vf[ii] as f64));
        ii += 1;
    }

    i += 1;

    //
    // Several FFT bins per visible bin: average them.
    //
    while i < half && ii < count {
        let mut sum = 0.0;
        let mut n = 0usize;

        loop {
            sum += magnitudes[i] as f64;
            n += 1;
            i += 1;
            let freq = bw * i as f64;
            if !(freq < vf[ii] as f64 && i < half) {
                break;
            }
        }

        out[ii] = scale.y_of(sum / n as f64);
        ii += 1;
    }

    //
    // Past the analyzed range: repeat the last value if the curve still lies
    // below Nyquist, otherwise there is nothing there.
    //
    let tail = if ii > 0 && (ctx.sample_rate / 2) as f64 >= vf[last] as f64 {
        out[ii - 1]
    } else {
        scale.minus_infinity_y()
    };
    out[ii..].fill(tail);
}

/// [`analyze`] followed by [`resample_to_curve`]. Returns the peak magnitude.
pub fn actual_response(
    kernel: &[f32],
    ctx: &DesignContext,
    workspace: &mut Workspace,
    out: &mut [i16],
) -> f32 {
    let peak = analyze(kernel, ctx.window, workspace);
    resample_to_curve(workspace.magnitudes(), ctx, out);
    peak
}
