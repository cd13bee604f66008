use super::{fft_complex, Direction};
use std::f64::consts::PI;

/// Real-input FFT of `n` samples, computed through one `n/2` complex FFT.
///
/// Spectrum packing (forward output, inverse input):
///
/// | index        | value                |
/// |--------------|----------------------|
/// | `0`          | Re(bin 0)            |
/// | `1`          | Re(bin n/2)          |
/// | `2k`, `2k+1` | Re, Im of bin `k`    |
///
/// The forward transform is unscaled. The inverse applies `2/n` so that a
/// forward/inverse pair reproduces the input.
pub fn fft_real(data: &mut [f32], n: usize, direction: Direction) {
    let half = n >> 1;
    let n4 = n >> 2;
    let mut theta = PI / half as f64;

    let c2 = match direction {
        Direction::Forward => {
            fft_complex(data, half, Direction::Forward);
            -0.5
        }
        Direction::Inverse => {
            theta = -theta;
            0.5
        }
    };

    let mut wpr = (0.5 * theta).sin();
    wpr *= -2.0 * wpr;
    let wpi = theta.sin();
    let mut wr = 1.0 + wpr;
    let mut wi = wpi;

    //
    // Separate the two interleaved half-length spectra, bins k and n/2 - k
    // at a time.
    //
    for i in 1..n4 {
        let i1 = i << 1;
        let i2 = i1 + 1;
        let i3 = n - i1;
        let i4 = i3 + 1;

        let d1 = data[i1] as f64;
        let d2 = data[i2] as f64;
        let d3 = data[i3] as f64;
        let d4 = data[i4] as f64;

        let h1r = 0.5 * (d1 + d3);
        let h1i = 0.5 * (d2 - d4);
        let h2r = -c2 * (d2 + d4);
        let h2i = c2 * (d1 - d3);

        let rr = wr * h2r;
        let ii = wi * h2i;
        let ri = wr * h2i;
        let ir = wi * h2r;

        data[i1] = (h1r + rr - ii) as f32;
        data[i2] = (h1i + ri + ir) as f32;
        data[i3] = (h1r - rr + ii) as f32;
        data[i4] = (ri + ir - h1i) as f32;

        let t = wr;
        wr += t * wpr - wi * wpi;
        wi += wi * wpr + t * wpi;
    }

    match direction {
        Direction::Forward => {
            //
            // DC and Nyquist are both real; pack them into the first pair.
            //
            let h1r = data[0];
            data[0] = h1r + data[1];
            data[1] = h1r - data[1];
        }
        Direction::Inverse => {
            let h1r = data[0] as f64;
            let nyquist = data[1] as f64;
            data[0] = (0.5 * (h1r + nyquist)) as f32;
            data[1] = (0.5 * (h1r - nyquist)) as f32;

            fft_complex(data, half, Direction::Inverse);

            let scale = 2.0 / n as f64;
            for v in data[..n].iter_mut() {
                *v = (*v as f64 * scale) as f32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use num_complex::Complex64;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_real(n: usize, seed: u64) -> Vec<f32> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n).map(|_| rng.random_range(-1.0..1.0)).collect()
    }

    /// Bin `k` of the forward transform, computed directly.
    fn direct_bin(signal: &[f32], k: usize) -> Complex64 {
        let n = signal.len();
        signal
            .iter()
            .enumerate()
            .map(|(j, &x)| {
                let angle = 2.0 * PI * (j * k) as f64 / n as f64;
                Complex64::from_polar(x as f64, angle)
            })
            .sum()
    }

    #[test]
    fn round_trip_reconstructs_signal() {
        for n in [8, 16, 64, 1024] {
            let original = random_real(n, n as u64);
            let mut data = original.clone();

            fft_real(&mut data, n, Direction::Forward);
            fft_real(&mut data, n, Direction::Inverse);

            for (got, want) in data.iter().zip(&original) {
                assert_abs_diff_eq!(*got, *want, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn forward_matches_packed_layout() {
        let n = 32;
        let signal = random_real(n, 3);
        let mut data = signal.clone();
        fft_real(&mut data, n, Direction::Forward);

        assert_abs_diff_eq!(data[0] as f64, direct_bin(&signal, 0).re, epsilon = 1e-4);
        assert_abs_diff_eq!(data[1] as f64, direct_bin(&signal, n / 2).re, epsilon = 1e-4);

        for k in 1..n / 2 {
            let want = direct_bin(&signal, k);
            assert_abs_diff_eq!(data[2 * k] as f64, want.re, epsilon = 1e-4);
            assert_abs_diff_eq!(data[2 * k + 1] as f64, want.im, epsilon = 1e-4);
        }
    }

    #[test]
    fn impulse_has_flat_spectrum() {
        let n = 8;
        let mut data = vec![0.0f32; n];
        data[0] = 1.0;
        fft_real(&mut data, n, Direction::Forward);
        assert_eq!(data, vec![1.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn inverse_of_flat_spectrum_is_impulse() {
        let n = 16;
        let mut data = vec![0.0f32; n];
        data[0] = 1.0;
        data[1] = 1.0;
        for k in 1..n / 2 {
            data[2 * k] = 1.0;
        }
        fft_real(&mut data, n, Direction::Inverse);

        assert_abs_diff_eq!(data[0], 1.0, epsilon = 1e-6);
        for v in &data[1..] {
            assert_abs_diff_eq!(*v, 0.0, epsilon = 1e-6);
        }
    }
}
