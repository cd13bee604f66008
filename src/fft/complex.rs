use super::Direction;
use std::f64::consts::PI;

/// Butterfly column with twiddle `1`.
#[inline(always)]
fn butterfly_unit(data: &mut [f32], offset: usize, mmax: usize, istep: usize) {
    let nn = data.len();
    let mut a = offset;
    while a < nn {
        let b = a + mmax;
        let tempr = data[b];
        let tempi = data[b + 1];
        data[b] = data[a] - tempr;
        data[b + 1] = data[a + 1] - tempi;
        data[a] += tempr;
        data[a + 1] += tempi;
        a += istep;
    }
}

/// Butterfly column with twiddle `±i`.
#[inline(always)]
fn butterfly_quarter(
    data: &mut [f32],
    offset: usize,
    mmax: usize,
    istep: usize,
    direction: Direction,
) {
    let nn = data.len();
    let mut a = offset;
    while a < nn {
        let b = a + mmax;
        let (tempr, tempi) = match direction {
            Direction::Forward => (-data[b + 1], data[b]),
            Direction::Inverse => (data[b + 1], -data[b]),
        };
        data[b] = data[a] - tempr;
        data[b + 1] = data[a + 1] - tempi;
        data[a] += tempr;
        data[a + 1] += tempi;
        a += istep;
    }
}

/// Butterfly column with a general twiddle `wr + i·wi`.
#[inline(always)]
fn butterfly(data: &mut [f32], offset: usize, mmax: usize, istep: usize, wr: f64, wi: f64) {
    let nn = data.len();
    let mut a = offset;
    while a < nn {
        let b = a + mmax;
        let dr = data[b] as f64;
        let di = data[b + 1] as f64;
        let tempr = wr * dr - wi * di;
        let tempi = wr * di + wi * dr;
        data[b] = (data[a] as f64 - tempr) as f32;
        data[b + 1] = (data[a + 1] as f64 - tempi) as f32;
        data[a] = (data[a] as f64 + tempr) as f32;
        data[a + 1] = (data[a + 1] as f64 + tempi) as f32;
        a += istep;
    }
}

/// In-place bit-reversal permutation of `n` interleaved complex samples.
fn bit_reverse(data: &mut [f32], n: usize) {
    let nn = n << 1;
    let mut j = 0;
    let mut i = 0;
    while i < nn {
        if j > i {
            data.swap(j, i);
            data.swap(j + 1, i + 1);
        }

        //
        // Propagate the carry from the top bit downwards.
        //
        let mut m = n;
        while m >= 2 && j + 1 > m {
            j -= m;
            m >>= 1;
        }
        j += m;
        i += 2;
    }
}

/// Complex decimation-in-time FFT over `n` interleaved samples (`2n` floats).
///
/// `n` must be a power of two. No scaling is applied in either direction.
pub fn fft_complex(data: &mut [f32], n: usize, direction: Direction) {
    let nn = n << 1;
    let data = &mut data[..nn];

    bit_reverse(data, n);

    //
    // mmax = 2: every twiddle is 1.
    //
    if nn > 2 {
        butterfly_unit(data, 0, 2, 4);
    }

    //
    // mmax = 4: twiddles 1 and ±i.
    //
    if nn > 4 {
        butterfly_unit(data, 0, 4, 8);
        butterfly_quarter(data, 2, 4, 8, direction);
    }

    let mut mmax = 8;
    let mut theta = direction.sign() * PI * 0.25;

    while nn > mmax {
        let istep = mmax << 1;
        let wpi = theta.sin();
        theta *= 0.5;
        let mut wpr = theta.sin();
        wpr *= -2.0 * wpr;

        //
        // First column of the pass: wr = 1, wi = 0.
        //
        butterfly_unit(data, 0, mmax, istep);

        let mut wr = 1.0 + wpr;
        let mut wi = wpi;
        let half = mmax >> 1;

        let mut offset = 2;
        while offset < half {
            butterfly(data, offset, mmax, istep, wr, wi);
            let t = wr;
            wr += t * wpr - wi * wpi;
            wi += wi * wpr + t * wpi;
            offset += 2;
        }

        //
        // Middle column: wr = 0, wi = sign.
        //
        butterfly_quarter(data, half, mmax, istep, direction);
        match direction {
            Direction::Forward => {
                wr = -wpi;
                wi = 1.0 + wpr;
            }
            Direction::Inverse => {
                wr = wpi;
                wi = -1.0 - wpr;
            }
        }

        offset = half + 2;
        while offset < mmax {
            butterfly(data, offset, mmax, istep, wr, wi);
            let t = wr;
            wr += t * wpr - wi * wpi;
            wi += wi * wpr + t * wpi;
            offset += 2;
        }

        mmax = istep;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use num_complex::Complex64;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Direct O(n²) DFT with the same sign convention.
    fn naive_dft(input: &[Complex64], direction: Direction) -> Vec<Complex64> {
        let n = input.len();
        (0..n)
            .map(|k| {
                input
                    .iter()
                    .enumerate()
                    .map(|(j, &x)| {
                        let angle = direction.sign() * 2.0 * PI * (j * k) as f64 / n as f64;
                        x * Complex64::from_polar(1.0, angle)
                    })
                    .sum()
            })
            .collect()
    }

    fn random_signal(n: usize, seed: u64) -> Vec<f32> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..2 * n).map(|_| rng.random_range(-1.0..1.0)).collect()
    }

    fn interleaved_to_complex(data: &[f32]) -> Vec<Complex64> {
        data.chunks_exact(2)
            .map(|c| Complex64::new(c[0] as f64, c[1] as f64))
            .collect()
    }

    #[test]
    fn matches_direct_dft() {
        for n in [1, 2, 4, 8, 16, 32, 128] {
            for direction in [Direction::Forward, Direction::Inverse] {
                let mut data = random_signal(n, n as u64);
                let expected = naive_dft(&interleaved_to_complex(&data), direction);

                fft_complex(&mut data, n, direction);

                for (got, want) in interleaved_to_complex(&data).iter().zip(&expected) {
                    assert_abs_diff_eq!(got.re, want.re, epsilon = 1e-4);
                    assert_abs_diff_eq!(got.im, want.im, epsilon = 1e-4);
                }
            }
        }
    }

    #[test]
    fn impulse_spreads_flat() {
        let n = 16;
        let mut data = vec![0.0f32; 2 * n];
        data[0] = 1.0;
        fft_complex(&mut data, n, Direction::Forward);
        for bin in data.chunks_exact(2) {
            assert_abs_diff_eq!(bin[0], 1.0, epsilon = 1e-6);
            assert_abs_diff_eq!(bin[1], 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn forward_sign_is_positive() {
        // x[1] = 1 gives X[k] = e^{+2πik/n}.
        let n = 8;
        let mut data = vec![0.0f32; 2 * n];
        data[2] = 1.0;
        fft_complex(&mut data, n, Direction::Forward);
        let half = std::f32::consts::FRAC_1_SQRT_2;
        assert_abs_diff_eq!(data[2], half, epsilon = 1e-6);
        assert_abs_diff_eq!(data[3], half, epsilon = 1e-6);
    }

    #[test]
    fn parseval_holds() {
        let n = 256;
        let mut data = random_signal(n, 7);
        let time_energy: f64 = data.iter().map(|&v| (v as f64) * (v as f64)).sum();

        fft_complex(&mut data, n, Direction::Forward);
        let freq_energy: f64 = data.iter().map(|&v| (v as f64) * (v as f64)).sum();

        assert_abs_diff_eq!(time_energy, freq_energy / n as f64, epsilon = 1e-3);
    }

    #[test]
    fn inverse_undoes_forward_up_to_n() {
        let n = 64;
        let original = random_signal(n, 99);
        let mut data = original.clone();

        fft_complex(&mut data, n, Direction::Forward);
        fft_complex(&mut data, n, Direction::Inverse);

        for (got, want) in data.iter().zip(&original) {
            assert_abs_diff_eq!(*got / n as f32, *want, epsilon = 1e-5);
        }
    }

    #[test]
    fn ignores_trailing_floats() {
        let n = 4;
        let mut data = vec![0.0f32; 2 * n + 3];
        data[0] = 1.0;
        data[2 * n] = 42.0;
        fft_complex(&mut data, n, Direction::Forward);
        assert_eq!(data[2 * n], 42.0);
    }
}
