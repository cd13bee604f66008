//! In-place FFTs over flat `f32` buffers.
//!
//! Complex data is interleaved `[re0, im0, re1, im1, ...]`. Twiddle factors
//! are produced by a recurrence seeded once per butterfly pass, so no
//! trigonometric call happens inside the inner loops.

mod complex;
mod real;

pub use complex::fft_complex;
pub use real::fft_real;

/// Transform direction. `Forward` uses the kernel `e^{+2πi·jk/n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

impl Direction {
    /// Sign of the exponent: `+1` forward, `-1` inverse.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Inverse => -1.0,
        }
    }
}
