use num_traits::Float;
use std::f64::consts::LN_10;

/// Gain at the top of the curve area.
pub const MAX_DB: f64 = 40.0;
/// Gain at the bottom of the valid range (just above the −∞ sentinel).
pub const MIN_DB: f64 = -40.0;
/// `10^(MAX_DB / 20)`.
pub const MAX_MAGNITUDE: f64 = 100.0;
/// `10^(MIN_DB / 20)`.
pub const MIN_MAGNITUDE: f64 = 0.01;
/// Offset subtracted before rounding in [`GainScale::magnitude_to_y`] so that
/// it inverts [`GainScale::y_to_magnitude`] on integer pixels.
pub const ROUNDING_BIAS: f64 = 0.4;

/// Linear interpolation through `(x0, y0)` and `(x1, y1)`, evaluated at `x`.
#[inline]
pub fn lerp<T: Float>(x0: T, y0: T, x1: T, y1: T, x: T) -> T {
    (x - x0) * (y1 - y0) / (x1 - x0) + y0
}

/// Mapping between curve pixels (y grows downwards), dB and linear magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GainScale {
    valid_y_range_height: i32,
}

impl GainScale {
    pub fn new(valid_y_range_height: i32) -> Self {
        Self {
            valid_y_range_height,
        }
    }

    #[inline]
    pub fn valid_y_range_height(&self) -> i32 {
        self.valid_y_range_height
    }

    /// Top pixel (+40 dB).
    #[inline]
    pub fn max_y(&self) -> i16 {
        0
    }

    /// Lowest pixel that still has a finite gain (−40 dB).
    #[inline]
    pub fn min_y(&self) -> i16 {
        (self.valid_y_range_height - 1) as i16
    }

    /// The 0 dB line.
    #[inline]
    pub fn zero_y(&self) -> i16 {
        (self.valid_y_range_height >> 1) as i16
    }

    /// Sentinel for silence.
    #[inline]
    pub fn minus_infinity_y(&self) -> i16 {
        (self.valid_y_range_height + 1) as i16
    }

    /// Snaps a raw pointer position to a storable curve value.
    pub fn clamp_y(&self, y: f32) -> i16 {
        if y <= self.max_y() as f32 {
            self.max_y()
        } else if y > self.min_y() as f32 {
            self.minus_infinity_y()
        } else {
            y as i16
        }
    }

    pub fn y_to_db(&self, y: f32) -> f32 {
        let (max_y, min_y) = (self.max_y() as f64, self.min_y() as f64);
        let y = y as f64;

        if y <= max_y {
            MAX_DB as f32
        } else if y > min_y {
            f32::NEG_INFINITY
        } else {
            lerp(max_y, MAX_DB, min_y, MIN_DB, y) as f32
        }
    }

    pub fn y_to_magnitude(&self, y: f32) -> f32 {
        self.magnitude_of(y as f64) as f32
    }

    /// [`y_to_magnitude`](Self::y_to_magnitude) on an averaged or
    /// interpolated pixel value, kept in double precision.
    pub(crate) fn magnitude_of(&self, y: f64) -> f64 {
        let (max_y, min_y) = (self.max_y() as f64, self.min_y() as f64);

        if y <= max_y {
            MAX_MAGNITUDE
        } else if y > min_y {
            0.0
        } else {
            // 10^(dB/20), with ±40 dB spanning exponents ±2.
            (lerp(max_y, MAX_DB / 20.0, min_y, MIN_DB / 20.0, y) * LN_10).exp()
        }
    }

    pub fn magnitude_to_y(&self, magnitude: f32) -> i16 {
        self.y_of(magnitude as f64)
    }

    pub(crate) fn y_of(&self, magnitude: f64) -> i16 {
        if magnitude >= MAX_MAGNITUDE {
            self.max_y()
        } else if magnitude < MIN_MAGNITUDE {
            self.minus_infinity_y()
        } else {
            let zero = self.zero_y() as f64;
            let y = zero - zero * magnitude.log10() * 0.5 - ROUNDING_BIAS;
            (y + 0.5).floor() as i16
        }
    }
}
