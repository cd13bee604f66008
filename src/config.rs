use crate::error::{EqError, Result};
use crate::filter::WindowKind;

/// Default sample rate used when the host does not report one.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
/// Smallest filter length the real FFT split step supports.
pub const MIN_FILTER_LENGTH: usize = 8;

/// A validated FIR length: a power of two, at least [`MIN_FILTER_LENGTH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterLength(usize);

impl FilterLength {
    pub fn new(n: usize) -> Result<Self> {
        if n < MIN_FILTER_LENGTH || !n.is_power_of_two() {
            return Err(EqError::InvalidFilterLength(n));
        }
        Ok(Self(n))
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }

    /// Number of distinct FFT bins, DC and Nyquist included.
    #[inline]
    pub fn bin_count(self) -> usize {
        (self.0 >> 1) + 1
    }
}

impl TryFrom<usize> for FilterLength {
    type Error = EqError;

    fn try_from(n: usize) -> Result<Self> {
        Self::new(n)
    }
}

/// Curve resolution and pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EqualizerOptions {
    /// Pixel height mapped to the ±40 dB range.
    pub valid_y_range_height: i32,
    /// Number of points on the user-facing curve.
    pub visible_bin_count: usize,
    /// Window assumed when measuring the actual response.
    pub analysis_window: WindowKind,
}

impl Default for EqualizerOptions {
    fn default() -> Self {
        Self {
            valid_y_range_height: 255,
            visible_bin_count: 512,
            analysis_window: WindowKind::Blackman,
        }
    }
}

/// Everything needed to build an [`Equalizer`](crate::Equalizer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EqualizerConfig {
    pub filter_length: FilterLength,
    pub sample_rate: u32,
    pub normalized: bool,
    pub options: EqualizerOptions,
}

impl EqualizerConfig {
    pub fn new(filter_length: usize) -> Result<Self> {
        Ok(Self {
            filter_length: FilterLength::new(filter_length)?,
            sample_rate: DEFAULT_SAMPLE_RATE,
            normalized: false,
            options: EqualizerOptions::default(),
        })
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    pub fn with_options(mut self, options: EqualizerOptions) -> Self {
        self.options = options;
        self
    }

    /// Checks the fields that [`FilterLength`] does not cover.
    ///
    /// Zone collapse for small bin counts is detected when the frequency
    /// tables are built.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(EqError::InvalidSampleRate(self.sample_rate));
        }

        // Pixels are stored as i16 and the sentinel sits one past the range.
        let height = self.options.valid_y_range_height;
        if height < 2 || height >= i16::MAX as i32 {
            return Err(EqError::InvalidRangeHeight(height));
        }

        if self.options.visible_bin_count < 2 {
            return Err(EqError::InvalidVisibleBinCount(
                self.options.visible_bin_count,
            ));
        }
        Ok(())
    }
}
