//! FIR design from a gain curve, and measurement of the result.

mod analyzer;
mod synth;
mod window;

pub use analyzer::{actual_response, analyze, resample_to_curve};
pub use synth::{synthesize, Synthesis};
pub use window::{find_window, WindowKind};

use crate::config::FilterLength;
use crate::mapping::{FrequencyTables, GainScale};

/// Read-only inputs shared by synthesis and analysis.
#[derive(Debug, Clone, Copy)]
pub struct DesignContext<'a> {
    pub tables: &'a FrequencyTables,
    pub scale: GainScale,
    pub sample_rate: u32,
    pub normalized: bool,
    /// Analysis window over taps `0..=n/2`.
    pub window: &'a [f64],
}

impl DesignContext<'_> {
    /// Hz between neighbouring FFT bins for a kernel of `n` taps.
    #[inline]
    pub fn bin_width(&self, n: usize) -> f64 {
        self.sample_rate as f64 / n as f64
    }
}

/// Scratch buffer for the forward transform done during analysis.
///
/// Sized to the filter length; after [`analyze`] its first `n/2 + 1` entries
/// hold the magnitude spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    scratch: Vec<f32>,
}

impl Workspace {
    pub fn new(filter_length: FilterLength) -> Self {
        Self {
            scratch: vec![0.0; filter_length.get()],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.scratch.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scratch.is_empty()
    }

    /// Magnitudes of bins `0..=n/2` from the last analysis.
    pub fn magnitudes(&self) -> &[f32] {
        &self.scratch[..=self.scratch.len() >> 1]
    }

    #[inline]
    pub(crate) fn scratch_mut(&mut self) -> &mut [f32] {
        &mut self.scratch
    }
}
