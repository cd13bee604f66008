use crate::config::FilterLength;
use lazy_static::lazy_static;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::Arc;

/// Window assumed by the convolution engine when measuring a kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowKind {
    #[default]
    Blackman,
    Hann,
    Hamming,
}

impl WindowKind {
    /// Weight of tap `i` in a window spanning `0..=m`.
    pub fn weight(self, i: usize, m: usize) -> f64 {
        let x = 2.0 * PI * i as f64 / m as f64;
        match self {
            WindowKind::Blackman => 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos(),
            WindowKind::Hann => 0.5 - 0.5 * x.cos(),
            WindowKind::Hamming => 0.54 - 0.46 * x.cos(),
        }
    }

    /// Builds the window over the first half of a kernel (`n/2 + 1` taps).
    pub fn build(self, filter_length: FilterLength) -> Vec<f64> {
        let m = filter_length.get() >> 1;
        (0..=m).map(|i| self.weight(i, m)).collect()
    }
}

lazy_static! {
    static ref WINDOW_CACHE: Mutex<HashMap<(WindowKind, FilterLength), Arc<[f64]>>> =
        Mutex::new(HashMap::new());
}

/// Returns the analysis window for `filter_length`, building it on first use.
pub fn find_window(kind: WindowKind, filter_length: FilterLength) -> Arc<[f64]> {
    let key = (kind, filter_length);

    // Cached window lookup.
    {
        let cache = WINDOW_CACHE.lock();
        if let Some(window) = cache.get(&key) {
            log::trace!("{:?} window for N={}: cache hit", kind, filter_length.get());
            return window.clone();
        }
    }

    let window: Arc<[f64]> = kind.build(filter_length).into();

    let mut cache = WINDOW_CACHE.lock();
    cache.insert(key, window.clone());
    window
}
