//! Perceptual frequency axis of the curve editor.

mod scale;

pub use scale::{lerp, GainScale, MAX_DB, MAX_MAGNITUDE, MIN_DB, MIN_MAGNITUDE, ROUNDING_BIAS};

use crate::error::{EqError, Result};
use lazy_static::lazy_static;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

/// Centre frequencies (Hz) of the named equalizer zones.
pub const EQUIVALENT_ZONES: [u16; 10] = [31, 62, 125, 250, 500, 1000, 2000, 4000, 8000, 16000];

/// Curve resolution the boundary and step tables are written for.
pub const CANONICAL_BIN_COUNT: usize = 512;

/// First visible bin of each zone, plus the end sentinel.
const ZONE_BOUNDARIES: [usize; 11] = [0, 9, 18, 36, 71, 107, 177, 249, 321, 393, 512];

/// Hz between neighbouring visible bins inside each zone.
const FREQUENCY_STEPS: [f64; 10] = [5.0, 5.0, 5.0, 5.0, 10.0, 10.0, 20.0, 40.0, 80.0, 89.0];

/// Frequency of the first visible bin of each zone.
const FIRST_FREQUENCIES: [f64; 10] = [
    5.0, 50.0, 95.0, 185.0, 360.0, 720.0, 1420.0, 2860.0, 5740.0, 11498.0,
];

/// Frequency readout for one visible bin: its own frequency and the centre
/// of the zone it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyGroup {
    pub frequency: u32,
    pub zone_frequency: u16,
}

/// Visible-bin → Hz table and the zone boundaries, built once per bin count.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTables {
    visible_frequencies: Vec<f32>,
    zone_boundaries: Vec<usize>,
}

impl FrequencyTables {
    pub fn new(visible_bin_count: usize) -> Result<Self> {
        if visible_bin_count < 2 {
            return Err(EqError::InvalidVisibleBinCount(visible_bin_count));
        }

        let mut zone_boundaries = ZONE_BOUNDARIES.to_vec();
        let mut steps = FREQUENCY_STEPS;

        //
        // Rescale boundaries and step sizes for a non-canonical resolution.
        //
        if visible_bin_count != CANONICAL_BIN_COUNT {
            let ratio = visible_bin_count as f64 / CANONICAL_BIN_COUNT as f64;
            for b in zone_boundaries.iter_mut() {
                *b = (*b as f64 * ratio).round() as usize;
            }
            for s in steps.iter_mut() {
                *s /= ratio;
            }
        }

        if zone_boundaries.windows(2).any(|w| w[0] >= w[1]) {
            return Err(EqError::InvalidVisibleBinCount(visible_bin_count));
        }

        let mut visible_frequencies = Vec::with_capacity(visible_bin_count);
        let mut f = FIRST_FREQUENCIES[0];
        let mut zone = 0;

        for i in 0..visible_bin_count {
            visible_frequencies.push(f as f32);

            if zone + 1 < FIRST_FREQUENCIES.len() && i + 1 >= zone_boundaries[zone + 1] {
                zone += 1;
                f = FIRST_FREQUENCIES[zone];
            } else {
                f += steps[zone];
            }
        }

        Ok(Self {
            visible_frequencies,
            zone_boundaries,
        })
    }

    #[inline]
    pub fn visible_bin_count(&self) -> usize {
        self.visible_frequencies.len()
    }

    /// Hz for every visible bin.
    #[inline]
    pub fn visible_frequencies(&self) -> &[f32] {
        &self.visible_frequencies
    }

    /// First visible bin of every zone, followed by `visible_bin_count`.
    #[inline]
    pub fn equivalent_zones_frequency_count(&self) -> &[usize] {
        &self.zone_boundaries
    }

    /// Zone containing `bin`. Bins at or past the last one map to the last zone.
    pub fn visible_bin_to_zone_index(&self, bin: usize) -> usize {
        if bin >= self.visible_bin_count() - 1 {
            return EQUIVALENT_ZONES.len() - 1;
        }

        self.zone_boundaries
            .iter()
            .rposition(|&boundary| bin >= boundary)
            .unwrap_or(0)
    }

    pub fn visible_bin_to_frequency(&self, bin: usize) -> f32 {
        let last = self.visible_bin_count() - 1;
        self.visible_frequencies[bin.min(last)]
    }

    pub fn visible_bin_to_frequency_group(&self, bin: usize) -> FrequencyGroup {
        FrequencyGroup {
            frequency: self.visible_bin_to_frequency(bin).round() as u32,
            zone_frequency: EQUIVALENT_ZONES[self.visible_bin_to_zone_index(bin)],
        }
    }

    /// Visible bins covered by `zone`.
    pub fn zone_range(&self, zone: usize) -> Range<usize> {
        let zone = zone.min(EQUIVALENT_ZONES.len() - 1);
        self.zone_boundaries[zone]..self.zone_boundaries[zone + 1]
    }
}

lazy_static! {
    static ref TABLE_CACHE: Mutex<HashMap<usize, Arc<FrequencyTables>>> =
        Mutex::new(HashMap::new());
}

/// Returns the tables for `visible_bin_count`, building them on first use.
pub fn find_tables(visible_bin_count: usize) -> Result<Arc<FrequencyTables>> {
    // Cached table lookup.
    {
        let cache = TABLE_CACHE.lock();
        if let Some(tables) = cache.get(&visible_bin_count) {
            log::trace!("frequency tables for {} bins: cache hit", visible_bin_count);
            return Ok(tables.clone());
        }
    }

    let tables = Arc::new(FrequencyTables::new(visible_bin_count)?);

    let mut cache = TABLE_CACHE.lock();
    cache.insert(visible_bin_count, tables.clone());
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_table_walk() {
        let t = FrequencyTables::new(512).unwrap();
        let vf = t.visible_frequencies();

        assert_eq!(vf.len(), 512);
        assert_eq!(&vf[..10], &[5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0]);
        assert_eq!(vf[9], 50.0);
        assert_eq!(vf[393], 11498.0);
        assert_eq!(vf[511], 22000.0);
        assert_eq!(t.equivalent_zones_frequency_count(), &ZONE_BOUNDARIES);
    }

    #[test]
    fn tables_are_monotonic() {
        for count in [64, 128, 256, 512, 1000, 1024] {
            let t = FrequencyTables::new(count).unwrap();
            assert!(t.visible_frequencies().windows(2).all(|w| w[0] <= w[1]));

            let z = t.equivalent_zones_frequency_count();
            assert_eq!(z.len(), EQUIVALENT_ZONES.len() + 1);
            assert_eq!(*z.last().unwrap(), count);
            assert!(z.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn rescaled_boundaries() {
        let t = FrequencyTables::new(256).unwrap();
        assert_eq!(
            t.equivalent_zones_frequency_count(),
            &[0, 5, 9, 18, 36, 54, 89, 125, 161, 197, 256]
        );
        assert_eq!(&t.visible_frequencies()[..6], &[5.0, 15.0, 25.0, 35.0, 45.0, 50.0]);
        assert_eq!(t.visible_frequencies()[255], 21822.0);
    }

    #[test]
    fn collapsed_zones_are_rejected() {
        assert_eq!(
            FrequencyTables::new(32),
            Err(EqError::InvalidVisibleBinCount(32))
        );
        assert!(FrequencyTables::new(1).is_err());
    }

    #[test]
    fn zone_lookup() {
        let t = FrequencyTables::new(512).unwrap();
        assert_eq!(t.visible_bin_to_zone_index(0), 0);
        assert_eq!(t.visible_bin_to_zone_index(8), 0);
        assert_eq!(t.visible_bin_to_zone_index(9), 1);
        assert_eq!(t.visible_bin_to_zone_index(106), 4);
        assert_eq!(t.visible_bin_to_zone_index(107), 5);
        assert_eq!(t.visible_bin_to_zone_index(510), 9);
        assert_eq!(t.visible_bin_to_zone_index(511), 9);
        assert_eq!(t.visible_bin_to_zone_index(4000), 9);
        assert_eq!(t.zone_range(5), 107..177);
    }

    #[test]
    fn frequency_group_readout() {
        let t = FrequencyTables::new(512).unwrap();
        assert_eq!(
            t.visible_bin_to_frequency_group(9),
            FrequencyGroup {
                frequency: 50,
                zone_frequency: 62
            }
        );
        assert_eq!(t.visible_bin_to_frequency(10_000), 22000.0);
        assert_eq!(t.visible_bin_to_frequency_group(600).zone_frequency, 16000);
    }

    #[test]
    fn cache_shares_tables() {
        let a = find_tables(384).unwrap();
        let b = find_tables(384).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
