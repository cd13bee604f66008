//! Graphic-equalizer filter design.
//!
//! A curve drawn over a perceptual frequency axis is turned into a
//! linear-phase FIR kernel through an inverse real FFT, and the kernel's
//! actual response can be measured back onto the same axis.

pub mod config;
pub mod equalizer;
pub mod error;
pub mod fft;
pub mod filter;
pub mod mapping;

pub use config::{EqualizerConfig, EqualizerOptions, FilterLength};
pub use equalizer::{Channel, ChannelMode, Equalizer, UpdatedChannels};
pub use error::{EqError, Result};
