use thiserror::Error;

/// Errors raised at the configuration boundary of the equalizer.
///
/// Design and analysis themselves do not fail once the sizes are validated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EqError {
    #[error("filter length {0} must be a power of 2 and not less than 8")]
    InvalidFilterLength(usize),

    #[error("sample rate must be positive (got {0})")]
    InvalidSampleRate(u32),

    #[error("visible bin count {0} collapses the equivalent zones")]
    InvalidVisibleBinCount(usize),

    #[error("valid y range height {0} is out of range")]
    InvalidRangeHeight(i32),

    #[error("curve has {actual} points, expected {expected}")]
    CurveLength { expected: usize, actual: usize },

    #[error("visible bin {bin} is out of range (count {count})")]
    BinOutOfRange { bin: usize, count: usize },
}

pub type Result<T> = std::result::Result<T, EqError>;
