//! Index errors

use crate::dimension::DimensionId;

/// Errors from dimension management
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// Every filter bit is taken
    #[error("dimension limit reached: at most 64 dimensions per crossfilter")]
    DimensionLimit,

    /// Id does not name a dimension of this crossfilter
    #[error("unknown dimension: {0}")]
    UnknownDimension(DimensionId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_error_display() {
        assert_eq!(
            IndexError::UnknownDimension(DimensionId(3)).to_string(),
            "unknown dimension: dim#3"
        );
        assert!(IndexError::DimensionLimit.to_string().contains("64"));
    }
}
