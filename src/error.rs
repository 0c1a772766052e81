//! Grid calculation errors
//!
//! Name resolution never fails, so only the nudge calculator and the
//! token assembler report through this type.

/// Errors raised while turning elements into tokens
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// The family's font has not been loaded (or yielded no metrics).
    /// `family` is `None` when the calculator is called without a family.
    #[error(
        "font metrics unavailable{}; load the font first",
        family.as_deref().map(|f| format!(" for family \"{}\"", f)).unwrap_or_default()
    )]
    MetricsUnavailable { family: Option<String> },

    /// An element references a family that was never configured
    #[error("unknown font family \"{family}\" (available: {})", available.join(", "))]
    UnknownFontFamily {
        family: String,
        available: Vec<String>,
    },

    /// A size that must be positive and finite was not
    #[error("{what} must be a positive number, got {value}")]
    InvalidDimension { what: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_family_lists_available() {
        let err = GridError::UnknownFontFamily {
            family: "mono".to_string(),
            available: vec!["sans".to_string(), "serif".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "unknown font family \"mono\" (available: sans, serif)"
        );
    }

    #[test]
    fn test_metrics_unavailable_message() {
        let named = GridError::MetricsUnavailable {
            family: Some("serif".to_string()),
        };
        assert_eq!(
            named.to_string(),
            "font metrics unavailable for family \"serif\"; load the font first"
        );
        let bare = GridError::MetricsUnavailable { family: None };
        assert_eq!(bare.to_string(), "font metrics unavailable; load the font first");
    }
}
