//! Error types for the helix-filter crate.

use thiserror::Error;

/// Errors that can occur while assembling a filter payload.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A filter name has no column mapping.
    #[error("unknown filter name: {0}")]
    UnknownFilter(String),

    /// A location entry was malformed.
    #[error("invalid location: {0}")]
    InvalidLocation(String),

    /// A location spans more than the allowed region width.
    #[error(
        "location filters may not specify regions larger than 250 megabases \
         (chromosome {chromosome} spans {span} bases)"
    )]
    RegionTooWide {
        /// The offending chromosome.
        chromosome: String,
        /// The requested span in bases.
        span: i64,
    },

    /// The filter document itself was malformed.
    #[error("invalid filter input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = FilterError::UnknownFilter("favorite_color".into());
        assert_eq!(err.to_string(), "unknown filter name: favorite_color");

        let err = FilterError::RegionTooWide {
            chromosome: "1".into(),
            span: 300_000_000,
        };
        assert!(err.to_string().contains("250 megabases"));
        assert!(err.to_string().contains("300000000"));
    }
}
