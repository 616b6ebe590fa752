/// Convenience result type used across Tessera.
pub type TesseraResult<T> = Result<T, TesseraError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Reconciliation and promotion problems surface as [`TesseraError::Configuration`]
/// when a node is built, before any pixel is pulled. Pull-time failures from
/// format handlers surface as [`TesseraError::Codec`] and propagate
/// synchronously to the caller of `pull`.
#[derive(thiserror::Error, Debug)]
pub enum TesseraError {
    /// Unresolvable band/size mismatch, complex input where real-only is
    /// required, bad matrix shape, or an out-of-range pull rectangle.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Requested codec is not compiled into this build; carries the format
    /// name.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Propagated from a format handler's probe/read/write call, or a shared
    /// tile build that failed under another requester.
    #[error("codec error: {0}")]
    Codec(String),

    /// An unreachable format case reached kernel dispatch. This signals a
    /// build-time configuration bug (a missing promotion-table entry), not a
    /// runtime condition to recover from.
    #[error("invariant violation: {0}")]
    Invariant(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TesseraError {
    /// Build a [`TesseraError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`TesseraError::UnsupportedFormat`] value.
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Build a [`TesseraError::Codec`] value.
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Build a [`TesseraError::Invariant`] value.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            TesseraError::configuration("x")
                .to_string()
                .contains("configuration error:")
        );
        assert!(
            TesseraError::unsupported_format("tiff")
                .to_string()
                .contains("unsupported format: tiff")
        );
        assert!(
            TesseraError::codec("x")
                .to_string()
                .contains("codec error:")
        );
        assert!(
            TesseraError::invariant("x")
                .to_string()
                .contains("invariant violation:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = TesseraError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
