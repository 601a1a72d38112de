use std::path::PathBuf;

/// Errors from the collection dataset.
///
/// Nothing here is retried internally: every variant is surfaced to the
/// caller of the operation that hit it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required resource file for a collection does not exist.
    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The image file exists but could not be decoded.
    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// The time-series file exists but is not valid tabular JSON.
    #[error("failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// Catalog ordinal outside `[0, count)`.
    #[error("collection ordinal {ordinal} out of range for catalog of {count}")]
    CatalogOutOfRange { ordinal: usize, count: usize },

    /// Timestep offset outside `[0, len)` of the loaded series.
    #[error("timestep offset {offset} out of range for series of length {len}")]
    OffsetOutOfRange { offset: usize, len: usize },

    /// The cursor was asked for a collection past the end of the catalog.
    #[error("collections exhausted: requested {collection}, catalog holds {count}")]
    Exhausted { collection: usize, count: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Any other I/O failure while reading a resource.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tensor assembly failed.
    #[error(transparent)]
    Tensor(#[from] loupe_core::Error),
}

impl Error {
    /// Map an I/O error on `path`, folding "file missing" into [`Error::NotFound`].
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound { path }
        } else {
            Error::Io { path, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_maps_to_not_found() {
        let e = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            Error::io("/data/a/image.png", e),
            Error::NotFound { .. }
        ));
    }

    #[test]
    fn other_io_errors_keep_source() {
        let e = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::io("/data/a/description.txt", e);
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("description.txt"));
    }
}
