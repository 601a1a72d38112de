use crate::shape::Shape;

/// All errors that can occur while building or indexing tensors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Operation requires a specific rank (number of dimensions).
    #[error("rank mismatch: expected rank {expected}, got {got}")]
    RankMismatch { expected: usize, got: usize },

    /// Dimension index out of range for the tensor's rank.
    #[error("dimension out of range: dim {dim} for tensor with {rank} dimensions")]
    DimOutOfRange { dim: usize, rank: usize },

    /// Element index outside the tensor's extent along one dimension.
    #[error("index out of bounds: index {index} on dim {dim} of size {size}")]
    IndexOutOfBounds {
        dim: usize,
        index: usize,
        size: usize,
    },

    /// Element count mismatch when creating from a vec.
    #[error("element count mismatch: shape {shape} requires {expected} elements, got {got}")]
    ElementCountMismatch {
        shape: Shape,
        expected: usize,
        got: usize,
    },

    /// Cannot reshape because element counts differ.
    #[error(
        "cannot reshape: source has {src} elements, target shape {dst_shape} has {dst} elements"
    )]
    ReshapeElementMismatch {
        src: usize,
        dst: usize,
        dst_shape: Shape,
    },
}

/// Convenience Result type used throughout loupe-core.
pub type Result<T> = std::result::Result<T, Error>;
