//! # loupe-core
//!
//! Shape and tensor primitives shared by the loupe crates.
//!
//! This crate provides:
//! - [`Shape`] — n-dimensional shape with row-major strides
//! - [`Tensor`] — dense, immutable f32 array with cheap clones
//! - [`Error`] / [`Result`] — shape and indexing failures

pub mod error;
pub mod shape;
pub mod tensor;

pub use error::{Error, Result};
pub use shape::Shape;
pub use tensor::Tensor;
