use std::sync::Arc;

use crate::error::{Error, Result};
use crate::shape::Shape;

// Tensor — dense, immutable f32 array
//
// Values are stored row-major in a flat buffer behind an Arc, so cloning a
// tensor only bumps a reference count. Shape-only operations (unsqueeze,
// reshape) return a new handle over the same buffer.
//
// Every tensor handed out by the data crate is f32:
//   - images:  [1, 3, H, W]        channel-first, raw 0..255 pixel values
//   - windows: [1, WINDOW_LEN, 5]  one row of five metrics per timestep

/// An n-dimensional array of `f32` values.
///
/// # Example
/// ```
/// use loupe_core::Tensor;
///
/// let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], (2, 3)).unwrap();
/// let t = t.unsqueeze(0).unwrap();
/// assert_eq!(t.dims(), &[1, 2, 3]);
/// assert_eq!(t.get(&[0, 1, 2]).unwrap(), 6.0);
/// ```
#[derive(Clone, PartialEq)]
pub struct Tensor {
    data: Arc<[f32]>,
    shape: Shape,
}

impl std::fmt::Debug for Tensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tensor(shape={}, dtype=f32)", self.shape)
    }
}

impl Tensor {
    /// Build a tensor from a flat row-major buffer.
    pub fn from_vec(data: Vec<f32>, shape: impl Into<Shape>) -> Result<Self> {
        let shape = shape.into();
        let expected = shape.elem_count();
        if data.len() != expected {
            return Err(Error::ElementCountMismatch {
                shape,
                expected,
                got: data.len(),
            });
        }
        Ok(Tensor {
            data: data.into(),
            shape,
        })
    }

    /// A tensor filled with zeros.
    pub fn zeros(shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        Tensor {
            data: vec![0.0f32; shape.elem_count()].into(),
            shape,
        }
    }

    // Accessors

    /// The shape of this tensor.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The dimensions as a slice (shortcut for shape().dims()).
    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Total number of elements.
    pub fn elem_count(&self) -> usize {
        self.data.len()
    }

    /// The flat row-major buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.data.to_vec()
    }

    /// Read a single element by its multi-dimensional index.
    pub fn get(&self, index: &[usize]) -> Result<f32> {
        if index.len() != self.rank() {
            return Err(Error::RankMismatch {
                expected: self.rank(),
                got: index.len(),
            });
        }
        let strides = self.shape.stride_contiguous();
        let mut flat = 0usize;
        for (dim, ((&i, &size), stride)) in index
            .iter()
            .zip(self.shape.dims())
            .zip(strides)
            .enumerate()
        {
            if i >= size {
                return Err(Error::IndexOutOfBounds {
                    dim,
                    index: i,
                    size,
                });
            }
            flat += i * stride;
        }
        Ok(self.data[flat])
    }

    // Shape operations

    /// Insert a dimension of size 1 at position `dim`.
    ///
    /// `dim` may equal the current rank, which appends a trailing axis.
    pub fn unsqueeze(&self, dim: usize) -> Result<Self> {
        if dim > self.rank() {
            return Err(Error::DimOutOfRange {
                dim,
                rank: self.rank(),
            });
        }
        let mut dims = self.dims().to_vec();
        dims.insert(dim, 1);
        Ok(Tensor {
            data: Arc::clone(&self.data),
            shape: Shape::new(dims),
        })
    }

    /// View the same elements under a different shape.
    pub fn reshape(&self, new_shape: impl Into<Shape>) -> Result<Self> {
        let new_shape = new_shape.into();
        if new_shape.elem_count() != self.elem_count() {
            return Err(Error::ReshapeElementMismatch {
                src: self.elem_count(),
                dst: new_shape.elem_count(),
                dst_shape: new_shape,
            });
        }
        Ok(Tensor {
            data: Arc::clone(&self.data),
            shape: new_shape,
        })
    }
}
