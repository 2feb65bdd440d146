//! # Backend Abstraction
//!
//! Trait-based abstraction over computation backends, enabling the model
//! and preprocessing code to run against different tensor implementations
//! without changes.
//!
//! ## Design
//!
//! - **Minimal trait surface**: only the operations the regression network
//!   and the normalizer actually need are exposed.
//! - **Zero-cost generics**: backend selection happens at compile time via
//!   type parameters; there is no runtime dispatch.
//! - **Type-safe tensor handling**: the [`Scalar`], [`Tensor1D`] and
//!   [`Tensor2D`] wrappers carry their backend as a phantom parameter, so
//!   tensors from different backends cannot be mixed.
//! - **Feature-gated implementations**: backends are enabled via Cargo
//!   features (`cpu`, `ndarray`).
//!
//! | Backend          | Feature   | Use case                           |
//! |------------------|-----------|------------------------------------|
//! | `CpuBackend`     | `cpu`     | Default, pure-Rust implementation  |
//! | `NdarrayBackend` | `ndarray` | Interop with the `ndarray` crate   |

#[cfg(feature = "cpu")]
pub mod cpu;
#[cfg(feature = "cpu")]
pub use cpu::{CpuBackend, CpuTensor2D};

#[cfg(feature = "ndarray")]
mod ndarray_backend;
#[cfg(feature = "ndarray")]
pub use ndarray_backend::NdarrayBackend;

/// Scalar value representation and arithmetic operations.
pub mod scalar;
/// One-dimensional tensor abstraction.
pub mod tensor1d;
/// Two-dimensional tensor abstraction.
pub mod tensor2d;

pub use scalar::{Scalar, ScalarOps};
pub use tensor1d::Tensor1D;
pub use tensor2d::Tensor2D;

/// Abstraction over tensor storage and the numeric operations the
/// regression network needs.
///
/// All 2D tensors are row-major with shape `(rows, cols)`. Checked
/// operations panic on shape mismatch; shape validation at the API
/// boundary happens before tensors are built, so a mismatch here is a
/// programming error rather than bad input.
pub trait Backend: Clone + Copy + 'static {
    /// Scalar type supporting arithmetic operations.
    type Scalar: ScalarOps;

    /// One-dimensional tensor type.
    type Tensor1D: Clone + Send + Sync;

    /// Two-dimensional tensor type.
    type Tensor2D: Clone + Send + Sync;

    // --- Constructors ---

    /// Creates a 1D tensor filled with zeros of given length.
    fn zeros_1d(len: usize) -> Self::Tensor1D;

    /// Creates a 2D tensor filled with zeros of given dimensions.
    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D;

    /// Constructs a 1D tensor from owned data.
    fn from_vec_1d(data: Vec<f32>) -> Self::Tensor1D;

    /// Constructs a 2D tensor from row-major ordered data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    fn from_vec_2d(data: Vec<f32>, rows: usize, cols: usize) -> Self::Tensor2D;

    // --- Element-wise operations ---

    /// Element-wise addition of two 1D tensors.
    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// Element-wise subtraction of two 1D tensors.
    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// Element-wise multiplication of two 1D tensors.
    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// Multiplies each element of a 1D tensor by a scalar.
    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D;

    /// Adds a scalar to each element of a 1D tensor.
    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D;

    /// Element-wise addition of two 2D tensors.
    fn add_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D;

    /// Element-wise multiplication of two 2D tensors.
    fn mul_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D;

    /// Multiplies each element of a 2D tensor by a scalar.
    fn mul_scalar_2d(t: &Self::Tensor2D, s: &Self::Scalar) -> Self::Tensor2D;

    /// Adds a scalar to each element of a 2D tensor.
    fn add_scalar_2d(t: &Self::Tensor2D, s: &Self::Scalar) -> Self::Tensor2D;

    // --- Reductions ---

    /// Sum of all elements in a 1D tensor.
    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar;

    /// Arithmetic mean of all elements in a 1D tensor.
    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar;

    /// Minimum over all elements of a 1D tensor.
    fn min_all_1d(t: &Self::Tensor1D) -> Self::Scalar;

    /// Maximum over all elements of a 1D tensor.
    fn max_all_1d(t: &Self::Tensor1D) -> Self::Scalar;

    /// Minimum over all elements of a 2D tensor, not per column.
    fn min_all_2d(t: &Self::Tensor2D) -> Self::Scalar;

    /// Maximum over all elements of a 2D tensor, not per column.
    fn max_all_2d(t: &Self::Tensor2D) -> Self::Scalar;

    /// Sum of each column in a 2D tensor; returns a tensor of length `cols`.
    fn col_sum_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    // --- Linear algebra ---

    /// Matrix product `A * B` where `A` is `(m, k)` and `B` is `(k, n)`.
    ///
    /// # Panics
    /// If `A.cols() != B.rows()`.
    fn matmul(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D;

    /// Matrix-vector product `A * x` where `A` is `(m, n)` and `x` is `(n,)`.
    ///
    /// # Panics
    /// If `A.cols() != x.len()`.
    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D;

    /// Transposed matrix-vector product `A^T * x` where `A` is `(m, n)`
    /// and `x` is `(m,)`; returns `(n,)`.
    ///
    /// # Panics
    /// If `A.rows() != x.len()`.
    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D;

    /// Outer product of two 1D tensors: `(m,)` and `(n,)` produce `(m, n)`.
    fn outer(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor2D;

    /// Transpose of a 2D tensor.
    fn transpose(t: &Self::Tensor2D) -> Self::Tensor2D;

    /// Adds a 1D tensor of length `cols` to each row of a 2D tensor.
    ///
    /// `Result[i, j] = t[i, j] + v[j]`
    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    // --- Activations ---

    /// Rectified linear unit applied element-wise: `max(x, 0)`.
    fn relu_1d(t: &Self::Tensor1D) -> Self::Tensor1D;

    /// Rectified linear unit applied element-wise to a 2D tensor.
    fn relu_2d(t: &Self::Tensor2D) -> Self::Tensor2D;

    /// Derivative mask of the rectifier: `1.0` where `x > 0`, else `0.0`.
    fn relu_mask_2d(t: &Self::Tensor2D) -> Self::Tensor2D;

    // --- Scalar and data access ---

    /// Creates a backend-specific scalar from an `f64` value.
    fn scalar_f64(value: f64) -> Self::Scalar;

    /// Converts a 1D tensor to a `Vec<f64>`. Not intended for hot paths.
    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64>;

    /// Number of elements in a 1D tensor.
    fn len_1d(t: &Self::Tensor1D) -> usize;

    /// Shape of a 2D tensor as `(rows, cols)`.
    fn shape(t: &Self::Tensor2D) -> (usize, usize);

    /// Flattens a 2D tensor into a 1D tensor in row-major order.
    fn ravel_2d(t: &Self::Tensor2D) -> Self::Tensor1D;
}
