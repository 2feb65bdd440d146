use super::scalar::Scalar;
use super::tensor2d::Tensor2D;
use crate::backend::Backend;
use std::marker::PhantomData;

/// Backend-typed 1D tensor.
///
/// Wraps a backend's native 1D representation while carrying the backend
/// as a phantom parameter, so tensors from different backends cannot be
/// mixed at compile time.
///
/// Constructors accept `Vec<f32>` for ergonomic data loading; values are
/// converted to the backend's native precision (typically `f64`) and
/// `to_vec()` returns `Vec<f64>` for host interoperability.
///
/// # Example
/// ```
/// use valuenet::backend::{CpuBackend, Scalar, Tensor1D};
///
/// let x: Tensor1D<CpuBackend> = Tensor1D::new(vec![1.0f32, 2.0, 3.0]);
/// let y = x.scale(&Scalar::new(2.0));
/// assert_eq!(y.to_vec(), vec![2.0, 4.0, 6.0]);
/// ```
#[derive(Clone)]
pub struct Tensor1D<B: Backend> {
    pub(crate) data: B::Tensor1D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor1D<B> {
    /// Creates a new 1D tensor from a vector of `f32` values.
    pub fn new(data: Vec<f32>) -> Self {
        Self {
            data: B::from_vec_1d(data),
            backend: PhantomData,
        }
    }

    /// Creates a 1D tensor filled with zeros of the specified length.
    pub fn zeros(len: usize) -> Self {
        Self {
            data: B::zeros_1d(len),
            backend: PhantomData,
        }
    }

    pub(crate) fn from_raw(data: B::Tensor1D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    /// Returns the number of elements in the tensor.
    pub fn len(&self) -> usize {
        B::len_1d(&self.data)
    }

    /// Returns `true` if the tensor contains no elements.
    pub fn is_empty(&self) -> bool {
        B::len_1d(&self.data) == 0
    }

    /// Converts the tensor to a `Vec<f64>` for host interoperability.
    pub fn to_vec(&self) -> Vec<f64> {
        B::to_vec_1d(&self.data)
    }

    /// Element-wise addition: `self + other`.
    ///
    /// # Panics
    /// Panics if tensors have different lengths.
    pub fn add(&self, other: &Self) -> Self {
        Self::from_raw(B::add_1d(&self.data, &other.data))
    }

    /// Element-wise subtraction: `self - other`.
    ///
    /// # Panics
    /// Panics if tensors have different lengths.
    pub fn sub(&self, other: &Self) -> Self {
        Self::from_raw(B::sub_1d(&self.data, &other.data))
    }

    /// Element-wise multiplication: `self * other`.
    ///
    /// # Panics
    /// Panics if tensors have different lengths.
    pub fn mul(&self, other: &Self) -> Self {
        Self::from_raw(B::mul_1d(&self.data, &other.data))
    }

    /// Multiplies each element by a scalar.
    pub fn scale(&self, a: &Scalar<B>) -> Self {
        Self::from_raw(B::mul_scalar_1d(&self.data, &a.data))
    }

    /// Adds a scalar to each element.
    pub fn add_scalar(&self, a: &Scalar<B>) -> Self {
        Self::from_raw(B::add_scalar_1d(&self.data, &a.data))
    }

    /// Dot product between two tensors: `Σᵢ aᵢ * bᵢ`.
    ///
    /// # Panics
    /// Panics if tensors have different lengths.
    ///
    /// # Example
    /// ```
    /// use valuenet::backend::{CpuBackend, Tensor1D};
    ///
    /// let a = Tensor1D::<CpuBackend>::new(vec![1.0f32, 2.0, 3.0]);
    /// let b = Tensor1D::<CpuBackend>::new(vec![4.0f32, 5.0, 6.0]);
    /// assert_eq!(a.dot(&b).to_f64(), 32.0);
    /// ```
    pub fn dot(&self, other: &Self) -> Scalar<B> {
        let prod = B::mul_1d(&self.data, &other.data);
        Scalar {
            data: B::sum_all_1d(&prod),
            backend: PhantomData,
        }
    }

    /// Sum of all elements.
    pub fn sum(&self) -> Scalar<B> {
        Scalar {
            data: B::sum_all_1d(&self.data),
            backend: PhantomData,
        }
    }

    /// Arithmetic mean of all elements.
    ///
    /// # Panics
    /// Panics if the tensor is empty (backend-dependent behavior).
    pub fn mean(&self) -> Scalar<B> {
        Scalar {
            data: B::mean_all_1d(&self.data),
            backend: PhantomData,
        }
    }

    /// Minimum over all elements.
    pub fn min(&self) -> Scalar<B> {
        Scalar {
            data: B::min_all_1d(&self.data),
            backend: PhantomData,
        }
    }

    /// Maximum over all elements.
    pub fn max(&self) -> Scalar<B> {
        Scalar {
            data: B::max_all_1d(&self.data),
            backend: PhantomData,
        }
    }

    /// Rectified linear unit applied element-wise: `max(x, 0)`.
    pub fn relu(&self) -> Self {
        Self::from_raw(B::relu_1d(&self.data))
    }

    /// Outer product: `(m,)` with `(n,)` produces an `(m, n)` tensor.
    pub fn outer(&self, other: &Self) -> Tensor2D<B> {
        Tensor2D::from_raw(B::outer(&self.data, &other.data))
    }
}

#[cfg(all(test, feature = "cpu"))]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_new_and_len() {
        let t = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(t.to_vec(), vec![1.0, 2.0, 3.0]);
        assert_eq!(t.len(), 3);
        assert!(!t.is_empty());
    }

    #[test]
    fn test_zeros() {
        let t = Tensor1D::<CpuBackend>::zeros(4);
        assert_eq!(t.to_vec(), vec![0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_empty() {
        let t = Tensor1D::<CpuBackend>::new(vec![]);
        assert!(t.is_empty());
        assert_eq!(t.len(), 0);
    }

    #[test]
    fn test_add_sub_mul() {
        let a = Tensor1D::<CpuBackend>::new(vec![5.0, 7.0]);
        let b = Tensor1D::<CpuBackend>::new(vec![2.0, 3.0]);
        assert_eq!(a.add(&b).to_vec(), vec![7.0, 10.0]);
        assert_eq!(a.sub(&b).to_vec(), vec![3.0, 4.0]);
        assert_eq!(a.mul(&b).to_vec(), vec![10.0, 21.0]);
    }

    #[test]
    fn test_scale_and_add_scalar() {
        let t = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0]);
        let scaled = t.scale(&Scalar::new(2.0));
        assert_eq!(scaled.to_vec(), vec![2.0, 4.0]);

        let shifted = t.add_scalar(&Scalar::new(10.0));
        assert_eq!(shifted.to_vec(), vec![11.0, 12.0]);
    }

    #[test]
    fn test_dot() {
        let a = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0, 3.0]);
        let b = Tensor1D::<CpuBackend>::new(vec![4.0, 5.0, 6.0]);
        assert_eq!(a.dot(&b).to_f64(), 32.0);
    }

    #[test]
    fn test_sum_mean() {
        let t = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(t.sum().to_f64(), 10.0);
        assert_eq!(t.mean().to_f64(), 2.5);
    }

    #[test]
    fn test_min_max() {
        let t = Tensor1D::<CpuBackend>::new(vec![3.0, -1.0, 2.0]);
        assert_eq!(t.min().to_f64(), -1.0);
        assert_eq!(t.max().to_f64(), 3.0);
    }

    #[test]
    fn test_relu() {
        let t = Tensor1D::<CpuBackend>::new(vec![-2.0, 0.0, 3.0]);
        assert_eq!(t.relu().to_vec(), vec![0.0, 0.0, 3.0]);
    }

    #[test]
    fn test_outer() {
        let a = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0]);
        let b = Tensor1D::<CpuBackend>::new(vec![3.0, 4.0, 5.0]);
        let o = a.outer(&b);
        assert_eq!(o.shape(), (2, 3));
        assert_eq!(o.ravel().to_vec(), vec![3.0, 4.0, 5.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_clone_independence() {
        let t = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0]);
        let modified = t.clone().scale(&Scalar::new(2.0));
        assert_eq!(t.to_vec(), vec![1.0, 2.0]);
        assert_eq!(modified.to_vec(), vec![2.0, 4.0]);
    }
}
