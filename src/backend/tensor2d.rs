use super::scalar::Scalar;
use super::tensor1d::Tensor1D;
use crate::backend::Backend;
use std::marker::PhantomData;

/// Backend-typed 2D tensor, row-major, shape `(rows, cols)`.
///
/// Like [`Tensor1D`], carries its backend as a phantom parameter and
/// delegates all arithmetic to the backend implementation.
#[derive(Clone)]
pub struct Tensor2D<B: Backend> {
    pub(crate) data: B::Tensor2D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor2D<B> {
    /// Creates a 2D tensor from row-major `f32` data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    pub fn new(data: Vec<f32>, rows: usize, cols: usize) -> Self {
        Self {
            data: B::from_vec_2d(data, rows, cols),
            backend: PhantomData,
        }
    }

    /// Creates a 2D tensor filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: B::zeros_2d(rows, cols),
            backend: PhantomData,
        }
    }

    /// Builds a tensor from rows of equal length.
    ///
    /// # Panics
    /// If rows are ragged.
    pub fn from_rows(rows: &[Vec<f32>]) -> Self {
        let n_rows = rows.len();
        let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
        assert!(
            rows.iter().all(|r| r.len() == n_cols),
            "all rows must have the same length"
        );
        let data: Vec<f32> = rows.iter().flat_map(|r| r.iter()).copied().collect();
        Self::new(data, n_rows, n_cols)
    }

    pub(crate) fn from_raw(data: B::Tensor2D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    /// Shape as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        B::shape(&self.data)
    }

    /// Flattens into a 1D tensor in row-major order.
    pub fn ravel(&self) -> Tensor1D<B> {
        Tensor1D::from_raw(B::ravel_2d(&self.data))
    }

    /// Element-wise addition.
    ///
    /// # Panics
    /// Panics if shapes differ.
    pub fn add(&self, other: &Self) -> Self {
        Self::from_raw(B::add_2d(&self.data, &other.data))
    }

    /// Element-wise (Hadamard) multiplication.
    ///
    /// # Panics
    /// Panics if shapes differ.
    pub fn mul(&self, other: &Self) -> Self {
        Self::from_raw(B::mul_2d(&self.data, &other.data))
    }

    /// Multiplies each element by a scalar.
    pub fn scale(&self, a: &Scalar<B>) -> Self {
        Self::from_raw(B::mul_scalar_2d(&self.data, &a.data))
    }

    /// Adds a scalar to each element.
    pub fn add_scalar(&self, a: &Scalar<B>) -> Self {
        Self::from_raw(B::add_scalar_2d(&self.data, &a.data))
    }

    /// Matrix product `self (m, k) * other (k, n)`.
    ///
    /// # Panics
    /// If inner dimensions differ.
    pub fn matmul(&self, other: &Self) -> Self {
        Self::from_raw(B::matmul(&self.data, &other.data))
    }

    /// Matrix-vector product `self (m, n) * x (n,)`, returning `(m,)`.
    pub fn matvec(&self, x: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D::from_raw(B::matvec(&self.data, &x.data))
    }

    /// Transposed matrix-vector product `self^T (n, m) * x (m,)`,
    /// returning `(n,)`.
    pub fn tdot(&self, x: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D::from_raw(B::matvec_transposed(&self.data, &x.data))
    }

    /// Transpose.
    pub fn transpose(&self) -> Self {
        Self::from_raw(B::transpose(&self.data))
    }

    /// Adds a row vector of length `cols` to every row.
    ///
    /// # Panics
    /// If `v.len() != cols`.
    pub fn broadcast_add_rows(&self, v: &Tensor1D<B>) -> Self {
        Self::from_raw(B::broadcast_add_1d_to_2d_rows(&self.data, &v.data))
    }

    /// Sum of each column, returning a tensor of length `cols`.
    pub fn col_sum(&self) -> Tensor1D<B> {
        Tensor1D::from_raw(B::col_sum_2d(&self.data))
    }

    /// Minimum over all elements.
    pub fn min(&self) -> Scalar<B> {
        Scalar {
            data: B::min_all_2d(&self.data),
            backend: PhantomData,
        }
    }

    /// Maximum over all elements.
    pub fn max(&self) -> Scalar<B> {
        Scalar {
            data: B::max_all_2d(&self.data),
            backend: PhantomData,
        }
    }

    /// Rectified linear unit applied element-wise.
    pub fn relu(&self) -> Self {
        Self::from_raw(B::relu_2d(&self.data))
    }

    /// Rectifier derivative mask: `1.0` where the element is positive.
    pub fn relu_mask(&self) -> Self {
        Self::from_raw(B::relu_mask_2d(&self.data))
    }

    /// Copies out the rows as `Vec<Vec<f32>>`, for feeding dataset
    /// construction. Not intended for hot paths.
    pub fn to_rows(&self) -> Vec<Vec<f32>> {
        let (rows, cols) = self.shape();
        let flat = self.ravel().to_vec();
        (0..rows)
            .map(|r| (0..cols).map(|c| flat[r * cols + c] as f32).collect())
            .collect()
    }
}

#[cfg(all(test, feature = "cpu"))]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_new_and_shape() {
        let t = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        assert_eq!(t.shape(), (2, 3));
        assert_eq!(t.ravel().to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_from_rows() {
        let t = Tensor2D::<CpuBackend>::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(t.shape(), (2, 2));
        assert_eq!(t.ravel().to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_matmul() {
        // [[1, 2], [3, 4]] * [[5, 6], [7, 8]] = [[19, 22], [43, 50]]
        let a = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let b = Tensor2D::<CpuBackend>::new(vec![5.0, 6.0, 7.0, 8.0], 2, 2);
        let c = a.matmul(&b);
        assert_eq!(c.ravel().to_vec(), vec![19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_matvec() {
        // [[1, 2], [3, 4]] * [1, 1] = [3, 7]
        let a = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let x = Tensor1D::<CpuBackend>::new(vec![1.0, 1.0]);
        assert_eq!(a.matvec(&x).to_vec(), vec![3.0, 7.0]);
    }

    #[test]
    fn test_tdot() {
        // A^T * x where A = [[1, 2], [3, 4]], x = [1, 2] -> [7, 10]
        let a = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let x = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0]);
        assert_eq!(a.tdot(&x).to_vec(), vec![7.0, 10.0]);
    }

    #[test]
    fn test_transpose() {
        let t = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        let tt = t.transpose();
        assert_eq!(tt.shape(), (3, 2));
        assert_eq!(tt.ravel().to_vec(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_broadcast_add_rows() {
        let t = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let v = Tensor1D::<CpuBackend>::new(vec![10.0, 20.0]);
        let r = t.broadcast_add_rows(&v);
        assert_eq!(r.ravel().to_vec(), vec![11.0, 22.0, 13.0, 24.0]);
    }

    #[test]
    fn test_col_sum() {
        let t = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        assert_eq!(t.col_sum().to_vec(), vec![4.0, 6.0]);
    }

    #[test]
    fn test_global_min_max() {
        let t = Tensor2D::<CpuBackend>::new(vec![3.0, -1.0, 7.0, 2.0], 2, 2);
        assert_eq!(t.min().to_f64(), -1.0);
        assert_eq!(t.max().to_f64(), 7.0);
    }

    #[test]
    fn test_relu_and_mask() {
        let t = Tensor2D::<CpuBackend>::new(vec![-1.0, 2.0, 0.0, 3.0], 2, 2);
        assert_eq!(t.relu().ravel().to_vec(), vec![0.0, 2.0, 0.0, 3.0]);
        assert_eq!(t.relu_mask().ravel().to_vec(), vec![0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_hadamard_mul() {
        let a = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let b = Tensor2D::<CpuBackend>::new(vec![2.0, 2.0, 0.5, 1.0], 2, 2);
        assert_eq!(a.mul(&b).ravel().to_vec(), vec![2.0, 4.0, 1.5, 4.0]);
    }

    #[test]
    fn test_to_rows() {
        let t = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        assert_eq!(t.to_rows(), vec![vec![1.0f32, 2.0], vec![3.0, 4.0]]);
    }
}
