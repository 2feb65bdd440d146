//! Pure-Rust CPU backend with no external dependencies.

use super::Backend;

#[derive(Clone, Copy, Debug)]
pub struct CpuBackend;

/// Row-major dense storage: `(data, rows, cols)`.
#[derive(Clone, Debug)]
pub struct CpuTensor2D(pub Vec<f64>, pub usize, pub usize);

impl CpuTensor2D {
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        assert_eq!(data.len(), rows * cols, "inconsistent shape");
        Self(data, rows, cols)
    }
}

impl Backend for CpuBackend {
    type Scalar = f64;
    type Tensor1D = Vec<f64>;
    type Tensor2D = CpuTensor2D;

    // --- Constructors ---

    fn zeros_1d(len: usize) -> Self::Tensor1D {
        vec![0.0; len]
    }

    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(vec![0.0; rows * cols], rows, cols)
    }

    fn from_vec_1d(data: Vec<f32>) -> Self::Tensor1D {
        data.into_iter().map(f64::from).collect()
    }

    fn from_vec_2d(data: Vec<f32>, rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(data.into_iter().map(f64::from).collect(), rows, cols)
    }

    // --- Element-wise ops ---

    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "length mismatch");
        a.iter().zip(b.iter()).map(|(a, b)| a + b).collect()
    }

    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "length mismatch");
        a.iter().zip(b.iter()).map(|(a, b)| a - b).collect()
    }

    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "length mismatch");
        a.iter().zip(b.iter()).map(|(a, b)| a * b).collect()
    }

    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.iter().map(|x| x * s).collect()
    }

    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.iter().map(|x| x + s).collect()
    }

    fn add_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        assert_eq!((a.1, a.2), (b.1, b.2), "shape mismatch");
        CpuTensor2D::new(
            a.0.iter().zip(b.0.iter()).map(|(a, b)| a + b).collect(),
            a.1,
            a.2,
        )
    }

    fn mul_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        assert_eq!((a.1, a.2), (b.1, b.2), "shape mismatch");
        CpuTensor2D::new(
            a.0.iter().zip(b.0.iter()).map(|(a, b)| a * b).collect(),
            a.1,
            a.2,
        )
    }

    fn mul_scalar_2d(t: &Self::Tensor2D, s: &Self::Scalar) -> Self::Tensor2D {
        CpuTensor2D::new(t.0.iter().map(|x| x * s).collect(), t.1, t.2)
    }

    fn add_scalar_2d(t: &Self::Tensor2D, s: &Self::Scalar) -> Self::Tensor2D {
        CpuTensor2D::new(t.0.iter().map(|x| x + s).collect(), t.1, t.2)
    }

    // --- Reductions ---

    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum()
    }

    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum::<f64>() / t.len() as f64
    }

    fn min_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().copied().fold(f64::INFINITY, f64::min)
    }

    fn max_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    fn min_all_2d(t: &Self::Tensor2D) -> Self::Scalar {
        t.0.iter().copied().fold(f64::INFINITY, f64::min)
    }

    fn max_all_2d(t: &Self::Tensor2D) -> Self::Scalar {
        t.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    fn col_sum_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        let (rows, cols) = (t.1, t.2);
        let mut sums = vec![0.0; cols];
        for r in 0..rows {
            for c in 0..cols {
                sums[c] += t.0[r * cols + c];
            }
        }
        sums
    }

    // --- Linear algebra ---

    fn matmul(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        let (m, k) = (a.1, a.2);
        let (k2, n) = (b.1, b.2);
        assert_eq!(k, k2, "inner dimension mismatch");
        let mut out = vec![0.0; m * n];
        for i in 0..m {
            for p in 0..k {
                let aip = a.0[i * k + p];
                if aip == 0.0 {
                    continue;
                }
                for j in 0..n {
                    out[i * n + j] += aip * b.0[p * n + j];
                }
            }
        }
        CpuTensor2D::new(out, m, n)
    }

    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        let (m, n) = (a.1, a.2);
        assert_eq!(n, x.len(), "dimension mismatch");
        (0..m)
            .map(|i| (0..n).map(|j| a.0[i * n + j] * x[j]).sum())
            .collect()
    }

    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        let (m, n) = (a.1, a.2);
        assert_eq!(m, x.len(), "dimension mismatch");
        let mut out = vec![0.0; n];
        for i in 0..m {
            let xi = x[i];
            for j in 0..n {
                out[j] += a.0[i * n + j] * xi;
            }
        }
        out
    }

    fn outer(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor2D {
        let (m, n) = (a.len(), b.len());
        let mut out = Vec::with_capacity(m * n);
        for &ai in a {
            for &bj in b {
                out.push(ai * bj);
            }
        }
        CpuTensor2D::new(out, m, n)
    }

    fn transpose(t: &Self::Tensor2D) -> Self::Tensor2D {
        let (rows, cols) = (t.1, t.2);
        let mut out = vec![0.0; rows * cols];
        for r in 0..rows {
            for c in 0..cols {
                out[c * rows + r] = t.0[r * cols + c];
            }
        }
        CpuTensor2D::new(out, cols, rows)
    }

    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        let (rows, cols) = (t.1, t.2);
        assert_eq!(cols, v.len(), "row vector length mismatch");
        let mut out = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                out.push(t.0[r * cols + c] + v[c]);
            }
        }
        CpuTensor2D::new(out, rows, cols)
    }

    // --- Activations ---

    fn relu_1d(t: &Self::Tensor1D) -> Self::Tensor1D {
        t.iter().map(|&x| x.max(0.0)).collect()
    }

    fn relu_2d(t: &Self::Tensor2D) -> Self::Tensor2D {
        CpuTensor2D::new(t.0.iter().map(|&x| x.max(0.0)).collect(), t.1, t.2)
    }

    fn relu_mask_2d(t: &Self::Tensor2D) -> Self::Tensor2D {
        CpuTensor2D::new(
            t.0.iter()
                .map(|&x| if x > 0.0 { 1.0 } else { 0.0 })
                .collect(),
            t.1,
            t.2,
        )
    }

    // --- Scalar and data access ---

    fn scalar_f64(value: f64) -> Self::Scalar {
        value
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.clone()
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        (t.1, t.2)
    }

    fn ravel_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.0.clone()
    }
}
