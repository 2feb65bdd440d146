//! Backend backed by the `ndarray` crate, for interop with the wider
//! `ndarray` ecosystem. Enabled with the `ndarray` feature.

use super::Backend;
use ndarray::{Array1, Array2, Axis};

#[derive(Clone, Copy, Debug)]
pub struct NdarrayBackend;

impl Backend for NdarrayBackend {
    type Scalar = f64;
    type Tensor1D = Array1<f64>;
    type Tensor2D = Array2<f64>;

    fn zeros_1d(len: usize) -> Self::Tensor1D {
        Array1::zeros(len)
    }

    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D {
        Array2::zeros((rows, cols))
    }

    fn from_vec_1d(data: Vec<f32>) -> Self::Tensor1D {
        Array1::from(data.into_iter().map(f64::from).collect::<Vec<f64>>())
    }

    fn from_vec_2d(data: Vec<f32>, rows: usize, cols: usize) -> Self::Tensor2D {
        Array2::from_shape_vec(
            (rows, cols),
            data.into_iter().map(f64::from).collect::<Vec<f64>>(),
        )
        .expect("inconsistent shape")
    }

    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a + b
    }

    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a - b
    }

    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a * b
    }

    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t * *s
    }

    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t + *s
    }

    fn add_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        a + b
    }

    fn mul_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        a * b
    }

    fn mul_scalar_2d(t: &Self::Tensor2D, s: &Self::Scalar) -> Self::Tensor2D {
        t * *s
    }

    fn add_scalar_2d(t: &Self::Tensor2D, s: &Self::Scalar) -> Self::Tensor2D {
        t + *s
    }

    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.sum()
    }

    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.sum() / t.len() as f64
    }

    fn min_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().copied().fold(f64::INFINITY, f64::min)
    }

    fn max_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    fn min_all_2d(t: &Self::Tensor2D) -> Self::Scalar {
        t.iter().copied().fold(f64::INFINITY, f64::min)
    }

    fn max_all_2d(t: &Self::Tensor2D) -> Self::Scalar {
        t.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    fn col_sum_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.sum_axis(Axis(0))
    }

    fn matmul(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        a.dot(b)
    }

    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        a.dot(x)
    }

    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        a.t().dot(x)
    }

    fn outer(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor2D {
        let col = a.view().insert_axis(Axis(1));
        let row = b.view().insert_axis(Axis(0));
        col.dot(&row)
    }

    fn transpose(t: &Self::Tensor2D) -> Self::Tensor2D {
        t.t().to_owned()
    }

    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t + v
    }

    fn relu_1d(t: &Self::Tensor1D) -> Self::Tensor1D {
        t.mapv(|x| x.max(0.0))
    }

    fn relu_2d(t: &Self::Tensor2D) -> Self::Tensor2D {
        t.mapv(|x| x.max(0.0))
    }

    fn relu_mask_2d(t: &Self::Tensor2D) -> Self::Tensor2D {
        t.mapv(|x| if x > 0.0 { 1.0 } else { 0.0 })
    }

    fn scalar_f64(value: f64) -> Self::Scalar {
        value
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.to_vec()
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        (t.nrows(), t.ncols())
    }

    fn ravel_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.iter().copied().collect()
    }
}
