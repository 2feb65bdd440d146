use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::dataset::Dataset;
use std::ops::Range;

/// Dataset held fully in memory as rows of features plus a target vector.
///
/// Construction validates shape once, so batch access never fails.
#[derive(Debug)]
pub struct InMemoryDataset {
    x: Vec<Vec<f32>>,
    y: Vec<f32>,
}

impl InMemoryDataset {
    pub fn new(x: Vec<Vec<f32>>, y: Vec<f32>) -> Result<Self, String> {
        if x.len() != y.len() {
            return Err("x and y must have same length".into());
        }
        if x.is_empty() {
            return Err("Dataset is empty".into());
        }
        let n_features = x[0].len();
        if !x.iter().all(|row| row.len() == n_features) {
            return Err("All rows must have the same number of features".into());
        }
        Ok(Self { x, y })
    }

    pub fn n_features(&self) -> usize {
        self.x[0].len()
    }
}

impl Dataset for InMemoryDataset {
    type Error = std::convert::Infallible;

    fn len(&self) -> Option<usize> {
        Some(self.x.len())
    }

    fn get_batch<B: Backend>(
        &self,
        range: Range<usize>,
    ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error> {
        let batch_x = &self.x[range.clone()];
        let batch_y = &self.y[range];

        let batch_size = batch_x.len();
        let n_features = self.n_features();

        let data = batch_x.iter().flat_map(|row| row.iter()).copied().collect();
        Ok((
            Tensor2D::<B>::new(data, batch_size, n_features),
            Tensor1D::<B>::new(batch_y.to_vec()),
        ))
    }

    fn get_indexed<B: Backend>(
        &self,
        indices: &[usize],
    ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error> {
        let n_features = self.n_features();
        let data = indices
            .iter()
            .flat_map(|&i| self.x[i].iter())
            .copied()
            .collect();
        let targets = indices.iter().map(|&i| self.y[i]).collect();
        Ok((
            Tensor2D::<B>::new(data, indices.len(), n_features),
            Tensor1D::<B>::new(targets),
        ))
    }
}
