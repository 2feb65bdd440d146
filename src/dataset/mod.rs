//! Dataset abstractions for the training loop.
//!
//! A [`Dataset`] is a source of `(X, y)` pairs where `X` is a feature
//! matrix of shape `(n_samples, n_features)` and `y` a target vector of
//! shape `(n_samples,)`. Batches can be loaded either as contiguous
//! ranges ([`Dataset::get_batch`], via the [`DatasetBatchIter`]) or by an
//! arbitrary index list ([`Dataset::get_indexed`]), which the trainer
//! uses for shuffled mini-batching.
//!
//! # Example
//! ```
//! use valuenet::dataset::{Dataset, InMemoryDataset};
//! use valuenet::backend::CpuBackend;
//!
//! let x = vec![vec![1.0], vec![2.0]];
//! let y = vec![0.0, 1.0];
//! let dataset = InMemoryDataset::new(x, y).unwrap();
//!
//! for batch in dataset.batches::<CpuBackend>(1) {
//!     let (x_batch, y_batch) = batch.unwrap();
//!     assert_eq!(x_batch.shape(), (1, 1));
//!     assert_eq!(y_batch.len(), 1);
//! }
//! ```

use crate::backend::{Backend, Tensor1D, Tensor2D};
use std::{fmt::Debug, ops::Range};

pub mod memory;
pub use self::memory::InMemoryDataset;

/// Abstract interface for training data.
pub trait Dataset {
    /// Error type returned when accessing data.
    type Error: Debug + 'static;

    /// Returns the total number of samples, if known.
    ///
    /// `None` means the size is unknown (streaming sources); the trainer
    /// refuses such datasets because shuffling and loss averaging both
    /// need the total.
    fn len(&self) -> Option<usize>;

    /// Checks whether the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Loads the samples in `range` as tensors.
    fn get_batch<B: Backend>(
        &self,
        range: Range<usize>,
    ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error>;

    /// Loads the samples at `indices`, in the given order, as tensors.
    ///
    /// The index order defines the row order of the result, which is what
    /// makes per-epoch shuffling possible without copying the dataset.
    fn get_indexed<B: Backend>(
        &self,
        indices: &[usize],
    ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error>;

    /// Creates an iterator over fixed-size contiguous batches. The last
    /// batch may be smaller than `batch_size`.
    fn batches<B: Backend>(&self, batch_size: usize) -> DatasetBatchIter<'_, B, Self>
    where
        Self: Sized,
    {
        DatasetBatchIter {
            dataset: self,
            batch_size,
            current: 0,
            _backend: std::marker::PhantomData,
        }
    }
}

/// Iterator over contiguous dataset batches, created by
/// [`Dataset::batches`]. Data is fetched lazily on `next()`; errors from
/// `get_batch` are propagated as `Some(Err(e))`.
pub struct DatasetBatchIter<'a, B: Backend, D: ?Sized> {
    dataset: &'a D,
    batch_size: usize,
    current: usize,
    _backend: std::marker::PhantomData<B>,
}

impl<'a, B: Backend, D: Dataset> Iterator for DatasetBatchIter<'a, B, D> {
    type Item = Result<(Tensor2D<B>, Tensor1D<B>), D::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.dataset.len()?;
        if self.current >= total || self.batch_size == 0 {
            return None;
        }

        let end = (self.current + self.batch_size).min(total);
        let range = self.current..end;
        self.current = end;

        Some(self.dataset.get_batch::<B>(range))
    }
}

#[cfg(all(test, feature = "cpu"))]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    struct MockDataset {
        len: usize,
    }

    impl Dataset for MockDataset {
        type Error = &'static str;

        fn len(&self) -> Option<usize> {
            Some(self.len)
        }

        fn get_batch<B: Backend>(
            &self,
            range: Range<usize>,
        ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error> {
            let indices: Vec<usize> = range.collect();
            self.get_indexed(&indices)
        }

        fn get_indexed<B: Backend>(
            &self,
            indices: &[usize],
        ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error> {
            if indices.iter().any(|&i| i >= self.len) {
                return Err("index out of bounds");
            }
            let x_data: Vec<f32> = indices
                .iter()
                .flat_map(|&i| [(i * 2) as f32, (i * 2 + 1) as f32])
                .collect();
            let y_data: Vec<f32> = indices.iter().map(|&i| i as f32).collect();
            Ok((
                Tensor2D::new(x_data, indices.len(), 2),
                Tensor1D::new(y_data),
            ))
        }
    }

    #[test]
    fn test_is_empty() {
        assert!(MockDataset { len: 0 }.is_empty());
        assert!(!MockDataset { len: 1 }.is_empty());
    }

    #[test]
    fn test_batches_full() {
        let dataset = MockDataset { len: 6 };
        let mut iter = dataset.batches::<CpuBackend>(2);

        for i in 0..3 {
            let (x, y) = iter.next().unwrap().unwrap();
            assert_eq!(x.shape(), (2, 2));
            assert_eq!(y.to_vec(), vec![i as f64 * 2.0, i as f64 * 2.0 + 1.0]);
        }
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_batches_partial_last() {
        let dataset = MockDataset { len: 5 };
        let mut iter = dataset.batches::<CpuBackend>(2);

        assert_eq!(iter.next().unwrap().unwrap().0.shape(), (2, 2));
        assert_eq!(iter.next().unwrap().unwrap().0.shape(), (2, 2));
        assert_eq!(iter.next().unwrap().unwrap().0.shape(), (1, 2));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_batches_larger_than_dataset() {
        let dataset = MockDataset { len: 3 };
        let mut iter = dataset.batches::<CpuBackend>(10);

        assert_eq!(iter.next().unwrap().unwrap().0.shape(), (3, 2));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_batches_empty_dataset() {
        let dataset = MockDataset { len: 0 };
        assert!(dataset.batches::<CpuBackend>(2).next().is_none());
    }

    #[test]
    fn test_batches_zero_batch_size_terminates() {
        let dataset = MockDataset { len: 3 };
        assert!(dataset.batches::<CpuBackend>(0).next().is_none());
    }

    #[test]
    fn test_get_indexed_order() {
        let dataset = MockDataset { len: 4 };
        let (_, y) = dataset.get_indexed::<CpuBackend>(&[3, 0, 2]).unwrap();
        assert_eq!(y.to_vec(), vec![3.0, 0.0, 2.0]);
    }

    #[test]
    fn test_get_indexed_out_of_bounds() {
        let dataset = MockDataset { len: 2 };
        assert!(dataset.get_indexed::<CpuBackend>(&[5]).is_err());
    }
}
