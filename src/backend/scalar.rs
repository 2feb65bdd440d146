use crate::backend::Backend;
use std::marker::PhantomData;

/// Trait for scalar operations required by numerical backends.
///
/// Defines the minimal arithmetic surface the training and normalization
/// code relies on. Implemented for the primitive floating-point types used
/// by backends (currently `f64`).
pub trait ScalarOps:
    Clone
    + Copy
    + Send
    + Sync
    + std::fmt::Debug
    + std::ops::Add<Output = Self>
    + std::ops::Mul<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Div<Output = Self>
{
    /// Returns the additive identity (zero) for this scalar type.
    fn zero() -> Self;

    /// Returns the multiplicative identity (one) for this scalar type.
    fn one() -> Self;

    /// Converts an `f64` value to this scalar type.
    fn from_f64(v: f64) -> Self;

    /// Converts this scalar to an `f64` value.
    fn to_f64(self) -> f64;

    /// Computes the square root of the scalar.
    fn sqrt(self) -> Self;

    /// Returns the absolute value of the scalar.
    fn abs(self) -> Self;
}

/// `f64` implementation of `ScalarOps`, following IEEE 754 semantics.
impl ScalarOps for f64 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn from_f64(v: f64) -> Self {
        v
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn sqrt(self) -> Self {
        self.sqrt()
    }

    fn abs(self) -> Self {
        self.abs()
    }
}

/// Backend-typed scalar wrapper providing compile-time type safety.
///
/// Wraps a backend's native scalar type (`B::Scalar`) while carrying
/// phantom type information about its originating backend, preventing
/// accidental mixing of scalars from different backends.
///
/// # Example
/// ```
/// use valuenet::backend::{CpuBackend, Scalar};
///
/// let s: Scalar<CpuBackend> = Scalar::new(2.0);
/// let squared = s * s;
/// assert_eq!(squared.to_f64(), 4.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Scalar<B: Backend> {
    pub(crate) data: B::Scalar,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Scalar<B> {
    /// Creates a new scalar from an `f64` host value.
    pub fn new(f: f64) -> Self {
        Self {
            data: B::scalar_f64(f),
            backend: PhantomData,
        }
    }

    /// Converts this backend scalar to a host `f64` value.
    pub fn to_f64(&self) -> f64 {
        self.data.to_f64()
    }
}

impl<B: Backend> std::ops::Add for Scalar<B> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            data: self.data + rhs.data,
            backend: PhantomData,
        }
    }
}

impl<B: Backend> std::ops::Sub for Scalar<B> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            data: self.data - rhs.data,
            backend: PhantomData,
        }
    }
}

impl<B: Backend> std::ops::Mul for Scalar<B> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self {
            data: self.data * rhs.data,
            backend: PhantomData,
        }
    }
}

/// # Panics
/// Division by zero follows the backend scalar's semantics.
impl<B: Backend> std::ops::Div for Scalar<B> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self {
            data: self.data / rhs.data,
            backend: PhantomData,
        }
    }
}
