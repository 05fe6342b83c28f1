//! Numeric element bounds for matrix arithmetic.

/// Shared trait bounds for element types usable with the arithmetic layer
/// (elementwise add/sub, matrix product, scalar scaling).
///
/// `Scalar` is deliberately minimal: the arithmetic layer needs `+`, `-`,
/// `*` and a zero accumulator for the matrix-product fold, nothing more.
/// Custom element types (saturating counters, semiring-like types with a
/// subtraction) satisfy it by implementing the std ops and
/// [`num_traits::Zero`].
pub trait Scalar:
    Copy
    + Send
    + Sync
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Mul<Output = Self>
    + num_traits::Zero
    + PartialEq
{
}

impl<T> Scalar for T where
    T: Copy
        + Send
        + Sync
        + std::ops::Add<Output = T>
        + std::ops::Sub<Output = T>
        + std::ops::Mul<Output = T>
        + num_traits::Zero
        + PartialEq
{
}
