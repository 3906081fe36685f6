use std::{
    fmt,
    iter::Sum,
    ops::{Mul, Neg},
};

use num_traits::{One, Zero};

/// A number of the form `aM + b`, where `M` is larger than any finite value.
///
/// Ordering compares the `M` parts first, which is exactly what the big-M
/// method needs from the objective row.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    derive_more::Add,
    derive_more::Sub,
    derive_more::AddAssign,
    derive_more::SubAssign,
)]
pub struct BigNumber<T> {
    big_part: T,
    small_part: T,
}

impl<T> fmt::Display for BigNumber<T>
where
    T: Zero + One + PartialOrd + Neg<Output = T> + Clone + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let big_part = &self.big_part;
        let small_part = &self.small_part;
        if big_part.is_zero() {
            return write!(f, "{small_part}");
        }

        if big_part.is_one() {
            f.write_str("M")?;
        } else if (-big_part.clone()).is_one() {
            f.write_str("-M")?;
        } else {
            write!(f, "{big_part}M")?;
        }

        if small_part.is_zero() {
            return Ok(());
        }
        if *small_part > T::zero() {
            f.write_str("+")?;
        }
        write!(f, "{small_part}")
    }
}

impl<T> BigNumber<T> {
    #[inline(always)]
    pub const fn new(big_part: T, small_part: T) -> Self {
        Self {
            big_part,
            small_part,
        }
    }

    pub const fn big_part(&self) -> &T {
        &self.big_part
    }

    pub const fn small_part(&self) -> &T {
        &self.small_part
    }
}

impl<T: One + Zero> BigNumber<T> {
    pub fn one_big() -> Self {
        Self {
            big_part: T::one(),
            small_part: T::zero(),
        }
    }
}

impl<T> From<T> for BigNumber<T>
where
    T: Zero,
{
    #[inline]
    fn from(val: T) -> Self {
        Self {
            big_part: T::zero(),
            small_part: val,
        }
    }
}

/// Scaling by a plain number.
impl<'a, T> Mul<&'a T> for &'a BigNumber<T>
where
    &'a T: Mul<&'a T, Output = T>,
{
    type Output = BigNumber<T>;

    fn mul(self, rhs: &'a T) -> Self::Output {
        BigNumber {
            big_part: &self.big_part * rhs,
            small_part: &self.small_part * rhs,
        }
    }
}

impl<T> Neg for BigNumber<T>
where
    T: Neg<Output = T>,
{
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            big_part: -self.big_part,
            small_part: -self.small_part,
        }
    }
}

impl<T: Zero> Zero for BigNumber<T> {
    fn zero() -> Self {
        Self {
            big_part: T::zero(),
            small_part: T::zero(),
        }
    }

    fn is_zero(&self) -> bool {
        self.big_part.is_zero() && self.small_part.is_zero()
    }
}

impl<T: Zero> Sum for BigNumber<T> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, el| acc + el)
    }
}
