//! Exact big-M simplex method.
//!
//! Coefficients arrive as `f64`, are converted losslessly into
//! [`BigRational`]s and every pivot is carried out exactly, so the same
//! problem always yields the same vertex.

mod big_number;
mod problem;
mod table;

pub use big_number::BigNumber;
pub use problem::*;
pub use table::SimplexTable;

use std::borrow::Cow;

use derive_more::IsVariant;
use nalgebra::DVector;
use num_rational::BigRational;
use num_traits::ToPrimitive;

#[derive(Debug, Clone, PartialEq, IsVariant)]
pub enum Solution {
    Finite {
        variables: DVector<BigRational>,
        function_value: BigRational,
    },
    /// The objective is unbounded in the optimisation direction.
    Infinite,
    /// No point satisfies every constraint.
    Absent,
}

impl Solution {
    pub fn as_str(&self) -> Cow<'static, str> {
        match self {
            Solution::Finite {
                variables,
                function_value,
            } => format!("Variables:{variables}Function value: {function_value}").into(),
            Solution::Infinite => "The objective function is unbounded".into(),
            Solution::Absent => "The constraints have no feasible point".into(),
        }
    }
}

/// `None` for NaN and infinities.
pub fn to_exact(value: f64) -> Option<BigRational> {
    BigRational::from_float(value)
}

pub fn to_float(value: &BigRational) -> f64 {
    value.to_f64().unwrap_or_else(|| {
        let numer = value.numer().to_f64().unwrap_or(f64::NAN);
        let denom = value.denom().to_f64().unwrap_or(f64::NAN);
        numer / denom
    })
}
