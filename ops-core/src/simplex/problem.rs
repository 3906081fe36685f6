use std::ops::{Mul, MulAssign};

use derive_more::{Display, Error, IsVariant};
use derive_new::new;
use nalgebra::{DMatrix, DVector, RowDVector};
use num_rational::BigRational;
use num_traits::{One, Zero};

use super::{big_number::BigNumber, to_exact, SimplexTable, Solution};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, PartialEq, Display, new)]
#[display(
    fmt = "{} {}",
    r#"if *minimization { "Minimize" } else { "Maximize" }"#,
    r#"coefficients.to_string().trim()"#
)]
pub struct ObjectiveFunction {
    pub(crate) coefficients: RowDVector<f64>,
    pub(crate) minimization: bool,
}

impl ObjectiveFunction {
    pub fn maximize(coefficients: RowDVector<f64>) -> Self {
        Self::new(coefficients, false)
    }

    pub fn minimize(coefficients: RowDVector<f64>) -> Self {
        Self::new(coefficients, true)
    }
}

#[derive(Debug, Clone, PartialEq, new)]
pub struct Constraint {
    coefficients: RowDVector<f64>,
    sign: Sign,
    rhs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, IsVariant)]
pub enum Sign {
    #[display(fmt = "<=")]
    Less = -1,
    #[display(fmt = "=")]
    Equals = 0,
    #[display(fmt = ">=")]
    Greater = 1,
}

#[derive(Debug, Clone, PartialEq, Display, Error, IsVariant)]
pub enum ProblemError {
    #[display(fmt = "the problem has no variables")]
    Empty,
    #[display(fmt = "coefficient {} is not a finite number", value)]
    NonFinite { value: f64 },
}

/// A problem in canonical form: every constraint is an equation with a
/// non-negative right-hand side and an identity column in the starting basis.
///
/// Columns are laid out as decision variables, then one slack/surplus column
/// per inequality, then one artificial column per `=`/`>=` row.
#[derive(Debug, Clone, PartialEq, Display)]
#[display(
    fmt = "Problem {{\n    coefficients: {}\n    constraints:\n{}\n    rhs:\n{}\n}}",
    r#"coefficients.to_string().trim()"#,
    r#"constraints.to_string().trim_end()"#,
    r#"rhs.to_string().trim_end()"#
)]
pub struct Problem {
    pub(crate) n_variables: usize,
    pub(crate) first_artificial: usize,
    pub(crate) coefficients: RowDVector<BigNumber<BigRational>>,
    pub(crate) constraints: DMatrix<BigRational>,
    pub(crate) rhs: DVector<BigRational>,
    pub(crate) basis: Vec<usize>,
    pub(crate) minimization: bool,
}

impl Problem {
    pub fn new(
        objective_function: ObjectiveFunction,
        constraints: Vec<Constraint>,
    ) -> Result<Self, ProblemError> {
        log::debug!("Objective function: {objective_function}");
        let problem = Self::normalize(objective_function, constraints)?;
        log::debug!("Normalized: {problem}");
        Ok(problem)
    }

    /// An unbounded ray found while an artificial variable is still positive
    /// says nothing about feasibility, so that case is settled by
    /// [`feasibility`](Self::feasibility) on the original problem.
    pub fn solve(self) -> Solution {
        let feasibility = self.has_artificial().then(|| self.feasibility());
        match Self::run(self) {
            Solution::Infinite => match feasibility.map(Self::run) {
                Some(Solution::Absent) => {
                    log::debug!("Unbounded ray found, but the constraints have no feasible point");
                    Solution::Absent
                }
                _ => Solution::Infinite,
            },
            solution => solution,
        }
    }

    fn has_artificial(&self) -> bool {
        self.first_artificial < self.coefficients.len()
    }

    /// Phase-one problem: minimize the sum of the artificial variables.
    /// Its optimum is bounded below by zero and is zero only when the
    /// constraints are feasible.
    fn feasibility(&self) -> Self {
        let coefficients = RowDVector::from_iterator(
            self.coefficients.len(),
            (0..self.coefficients.len()).map(|j| {
                if j >= self.first_artificial {
                    BigNumber::from(BigRational::one())
                } else {
                    BigNumber::zero()
                }
            }),
        );
        Self {
            coefficients,
            minimization: true,
            ..self.clone()
        }
    }

    fn run(self) -> Solution {
        let mut table = SimplexTable::new(self);
        let mut iteration = 1u32;
        loop {
            log::debug!("Iteration: {iteration}");
            if let Some(solution) = table.step() {
                log::info!("Simplex finished after {iteration} iteration(s)");
                return solution;
            }
            iteration += 1;
        }
    }

    fn normalize(
        objective_function: ObjectiveFunction,
        mut constraints: Vec<Constraint>,
    ) -> Result<Self, ProblemError> {
        let n_variables = constraints
            .iter()
            .map(|constraint| constraint.coefficients.len())
            .chain([objective_function.coefficients.len()])
            .max()
            .unwrap_or_default();
        if n_variables == 0 {
            return Err(ProblemError::Empty);
        }

        // Reverse sign on constraints with negative rhs
        constraints
            .iter_mut()
            .filter(|constraint| constraint.rhs < 0.)
            .for_each(|constraint| *constraint *= -1.);

        let n_compensating = constraints
            .iter()
            .filter(|constraint| !constraint.sign.is_equals())
            .count();
        let n_artificial = constraints
            .iter()
            .filter(|constraint| !constraint.sign.is_less())
            .count();
        let first_artificial = n_variables + n_compensating;
        let n_cols = first_artificial + n_artificial;

        let mut rows = Vec::with_capacity(constraints.len());
        let mut rhs = Vec::with_capacity(constraints.len());
        let mut basis = Vec::with_capacity(constraints.len());
        let (mut compensating, mut artificial) = (n_variables, first_artificial);
        for constraint in &constraints {
            let mut row = vec![BigRational::zero(); n_cols];
            for (cell, coefficient) in row.iter_mut().zip(constraint.coefficients.iter()) {
                *cell = exact(*coefficient)?;
            }
            match constraint.sign {
                Sign::Less => {
                    row[compensating] = BigRational::one();
                    basis.push(compensating);
                    compensating += 1;
                }
                Sign::Greater => {
                    row[compensating] = -BigRational::one();
                    compensating += 1;
                    row[artificial] = BigRational::one();
                    basis.push(artificial);
                    artificial += 1;
                }
                Sign::Equals => {
                    row[artificial] = BigRational::one();
                    basis.push(artificial);
                    artificial += 1;
                }
            }
            rows.push(row);
            rhs.push(exact(constraint.rhs)?);
        }

        // Artificial variables are penalized against the optimisation direction
        let penalty = if objective_function.minimization {
            BigNumber::one_big()
        } else {
            -BigNumber::one_big()
        };
        let mut coefficients = Vec::with_capacity(n_cols);
        for j in 0..n_cols {
            coefficients.push(if j >= first_artificial {
                penalty.clone()
            } else if j < objective_function.coefficients.len() {
                BigNumber::from(exact(objective_function.coefficients[j])?)
            } else {
                BigNumber::zero()
            });
        }

        Ok(Self {
            n_variables,
            first_artificial,
            coefficients: RowDVector::from_vec(coefficients),
            constraints: DMatrix::from_fn(rows.len(), n_cols, |i, j| rows[i][j].clone()),
            rhs: DVector::from_vec(rhs),
            basis,
            minimization: objective_function.minimization,
        })
    }
}

fn exact(value: f64) -> Result<BigRational, ProblemError> {
    to_exact(value).ok_or(ProblemError::NonFinite { value })
}

impl Mul<f64> for Sign {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        if rhs >= 0. {
            return self;
        }
        match self {
            Sign::Less => Sign::Greater,
            Sign::Equals => self,
            Sign::Greater => Sign::Less,
        }
    }
}

impl MulAssign<f64> for Sign {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}

impl Mul<f64> for Constraint {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            coefficients: self.coefficients * rhs,
            rhs: self.rhs * rhs,
            sign: self.sign * rhs,
        }
    }
}

impl MulAssign<f64> for Constraint {
    fn mul_assign(&mut self, rhs: f64) {
        self.coefficients *= rhs;
        self.rhs *= rhs;
        self.sign *= rhs;
    }
}
