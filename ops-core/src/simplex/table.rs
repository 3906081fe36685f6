use nalgebra::{DMatrix, DVector, RowDVector};
use num_rational::BigRational;
use num_traits::Zero;

use crate::dbg_display;

use super::{big_number::BigNumber, Problem, Solution};

#[derive(Debug, Clone, PartialEq)]
pub struct SimplexTable {
    n_variables: usize,
    first_artificial: usize,
    /// Indices of basis vectors
    basis: DVector<usize>,
    /// i_max x j_max table of coefficients from constraints
    tableau: DMatrix<BigRational>,
    rhs: DVector<BigRational>,
    coefficients: RowDVector<BigNumber<BigRational>>,
    minimization: bool,
    /// Set after the first degenerate pivot; from then on the lowest
    /// improving index enters, which rules out cycling.
    bland: bool,
}

impl SimplexTable {
    pub fn new(problem: Problem) -> Self {
        let Problem {
            n_variables,
            first_artificial,
            coefficients,
            constraints,
            rhs,
            basis,
            minimization,
        } = problem;
        Self {
            n_variables,
            first_artificial,
            basis: DVector::from_vec(basis),
            tableau: constraints,
            rhs,
            coefficients,
            minimization,
            bland: false,
        }
    }

    pub fn basis(&self) -> &[usize] {
        self.basis.as_slice()
    }

    pub fn basis_coefficients(&self) -> Vec<BigNumber<BigRational>> {
        self.basis
            .iter()
            .map(|i| self.coefficients[*i].clone())
            .collect()
    }

    pub fn function_estimation(&self) -> BigNumber<BigRational> {
        self.basis_coefficients()
            .iter()
            .zip(self.rhs.iter())
            .map(|(coefficient, rhs)| coefficient * rhs)
            .sum()
    }

    pub fn column_estimation(&self, index: usize) -> Option<BigNumber<BigRational>> {
        if index >= self.tableau.ncols() {
            return None;
        }
        Some(self.column_estimation_unchecked(index))
    }

    /// Panics if index is out of bounds
    fn column_estimation_unchecked(&self, index: usize) -> BigNumber<BigRational> {
        let weighted: BigNumber<BigRational> = self
            .basis
            .iter()
            .zip(self.tableau.column(index).iter())
            .map(|(i, el)| &self.coefficients[*i] * el)
            .sum();
        weighted - self.coefficients[index].clone()
    }

    /// Performs one pivot, or returns the final answer when no pivot is left.
    pub fn step(&mut self) -> Option<Solution> {
        log::trace!("Tableau:{}", self.tableau);

        let Some(pivot_col) = self.pivot_column() else {
            log::debug!("Optimal table reached");
            return Some(self.solution());
        };
        log::debug!("Pivot column: {pivot_col}");

        let Some((pivot_row, ratio)) = self.pivot_row(pivot_col) else {
            log::debug!("Column {pivot_col} has no positive entries");
            return Some(Solution::Infinite);
        };
        log::debug!("Pivot row: {pivot_row}");

        if ratio.is_zero() && !self.bland {
            log::debug!("Degenerate pivot, switching to Bland's rule");
            self.bland = true;
        }
        self.pivot(pivot_row, pivot_col);
        None
    }

    fn is_basic(&self, index: usize) -> bool {
        self.basis.iter().any(|i| *i == index)
    }

    fn pivot_column(&self) -> Option<usize> {
        let mut best: Option<(usize, BigNumber<BigRational>)> = None;
        for index in (0..self.tableau.ncols()).filter(|index| !self.is_basic(*index)) {
            let estimation = self.column_estimation_unchecked(index);
            // Gain per unit of the entering variable, positive when it improves the objective
            let gain = if self.minimization {
                estimation
            } else {
                -estimation
            };
            if gain <= BigNumber::zero() {
                continue;
            }
            if self.bland {
                return Some(index);
            }
            if best.as_ref().map_or(true, |(_, best_gain)| &gain > best_gain) {
                best = Some((index, gain));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Minimum ratio test; ties go to the row whose basic variable has the lowest index.
    fn pivot_row(&self, pivot_col: usize) -> Option<(usize, BigRational)> {
        let mut best: Option<(usize, BigRational)> = None;
        for (i, el) in self.tableau.column(pivot_col).iter().enumerate() {
            if *el <= BigRational::zero() {
                continue;
            }
            let ratio = &self.rhs[i] / el;
            let better = match &best {
                None => true,
                Some((row, best_ratio)) => {
                    ratio < *best_ratio
                        || (&ratio == best_ratio && self.basis[i] < self.basis[*row])
                }
            };
            if better {
                best = Some((i, ratio));
            }
        }
        best
    }

    fn pivot(&mut self, pivot_row: usize, pivot_col: usize) {
        let pivot_el = self.tableau[(pivot_row, pivot_col)].clone();

        // divide all elements in a row by pivot element
        self.rhs[pivot_row] = &self.rhs[pivot_row] / &pivot_el;
        for j in 0..self.tableau.ncols() {
            self.tableau[(pivot_row, j)] = &self.tableau[(pivot_row, j)] / &pivot_el;
        }

        // subtract pivot row from other rows till the rest of the pivot column is zero
        let pivot_values = self.tableau.row(pivot_row).iter().cloned().collect::<Vec<_>>();
        let pivot_rhs = self.rhs[pivot_row].clone();
        for i in (0..self.tableau.nrows()).filter(|i| *i != pivot_row) {
            let multiplier = self.tableau[(i, pivot_col)].clone();
            if multiplier.is_zero() {
                continue;
            }
            self.rhs[i] = &self.rhs[i] - &(&pivot_rhs * &multiplier);
            for (j, pivot_value) in pivot_values.iter().enumerate() {
                self.tableau[(i, j)] = &self.tableau[(i, j)] - &(pivot_value * &multiplier);
            }
        }

        self.basis[pivot_row] = pivot_col;
    }

    fn solution(&self) -> Solution {
        let artificial_left = self
            .basis
            .iter()
            .zip(self.rhs.iter())
            .any(|(i, value)| *i >= self.first_artificial && !value.is_zero());
        if artificial_left {
            log::debug!("An artificial variable stayed positive");
            return Solution::Absent;
        }

        let variables = DVector::from_iterator(
            self.n_variables,
            (0..self.n_variables).map(|j| {
                self.basis
                    .iter()
                    .position(|i| *i == j)
                    .map_or_else(BigRational::zero, |k| self.rhs[k].clone())
            }),
        );
        let function_value = dbg_display!(variables
            .iter()
            .zip(self.coefficients.iter())
            .map(|(value, coefficient)| value * coefficient.small_part())
            .fold(BigRational::zero(), |acc, el| acc + el));
        log::debug!("Function estimation: {}", self.function_estimation());

        Solution::Finite {
            variables,
            function_value,
        }
    }
}
