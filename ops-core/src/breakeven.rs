//! Break-even analysis for a single product.

use derive_more::{Display, IsVariant};
use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ComputationError, DomainError, ValidationError},
    model::{Curve, FieldSpec, Model},
};

pub const FIXED_COST: FieldSpec = FieldSpec::at_least("fixed_cost", "Fixed cost", 0.);
pub const VARIABLE_COST: FieldSpec =
    FieldSpec::at_least("variable_cost", "Variable cost per unit", 0.);
pub const PRICE: FieldSpec = FieldSpec::greater_than("price", "Selling price per unit", 0.);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawBreakEvenInput {
    pub fixed_cost: f64,
    pub variable_cost: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, new)]
pub struct BreakEvenParameters {
    pub fixed_cost: f64,
    pub variable_cost_per_unit: f64,
    pub price_per_unit: f64,
}

impl BreakEvenParameters {
    pub fn revenue_at(&self, units: f64) -> f64 {
        self.price_per_unit * units
    }

    pub fn total_cost_at(&self, units: f64) -> f64 {
        self.fixed_cost + self.variable_cost_per_unit * units
    }

    pub fn profit_at(&self, units: f64) -> f64 {
        self.revenue_at(units) - self.total_cost_at(units)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BreakEvenResult {
    pub contribution_margin: f64,
    pub bep_units: f64,
    pub bep_sales: f64,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    #[display(fmt = "loss")]
    Loss,
    #[display(fmt = "break-even")]
    BreakEven,
    #[display(fmt = "profit")]
    Profit,
}

pub fn compute_breakeven(
    fixed_cost: f64,
    variable_cost_per_unit: f64,
    price_per_unit: f64,
) -> Result<BreakEvenResult, ComputationError> {
    let contribution_margin = price_per_unit - variable_cost_per_unit;
    if !(contribution_margin > 0.) || !contribution_margin.is_finite() {
        return Err(DomainError::new(format!(
            "price {price_per_unit} must exceed variable cost {variable_cost_per_unit}"
        ))
        .into());
    }
    if !(fixed_cost >= 0.) || !fixed_cost.is_finite() {
        return Err(DomainError::new(format!(
            "fixed cost must be non-negative, got {fixed_cost}"
        ))
        .into());
    }

    let bep_units = fixed_cost / contribution_margin;
    let result = BreakEvenResult {
        contribution_margin,
        bep_units,
        bep_sales: bep_units * price_per_unit,
    };
    if !(result.bep_units.is_finite() && result.bep_sales.is_finite()) {
        return Err(DomainError::new(format!(
            "the break-even volume overflows for margin {contribution_margin}"
        ))
        .into());
    }
    log::info!(
        "Break-even at {:.3} units ({:.3} in sales)",
        result.bep_units,
        result.bep_sales
    );
    Ok(result)
}

/// Which side of the break-even point `units` falls on.
pub fn region_at(params: &BreakEvenParameters, units: f64) -> Region {
    let profit = params.profit_at(units);
    let tolerance = 1e-9 * params.fixed_cost.max(1.);
    if profit.abs() <= tolerance {
        Region::BreakEven
    } else if profit < 0. {
        Region::Loss
    } else {
        Region::Profit
    }
}

/// Revenue, total cost and profit over `[0, max(2 * BEP, 1)]` units.
pub fn chart(params: &BreakEvenParameters, result: &BreakEvenResult, samples: usize) -> Vec<Curve> {
    let to = (2. * result.bep_units).max(1.);
    vec![
        Curve::sample("revenue", 0., to, samples, |q| params.revenue_at(q)),
        Curve::sample("total cost", 0., to, samples, |q| params.total_cost_at(q)),
        Curve::sample("profit", 0., to, samples, |q| params.profit_at(q)),
    ]
}

pub struct BreakEven;

impl Model for BreakEven {
    const NAME: &'static str = "break-even";

    type Raw = RawBreakEvenInput;
    type Params = BreakEvenParameters;
    type Output = BreakEvenResult;

    fn fields() -> &'static [FieldSpec] {
        &[FIXED_COST, VARIABLE_COST, PRICE]
    }

    fn validate(raw: RawBreakEvenInput) -> Result<BreakEvenParameters, ValidationError> {
        Ok(BreakEvenParameters::new(
            FIXED_COST.check(raw.fixed_cost)?,
            VARIABLE_COST.check(raw.variable_cost)?,
            PRICE.check(raw.price)?,
        ))
    }

    fn compute(params: &BreakEvenParameters) -> Result<BreakEvenResult, ComputationError> {
        compute_breakeven(
            params.fixed_cost,
            params.variable_cost_per_unit,
            params.price_per_unit,
        )
    }
}
