//! Economic order quantity.

use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ComputationError, DomainError, ValidationError},
    model::{Curve, FieldSpec, Model},
};

pub const DAYS_PER_YEAR: f64 = 365.;

pub const ANNUAL_DEMAND: FieldSpec =
    FieldSpec::greater_than("annual_demand", "Annual demand (units)", 0.);
pub const ORDER_COST: FieldSpec = FieldSpec::greater_than("order_cost", "Cost per order", 0.);
/// Zero passes validation and is refused by the computation itself.
pub const HOLDING_COST: FieldSpec =
    FieldSpec::at_least("holding_cost", "Holding cost per unit per year", 0.);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawEoqInput {
    pub annual_demand: f64,
    pub order_cost: f64,
    pub holding_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, new)]
pub struct EoqParameters {
    pub annual_demand: f64,
    pub order_cost: f64,
    pub holding_cost: f64,
}

impl EoqParameters {
    pub fn ordering_cost_at(&self, quantity: f64) -> f64 {
        self.annual_demand / quantity * self.order_cost
    }

    pub fn holding_cost_at(&self, quantity: f64) -> f64 {
        quantity / 2. * self.holding_cost
    }

    /// Annual ordering plus holding cost when ordering `quantity` units at a time.
    pub fn total_cost_at(&self, quantity: f64) -> f64 {
        self.ordering_cost_at(quantity) + self.holding_cost_at(quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EoqResult {
    pub optimal_quantity: f64,
    pub orders_per_year: f64,
    pub total_annual_cost: f64,
    pub annual_ordering_cost: f64,
    pub annual_holding_cost: f64,
    /// Days between two consecutive orders.
    pub cycle_days: f64,
}

pub fn compute_eoq(
    annual_demand: f64,
    order_cost: f64,
    holding_cost: f64,
) -> Result<EoqResult, ComputationError> {
    if holding_cost == 0. {
        return Err(DomainError::new("holding cost must be non-zero").into());
    }
    if !(annual_demand > 0. && order_cost > 0. && holding_cost > 0.)
        || ![annual_demand, order_cost, holding_cost]
            .iter()
            .all(|value| value.is_finite())
    {
        return Err(DomainError::new(format!(
            "demand, order cost and holding cost must be positive, \
             got {annual_demand}, {order_cost}, {holding_cost}"
        ))
        .into());
    }

    let params = EoqParameters::new(annual_demand, order_cost, holding_cost);
    let optimal_quantity = (2. * annual_demand * order_cost / holding_cost).sqrt();
    let orders_per_year = annual_demand / optimal_quantity;
    let annual_ordering_cost = orders_per_year * order_cost;
    let annual_holding_cost = params.holding_cost_at(optimal_quantity);
    let result = EoqResult {
        optimal_quantity,
        orders_per_year,
        total_annual_cost: annual_ordering_cost + annual_holding_cost,
        annual_ordering_cost,
        annual_holding_cost,
        cycle_days: DAYS_PER_YEAR / orders_per_year,
    };
    if !(result.optimal_quantity.is_finite()
        && result.total_annual_cost.is_finite()
        && result.cycle_days.is_finite())
    {
        return Err(DomainError::new(format!(
            "the order quantity overflows for demand {annual_demand}, \
             order cost {order_cost} and holding cost {holding_cost}"
        ))
        .into());
    }
    log::info!(
        "EOQ {:.3} units, {:.3} orders per year",
        result.optimal_quantity,
        result.orders_per_year
    );
    Ok(result)
}

/// Total, ordering and holding cost over `[EOQ / 2, 2 * EOQ]`.
pub fn cost_curves(params: &EoqParameters, result: &EoqResult, samples: usize) -> Vec<Curve> {
    let from = result.optimal_quantity / 2.;
    let to = result.optimal_quantity * 2.;
    vec![
        Curve::sample("total cost", from, to, samples, |q| params.total_cost_at(q)),
        Curve::sample("ordering cost", from, to, samples, |q| {
            params.ordering_cost_at(q)
        }),
        Curve::sample("holding cost", from, to, samples, |q| {
            params.holding_cost_at(q)
        }),
    ]
}

pub struct Eoq;

impl Model for Eoq {
    const NAME: &'static str = "eoq";

    type Raw = RawEoqInput;
    type Params = EoqParameters;
    type Output = EoqResult;

    fn fields() -> &'static [FieldSpec] {
        &[ANNUAL_DEMAND, ORDER_COST, HOLDING_COST]
    }

    fn validate(raw: RawEoqInput) -> Result<EoqParameters, ValidationError> {
        Ok(EoqParameters::new(
            ANNUAL_DEMAND.check(raw.annual_demand)?,
            ORDER_COST.check(raw.order_cost)?,
            HOLDING_COST.check(raw.holding_cost)?,
        ))
    }

    fn compute(params: &EoqParameters) -> Result<EoqResult, ComputationError> {
        compute_eoq(params.annual_demand, params.order_cost, params.holding_cost)
    }
}
