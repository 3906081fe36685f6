//! Profit-maximising production mix under resource capacities.
//!
//! Products and resources are addressed by position once validated; the raw
//! input may refer to them by name.

use std::collections::{BTreeMap, HashMap};

use derive_more::{Display, IsVariant};
use derive_new::new;
use nalgebra::RowDVector;
use serde::{Deserialize, Serialize};

use crate::{
    ensure, ensure_eq,
    error::{ComputationError, DomainError, ValidationError},
    model::{FieldSpec, Model},
    simplex::{self, Constraint, ObjectiveFunction, Sign, Solution},
};

#[cfg(test)]
mod tests;

pub const CAPACITY: FieldSpec = FieldSpec::at_least("capacity", "Available amount", 0.);
pub const CONSUMPTION: FieldSpec = FieldSpec::at_least("consumption", "Amount per unit", 0.);
pub const PROFIT: FieldSpec = FieldSpec::at_least("profit_per_unit", "Profit per unit", 0.);
pub const MINIMUM: FieldSpec = FieldSpec::at_least("minimum", "Minimum quantity", 0.);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize)]
#[display(fmt = "product #{}", _0)]
pub struct ProductId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize)]
#[display(fmt = "resource #{}", _0)]
pub struct ResourceId(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResource {
    pub name: String,
    pub capacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProduct {
    pub name: String,
    /// Amount of each named resource used by one unit.
    #[serde(default)]
    pub consumption: BTreeMap<String, f64>,
    pub profit_per_unit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawConstraint {
    Equal { first: String, second: String },
    Minimum { product: String, quantity: f64 },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawPlanInput {
    pub resources: Vec<RawResource>,
    pub products: Vec<RawProduct>,
    #[serde(default)]
    pub constraints: Vec<RawConstraint>,
    /// Force every product to the same quantity.
    #[serde(default)]
    pub equalize: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, new)]
pub struct ProductSpec {
    pub name: String,
    /// Indexed by [`ResourceId`].
    pub consumption: Vec<f64>,
    pub profit_per_unit: f64,
}

impl ProductSpec {
    pub fn consumption_of(&self, resource: ResourceId) -> f64 {
        self.consumption.get(resource.0).copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, new)]
pub struct ResourceCapacity {
    pub name: String,
    pub capacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, IsVariant)]
pub enum ExtraConstraint {
    /// Both products are made in the same quantity.
    Equal(ProductId, ProductId),
    /// At least this many units of the product.
    Minimum(ProductId, f64),
}

/// Chains `p0 = p1, p1 = p2, ...` so that every product ends up equal.
pub fn equalize_all(n_products: usize) -> Vec<ExtraConstraint> {
    (1..n_products)
        .map(|i| ExtraConstraint::Equal(ProductId(i - 1), ProductId(i)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, new)]
pub struct PlanParameters {
    pub products: Vec<ProductSpec>,
    pub capacities: Vec<ResourceCapacity>,
    pub extra_constraints: Vec<ExtraConstraint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum SolverStatus {
    #[display(fmt = "infeasible")]
    Infeasible,
    #[display(fmt = "unbounded")]
    Unbounded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedQuantity {
    pub product: String,
    pub quantity: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceUsage {
    pub resource: String,
    pub used: f64,
    pub capacity: f64,
    pub slack: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionPlan {
    /// In product order.
    pub quantities: Vec<PlannedQuantity>,
    pub total_profit: f64,
    /// In resource order.
    pub resource_usage: Vec<ResourceUsage>,
}

impl ProductionPlan {
    fn from_quantities(
        products: &[ProductSpec],
        capacities: &[ResourceCapacity],
        quantities: Vec<f64>,
    ) -> Self {
        let quantities = products
            .iter()
            .zip(quantities)
            .map(|(product, quantity)| PlannedQuantity {
                product: product.name.clone(),
                quantity,
                profit: quantity * product.profit_per_unit,
            })
            .collect::<Vec<_>>();
        let total_profit = quantities.iter().map(|planned| planned.profit).sum();
        let resource_usage = capacities
            .iter()
            .enumerate()
            .map(|(r, resource)| {
                let used = products
                    .iter()
                    .zip(&quantities)
                    .map(|(product, planned)| {
                        product.consumption_of(ResourceId(r)) * planned.quantity
                    })
                    .sum::<f64>();
                ResourceUsage {
                    resource: resource.name.clone(),
                    used,
                    capacity: resource.capacity,
                    slack: resource.capacity - used,
                }
            })
            .collect();
        Self {
            quantities,
            total_profit,
            resource_usage,
        }
    }

    pub fn quantity(&self, product: ProductId) -> Option<f64> {
        self.quantities.get(product.0).map(|planned| planned.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, IsVariant)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlanOutcome {
    Optimal(ProductionPlan),
    /// No optimal plan exists; carries what the solver reported.
    Infeasible { status: SolverStatus },
}

/// Maximises total profit subject to every resource capacity and the extra
/// constraints.
pub fn solve_plan(
    products: &[ProductSpec],
    capacities: &[ResourceCapacity],
    extra_constraints: &[ExtraConstraint],
) -> Result<PlanOutcome, ComputationError> {
    ensure!(
        !products.is_empty(),
        "products",
        "at least one product is required"
    );
    for product in products {
        ensure_eq!(
            format!("{}.consumption", product.name),
            product.consumption.len(),
            capacities.len()
        );
    }
    for constraint in extra_constraints {
        let highest = match *constraint {
            ExtraConstraint::Equal(first, second) => first.max(second),
            ExtraConstraint::Minimum(product, _) => product,
        };
        ensure!(
            highest.0 < products.len(),
            "constraints",
            "{highest} does not exist"
        );
    }

    let n_products = products.len();
    let objective = ObjectiveFunction::maximize(RowDVector::from_iterator(
        n_products,
        products.iter().map(|product| product.profit_per_unit),
    ));
    let constraints = capacities
        .iter()
        .enumerate()
        .map(|(r, resource)| {
            Constraint::new(
                RowDVector::from_iterator(
                    n_products,
                    products
                        .iter()
                        .map(|product| product.consumption_of(ResourceId(r))),
                ),
                Sign::Less,
                resource.capacity,
            )
        })
        .chain(extra_constraints.iter().map(|constraint| match *constraint {
            ExtraConstraint::Equal(first, second) => Constraint::new(
                RowDVector::from_iterator(
                    n_products,
                    (0..n_products).map(|j| {
                        let mut coefficient = 0.;
                        if j == first.0 {
                            coefficient += 1.;
                        }
                        if j == second.0 {
                            coefficient -= 1.;
                        }
                        coefficient
                    }),
                ),
                Sign::Equals,
                0.,
            ),
            ExtraConstraint::Minimum(product, quantity) => Constraint::new(
                RowDVector::from_iterator(
                    n_products,
                    (0..n_products).map(|j| if j == product.0 { 1. } else { 0. }),
                ),
                Sign::Greater,
                quantity,
            ),
        }))
        .collect::<Vec<_>>();

    let problem = simplex::Problem::new(objective, constraints)
        .map_err(|err| DomainError::new(err.to_string()))?;
    log::info!("Problem formed: {problem}");

    match problem.solve() {
        Solution::Finite { variables, .. } => {
            let quantities = variables.iter().map(simplex::to_float).collect();
            let plan = ProductionPlan::from_quantities(products, capacities, quantities);
            log::info!("Optimal plan with total profit {}", plan.total_profit);
            Ok(PlanOutcome::Optimal(plan))
        }
        Solution::Infinite => {
            log::warn!("Production plan is unbounded");
            Ok(PlanOutcome::Infeasible {
                status: SolverStatus::Unbounded,
            })
        }
        Solution::Absent => {
            log::warn!("Production plan is infeasible");
            Ok(PlanOutcome::Infeasible {
                status: SolverStatus::Infeasible,
            })
        }
    }
}

pub struct Planner;

impl Model for Planner {
    const NAME: &'static str = "production-plan";

    type Raw = RawPlanInput;
    type Params = PlanParameters;
    type Output = PlanOutcome;

    fn fields() -> &'static [FieldSpec] {
        &[CAPACITY, CONSUMPTION, PROFIT, MINIMUM]
    }

    fn validate(raw: RawPlanInput) -> Result<PlanParameters, ValidationError> {
        ensure!(
            !raw.resources.is_empty(),
            "resources",
            "at least one resource is required"
        );
        ensure!(
            !raw.products.is_empty(),
            "products",
            "at least one product is required"
        );

        let mut resource_ids = HashMap::with_capacity(raw.resources.len());
        let mut capacities = Vec::with_capacity(raw.resources.len());
        for (r, resource) in raw.resources.into_iter().enumerate() {
            ensure!(
                !resource.name.trim().is_empty(),
                format!("resources.{r}.name"),
                "must not be empty"
            );
            ensure!(
                resource_ids.insert(resource.name.clone(), ResourceId(r)).is_none(),
                format!("resources.{r}.name"),
                "duplicate resource {:?}",
                resource.name
            );
            let capacity =
                CAPACITY.check_as(format!("{}.capacity", resource.name), resource.capacity)?;
            capacities.push(ResourceCapacity::new(resource.name, capacity));
        }

        let mut product_ids = HashMap::with_capacity(raw.products.len());
        let mut products = Vec::with_capacity(raw.products.len());
        for (p, product) in raw.products.into_iter().enumerate() {
            ensure!(
                !product.name.trim().is_empty(),
                format!("products.{p}.name"),
                "must not be empty"
            );
            ensure!(
                product_ids.insert(product.name.clone(), ProductId(p)).is_none(),
                format!("products.{p}.name"),
                "duplicate product {:?}",
                product.name
            );
            let mut consumption = vec![0.; capacities.len()];
            for (resource, amount) in &product.consumption {
                let Some(ResourceId(r)) = resource_ids.get(resource).copied() else {
                    return Err(ValidationError::new(
                        format!("{}.consumption", product.name),
                        format!("unknown resource {resource:?}"),
                    ));
                };
                consumption[r] =
                    CONSUMPTION.check_as(format!("{}.{resource}", product.name), *amount)?;
            }
            let profit = PROFIT.check_as(
                format!("{}.profit_per_unit", product.name),
                product.profit_per_unit,
            )?;
            products.push(ProductSpec::new(product.name, consumption, profit));
        }

        let lookup = |name: &str, c: usize| {
            product_ids.get(name).copied().ok_or_else(|| {
                ValidationError::new(
                    format!("constraints.{c}"),
                    format!("unknown product {name:?}"),
                )
            })
        };
        let mut extra_constraints = raw
            .constraints
            .iter()
            .enumerate()
            .map(|(c, constraint)| match constraint {
                RawConstraint::Equal { first, second } => {
                    Ok(ExtraConstraint::Equal(lookup(first, c)?, lookup(second, c)?))
                }
                RawConstraint::Minimum { product, quantity } => Ok(ExtraConstraint::Minimum(
                    lookup(product, c)?,
                    MINIMUM.check_as(format!("constraints.{c}.quantity"), *quantity)?,
                )),
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;
        if raw.equalize {
            extra_constraints.extend(equalize_all(products.len()));
        }

        log::debug!(
            "Validated {} product(s), {} resource(s), {} extra constraint(s)",
            products.len(),
            capacities.len(),
            extra_constraints.len()
        );
        Ok(PlanParameters::new(products, capacities, extra_constraints))
    }

    fn compute(params: &PlanParameters) -> Result<PlanOutcome, ComputationError> {
        solve_plan(
            &params.products,
            &params.capacities,
            &params.extra_constraints,
        )
    }
}
