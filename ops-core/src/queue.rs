//! M/M/1 queue: Poisson arrivals, exponential service, one server.

use derive_more::IsVariant;
use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ComputationError, DomainError, ValidationError},
    model::{Curve, FieldSpec, Model},
};

pub const ARRIVAL_RATE: FieldSpec =
    FieldSpec::greater_than("arrival_rate", "Arrival rate (customers per unit time)", 0.);
pub const SERVICE_RATE: FieldSpec =
    FieldSpec::greater_than("service_rate", "Service rate (customers per unit time)", 0.);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawQueueInput {
    pub arrival_rate: f64,
    pub service_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, new)]
pub struct QueueParameters {
    pub arrival_rate: f64,
    pub service_rate: f64,
}

/// Steady-state statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QueueResult {
    /// ρ = λ / μ
    pub utilization: f64,
    /// L
    pub mean_in_system: f64,
    /// Lq
    pub mean_in_queue: f64,
    /// W
    pub mean_time_in_system: f64,
    /// Wq
    pub mean_time_in_queue: f64,
    /// P0 = 1 - ρ
    pub idle_probability: f64,
}

impl QueueResult {
    /// Probability of exactly `n` customers in the system.
    pub fn probability_of(&self, n: u32) -> f64 {
        self.idle_probability * self.utilization.powf(f64::from(n))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, IsVariant)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum QueueOutcome {
    Stable(QueueResult),
    /// Arrivals keep up with or outpace service, so the queue grows without bound.
    Unstable { arrival_rate: f64, service_rate: f64 },
}

pub fn compute_mm1(arrival_rate: f64, service_rate: f64) -> Result<QueueOutcome, ComputationError> {
    if !(arrival_rate > 0. && service_rate > 0.)
        || !arrival_rate.is_finite()
        || !service_rate.is_finite()
    {
        return Err(DomainError::new(format!(
            "arrival and service rates must be positive, got {arrival_rate} and {service_rate}"
        ))
        .into());
    }
    if arrival_rate >= service_rate {
        log::warn!("Unstable queue: arrival rate {arrival_rate} >= service rate {service_rate}");
        return Ok(QueueOutcome::Unstable {
            arrival_rate,
            service_rate,
        });
    }

    let rho = arrival_rate / service_rate;
    let result = QueueResult {
        utilization: rho,
        mean_in_system: rho / (1. - rho),
        mean_in_queue: rho * rho / (1. - rho),
        mean_time_in_system: 1. / (service_rate - arrival_rate),
        mean_time_in_queue: rho / (service_rate - arrival_rate),
        idle_probability: 1. - rho,
    };
    log::info!("Stable queue with utilization {:.3}", result.utilization);
    Ok(QueueOutcome::Stable(result))
}

/// P(n) for n = 0..=max_customers.
pub fn state_probabilities(result: &QueueResult, max_customers: u32) -> Curve {
    Curve::from_points(
        "P(n)",
        (0..=max_customers).map(|n| (f64::from(n), result.probability_of(n))),
    )
}

pub struct Mm1;

impl Model for Mm1 {
    const NAME: &'static str = "mm1";

    type Raw = RawQueueInput;
    type Params = QueueParameters;
    type Output = QueueOutcome;

    fn fields() -> &'static [FieldSpec] {
        &[ARRIVAL_RATE, SERVICE_RATE]
    }

    fn validate(raw: RawQueueInput) -> Result<QueueParameters, ValidationError> {
        Ok(QueueParameters::new(
            ARRIVAL_RATE.check(raw.arrival_rate)?,
            SERVICE_RATE.check(raw.service_rate)?,
        ))
    }

    fn compute(params: &QueueParameters) -> Result<QueueOutcome, ComputationError> {
        compute_mm1(params.arrival_rate, params.service_rate)
    }
}
