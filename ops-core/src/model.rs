//! Boundary between the models and whatever collects their input.
//!
//! The caller gathers one raw number per [`FieldSpec`], asks the model to
//! [`validate`](Model::validate) them, then [`compute`](Model::compute)s the
//! result on an explicit user action. Curves for charting are produced by
//! the per-model sampling functions from the validated parameters.

use std::borrow::Cow;

use derive_new::new;
use serde::Serialize;

use crate::{
    ensure,
    error::{ComputationError, ValidationError},
};

/// Points per curve when the caller does not ask for a specific resolution.
pub const DEFAULT_SAMPLES: usize = 50;

pub trait Model {
    /// Short machine name, used in logs and reports.
    const NAME: &'static str;

    type Raw;
    type Params;
    type Output;

    /// Input fields in display order, with their documented lower bounds.
    fn fields() -> &'static [FieldSpec];

    fn validate(raw: Self::Raw) -> Result<Self::Params, ValidationError>;

    fn compute(params: &Self::Params) -> Result<Self::Output, ComputationError>;

    fn run(raw: Self::Raw) -> Result<Self::Output, ComputationError> {
        log::info!("Running {} model", Self::NAME);
        let params = Self::validate(raw)?;
        Self::compute(&params)
    }
}

/// A labelled numeric input together with its lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub minimum: f64,
    /// `true` when the bound itself is excluded.
    pub strict: bool,
}

impl FieldSpec {
    pub const fn at_least(key: &'static str, label: &'static str, minimum: f64) -> Self {
        Self {
            key,
            label,
            minimum,
            strict: false,
        }
    }

    pub const fn greater_than(key: &'static str, label: &'static str, minimum: f64) -> Self {
        Self {
            key,
            label,
            minimum,
            strict: true,
        }
    }

    pub fn check(&self, value: f64) -> Result<f64, ValidationError> {
        self.check_as(self.key, value)
    }

    /// Same as [`check`](Self::check), reporting the failure under `field`.
    pub fn check_as(
        &self,
        field: impl Into<Cow<'static, str>>,
        value: f64,
    ) -> Result<f64, ValidationError> {
        let field = field.into();
        ensure!(
            value.is_finite(),
            field,
            "must be a finite number, got {value}"
        );
        if self.strict {
            ensure!(
                value > self.minimum,
                field,
                "must be greater than {}, got {value}",
                self.minimum
            );
        } else {
            ensure!(
                value >= self.minimum,
                field,
                "must be at least {}, got {value}",
                self.minimum
            );
        }
        Ok(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, new)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

/// A named series of (x, y) samples for a chart.
#[derive(Debug, Clone, PartialEq, Serialize, new)]
pub struct Curve {
    pub name: Cow<'static, str>,
    pub points: Vec<CurvePoint>,
}

impl Curve {
    /// Evaluates `f` at `samples` evenly spaced points of `[from, to]`,
    /// both ends included.
    pub fn sample(
        name: impl Into<Cow<'static, str>>,
        from: f64,
        to: f64,
        samples: usize,
        f: impl Fn(f64) -> f64,
    ) -> Self {
        let samples = samples.max(2);
        let step = (to - from) / (samples - 1) as f64;
        let points = (0..samples)
            .map(|i| {
                let x = if i + 1 == samples {
                    to
                } else {
                    from + step * i as f64
                };
                CurvePoint::new(x, f(x))
            })
            .collect();
        Self::new(name.into(), points)
    }

    pub fn from_points(
        name: impl Into<Cow<'static, str>>,
        points: impl IntoIterator<Item = (f64, f64)>,
    ) -> Self {
        Self::new(
            name.into(),
            points
                .into_iter()
                .map(|(x, y)| CurvePoint::new(x, y))
                .collect(),
        )
    }

    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|point| point.x)
    }

    pub fn ys(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|point| point.y)
    }
}
