//! Demand forecasting: a least-squares trend line and a trailing moving average.

use derive_new::new;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::{
    ensure, ensure_eq,
    error::{ComputationError, DomainError, ValidationError},
    model::{Curve, FieldSpec, Model},
};

/// A line needs two points.
pub const MIN_POINTS: usize = 2;
pub const DEFAULT_HORIZON: usize = 2;

pub const DEMAND: FieldSpec = FieldSpec::at_least("demand", "Demand per period", 0.);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForecastInput {
    pub demand: Vec<f64>,
    /// Defaults to 1..=n.
    #[serde(default)]
    pub periods: Option<Vec<f64>>,
    #[serde(default = "default_horizon")]
    pub horizon: usize,
    /// Also smooth the series with a moving average of this width.
    #[serde(default)]
    pub window: Option<usize>,
}

fn default_horizon() -> usize {
    DEFAULT_HORIZON
}

/// Demand observations in strictly increasing period order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandSeries {
    periods: Vec<f64>,
    demand: Vec<f64>,
}

impl DemandSeries {
    /// Numbers the observations 1, 2, ..., n.
    pub fn from_demand(demand: Vec<f64>) -> Self {
        Self {
            periods: (1..=demand.len()).map(|period| period as f64).collect(),
            demand,
        }
    }

    pub fn new(periods: Vec<f64>, demand: Vec<f64>) -> Result<Self, ValidationError> {
        ensure_eq!("periods", periods.len(), demand.len());
        for (i, period) in periods.iter().enumerate() {
            ensure!(
                period.is_finite(),
                format!("periods.{i}"),
                "must be a finite number, got {period}"
            );
        }
        for (i, pair) in periods.windows(2).enumerate() {
            ensure!(
                pair[0] < pair[1],
                format!("periods.{}", i + 1),
                "periods must be strictly increasing, got {} after {}",
                pair[1],
                pair[0]
            );
        }
        Ok(Self { periods, demand })
    }

    pub fn len(&self) -> usize {
        self.demand.len()
    }

    pub fn is_empty(&self) -> bool {
        self.demand.is_empty()
    }

    pub fn periods(&self) -> &[f64] {
        &self.periods
    }

    pub fn demand(&self) -> &[f64] {
        &self.demand
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.periods.iter().copied().zip(self.demand.iter().copied())
    }

    fn require_points(&self, required: usize) -> Result<(), ComputationError> {
        if self.len() < required {
            return Err(ComputationError::InsufficientData {
                given: self.len(),
                required,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionModel {
    pub slope: f64,
    pub intercept: f64,
    /// Mean period and mean demand of the fitted series. The line passes
    /// through this point, and predictions are measured from it.
    #[serde(skip)]
    centre: (f64, f64),
}

impl RegressionModel {
    fn through(slope: f64, mean_period: f64, mean_demand: f64) -> Self {
        Self {
            slope,
            intercept: mean_demand - slope * mean_period,
            centre: (mean_period, mean_demand),
        }
    }

    pub fn predict(&self, period: f64) -> f64 {
        let (mean_period, mean_demand) = self.centre;
        mean_demand + self.slope * (period - mean_period)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, new)]
pub struct ForecastPoint {
    pub period: f64,
    pub demand: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub model: RegressionModel,
    /// The line at every observed period.
    pub predicted: Vec<f64>,
    /// The line at the periods following the last observation.
    pub future: Vec<ForecastPoint>,
    pub mean_absolute_error: f64,
    pub r_squared: f64,
}

/// Ordinary least squares over `(period, demand)` pairs.
///
/// Both series are centred on their means first, so periods given as years
/// or timestamps fit as accurately as 1, 2, 3, ...
pub fn fit(series: &DemandSeries) -> Result<RegressionModel, ComputationError> {
    series.require_points(MIN_POINTS)?;

    let periods = DVector::from_column_slice(series.periods());
    let demand = DVector::from_column_slice(series.demand());
    let (mean_period, mean_demand) = (periods.mean(), demand.mean());
    let dx = periods.add_scalar(-mean_period);
    let dy = demand.add_scalar(-mean_demand);

    let sxx = dx.dot(&dx);
    if !(sxx > 0.) || !sxx.is_finite() {
        return Err(DomainError::new("the periods do not vary enough to fit a line").into());
    }

    Ok(RegressionModel::through(
        dx.dot(&dy) / sxx,
        mean_period,
        mean_demand,
    ))
}

pub fn fit_and_predict(
    series: &DemandSeries,
    horizon: usize,
) -> Result<Forecast, ComputationError> {
    let model = fit(series)?;
    log::info!(
        "Fitted demand = {:.3} + {:.3} * period",
        model.intercept,
        model.slope
    );

    let predicted = series
        .periods
        .iter()
        .map(|period| model.predict(*period))
        .collect::<Vec<_>>();
    let last_period = series.periods().last().copied().unwrap_or_default();
    let future = (1..=horizon)
        .map(|step| {
            let period = last_period + step as f64;
            ForecastPoint::new(period, model.predict(period))
        })
        .collect();

    let mean_absolute_error =
        mean_absolute_error(series.iter().map(|(_, y)| y).zip(predicted.iter().copied()));
    let mean = series.demand.iter().sum::<f64>() / series.len() as f64;
    let total = series.demand.iter().map(|y| (y - mean).powi(2)).sum::<f64>();
    let residual = series
        .demand
        .iter()
        .zip(&predicted)
        .map(|(y, fitted)| (y - fitted).powi(2))
        .sum::<f64>();
    // A flat series is fitted exactly
    let r_squared = if total == 0. { 1. } else { 1. - residual / total };

    Ok(Forecast {
        model,
        predicted,
        future,
        mean_absolute_error,
        r_squared,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverage {
    pub window: usize,
    /// `None` until a full window is available.
    pub smoothed: Vec<Option<f64>>,
    pub mean_absolute_error: f64,
    /// The last smoothed value, carried forward one period.
    pub next_forecast: f64,
}

/// Trailing simple moving average; the value at period `t` averages the
/// `window` observations ending at `t`.
pub fn moving_average(
    series: &DemandSeries,
    window: usize,
) -> Result<MovingAverage, ComputationError> {
    if series.is_empty() {
        return Err(ComputationError::InsufficientData {
            given: 0,
            required: 1,
        });
    }
    ensure!(
        (1..=series.len()).contains(&window),
        "window",
        "must be between 1 and {}, got {window}",
        series.len()
    );

    let smoothed = (0..series.len())
        .map(|t| {
            (t + 1 >= window).then(|| {
                series.demand[t + 1 - window..=t].iter().sum::<f64>() / window as f64
            })
        })
        .collect::<Vec<_>>();
    let mean_absolute_error = mean_absolute_error(
        series
            .demand
            .iter()
            .zip(&smoothed)
            .filter_map(|(observed, smoothed)| smoothed.map(|smoothed| (*observed, smoothed))),
    );
    let next_forecast = smoothed
        .last()
        .copied()
        .flatten()
        .ok_or_else(|| DomainError::new("the moving average is empty"))?;

    Ok(MovingAverage {
        window,
        smoothed,
        mean_absolute_error,
        next_forecast,
    })
}

fn mean_absolute_error(pairs: impl Iterator<Item = (f64, f64)>) -> f64 {
    let (sum, count) = pairs.fold((0., 0usize), |(sum, count), (observed, predicted)| {
        (sum + (observed - predicted).abs(), count + 1)
    });
    if count == 0 {
        0.
    } else {
        sum / count as f64
    }
}

/// Observed demand, plus the trend line running through the forecast horizon.
pub fn trend_curves(series: &DemandSeries, forecast: &Forecast) -> Vec<Curve> {
    vec![
        Curve::from_points("observed", series.iter()),
        Curve::from_points(
            "trend",
            series
                .periods
                .iter()
                .copied()
                .zip(forecast.predicted.iter().copied())
                .chain(forecast.future.iter().map(|point| (point.period, point.demand))),
        ),
    ]
}

pub fn moving_average_curve(series: &DemandSeries, average: &MovingAverage) -> Curve {
    Curve::from_points(
        format!("moving average ({})", average.window),
        series
            .periods
            .iter()
            .zip(&average.smoothed)
            .filter_map(|(period, value)| value.map(|value| (*period, value))),
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, new)]
pub struct ForecastParameters {
    pub series: DemandSeries,
    pub horizon: usize,
    pub window: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    pub regression: Forecast,
    pub moving_average: Option<MovingAverage>,
}

pub struct Forecaster;

impl Model for Forecaster {
    const NAME: &'static str = "forecast";

    type Raw = RawForecastInput;
    type Params = ForecastParameters;
    type Output = ForecastReport;

    fn fields() -> &'static [FieldSpec] {
        &[DEMAND]
    }

    fn validate(raw: RawForecastInput) -> Result<ForecastParameters, ValidationError> {
        for (i, demand) in raw.demand.iter().enumerate() {
            DEMAND.check_as(format!("demand.{i}"), *demand)?;
        }
        let series = match raw.periods {
            Some(periods) => DemandSeries::new(periods, raw.demand)?,
            None => DemandSeries::from_demand(raw.demand),
        };
        if let Some(window) = raw.window {
            ensure!(
                (1..=series.len()).contains(&window),
                "window",
                "must be between 1 and {}, got {window}",
                series.len()
            );
        }
        Ok(ForecastParameters::new(series, raw.horizon, raw.window))
    }

    fn compute(params: &ForecastParameters) -> Result<ForecastReport, ComputationError> {
        let regression = fit_and_predict(&params.series, params.horizon)?;
        let moving_average = params
            .window
            .map(|window| moving_average(&params.series, window))
            .transpose()?;
        Ok(ForecastReport {
            regression,
            moving_average,
        })
    }
}
