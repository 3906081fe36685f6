use std::io::{self, Write};

use anyhow::{Context, Result};
use ops_core::{
    breakeven::{self, BreakEven, RawBreakEvenInput},
    forecast::{self, Forecaster, RawForecastInput},
    inventory::{self, Eoq, RawEoqInput},
    planner::Planner,
    queue::{self, Mm1, QueueOutcome, RawQueueInput},
    Curve, Model,
};
use serde::Serialize;

use crate::{
    cli::{Cli, Command},
    config, render,
};

#[derive(Debug, Serialize)]
struct Report<'a, T> {
    model: &'static str,
    result: &'a T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    curves: Vec<Curve>,
}

/// Writes either the JSON report or the text produced by `text`.
fn report<T: Serialize>(
    out: &mut dyn Write,
    json: bool,
    model: &'static str,
    result: &T,
    curves: Vec<Curve>,
    text: impl FnOnce(&mut dyn Write, &[Curve]) -> io::Result<()>,
) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(
            &mut *out,
            &Report {
                model,
                result,
                curves,
            },
        )?;
        writeln!(out)?;
    } else {
        text(out, &curves)?;
    }
    Ok(())
}

pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let Cli {
        json,
        samples,
        command,
        ..
    } = cli;

    match command {
        Command::Plan { scenario, equalize } => {
            let mut raw = config::load_scenario(scenario.as_deref())?;
            raw.equalize |= equalize;
            let outcome = Planner::run(raw).context("cannot build a production plan")?;
            report(out, json, Planner::NAME, &outcome, vec![], |out, _| {
                render::plan(out, &outcome)
            })
        }
        Command::Eoq {
            demand,
            order_cost,
            holding_cost,
            curve,
        } => {
            let params = Eoq::validate(RawEoqInput {
                annual_demand: demand,
                order_cost,
                holding_cost,
            })?;
            let result = Eoq::compute(&params)?;
            let curves = if curve {
                inventory::cost_curves(&params, &result, samples)
            } else {
                vec![]
            };
            report(out, json, Eoq::NAME, &result, curves, |out, curves| {
                render::eoq(out, &result)?;
                render::curves(out, curves)
            })
        }
        Command::Queue {
            arrival,
            service,
            max_customers,
        } => {
            let params = Mm1::validate(RawQueueInput {
                arrival_rate: arrival,
                service_rate: service,
            })?;
            let outcome = Mm1::compute(&params)?;
            let curves = match &outcome {
                QueueOutcome::Stable(result) => {
                    vec![queue::state_probabilities(result, max_customers)]
                }
                QueueOutcome::Unstable { .. } => vec![],
            };
            report(out, json, Mm1::NAME, &outcome, curves, |out, curves| {
                render::queue(out, &outcome)?;
                render::curves(out, curves)
            })
        }
        Command::Forecast {
            demand,
            periods,
            horizon,
            window,
            curve,
        } => {
            let params = Forecaster::validate(RawForecastInput {
                demand,
                periods,
                horizon,
                window,
            })?;
            let result = Forecaster::compute(&params)?;
            let mut curves = vec![];
            if curve {
                curves = forecast::trend_curves(&params.series, &result.regression);
                if let Some(average) = &result.moving_average {
                    curves.push(forecast::moving_average_curve(&params.series, average));
                }
            }
            report(out, json, Forecaster::NAME, &result, curves, |out, curves| {
                render::forecast(out, &params.series, &result)?;
                render::curves(out, curves)
            })
        }
        Command::BreakEven {
            fixed,
            variable,
            price,
            curve,
        } => {
            let params = BreakEven::validate(RawBreakEvenInput {
                fixed_cost: fixed,
                variable_cost: variable,
                price,
            })?;
            let result = BreakEven::compute(&params)?;
            let curves = if curve {
                breakeven::chart(&params, &result, samples)
            } else {
                vec![]
            };
            report(out, json, BreakEven::NAME, &result, curves, |out, curves| {
                render::break_even(out, &result)?;
                render::break_even_chart(out, &params, curves)
            })
        }
    }
}
