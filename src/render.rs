//! Plain-text rendering of model results.

use std::io::{self, Write};

use ops_core::{
    breakeven::{self, BreakEvenParameters, BreakEvenResult},
    forecast::{DemandSeries, ForecastReport},
    inventory::EoqResult,
    planner::PlanOutcome,
    queue::QueueOutcome,
    Curve,
};

use crate::helpers::rounded;

pub fn plan(out: &mut dyn Write, outcome: &PlanOutcome) -> io::Result<()> {
    let plan = match outcome {
        PlanOutcome::Optimal(plan) => plan,
        PlanOutcome::Infeasible { status } => {
            return writeln!(out, "No optimal production plan: the problem is {status}");
        }
    };

    writeln!(out, "{:<16} {:>12} {:>14}", "Product", "Quantity", "Profit")?;
    for planned in &plan.quantities {
        writeln!(
            out,
            "{:<16} {:>12} {:>14}",
            planned.product,
            rounded(planned.quantity),
            rounded(planned.profit)
        )?;
    }
    writeln!(out, "Total profit: {}", rounded(plan.total_profit))?;
    writeln!(out)?;
    writeln!(
        out,
        "{:<16} {:>12} {:>12} {:>12}",
        "Resource", "Used", "Capacity", "Slack"
    )?;
    for usage in &plan.resource_usage {
        writeln!(
            out,
            "{:<16} {:>12} {:>12} {:>12}",
            usage.resource,
            rounded(usage.used),
            rounded(usage.capacity),
            rounded(usage.slack)
        )?;
    }
    Ok(())
}

pub fn eoq(out: &mut dyn Write, result: &EoqResult) -> io::Result<()> {
    writeln!(out, "Optimal order quantity: {}", rounded(result.optimal_quantity))?;
    writeln!(out, "Orders per year:        {}", rounded(result.orders_per_year))?;
    writeln!(out, "Days between orders:    {}", rounded(result.cycle_days))?;
    writeln!(out, "Annual ordering cost:   {}", rounded(result.annual_ordering_cost))?;
    writeln!(out, "Annual holding cost:    {}", rounded(result.annual_holding_cost))?;
    writeln!(out, "Total annual cost:      {}", rounded(result.total_annual_cost))
}

pub fn queue(out: &mut dyn Write, outcome: &QueueOutcome) -> io::Result<()> {
    let result = match outcome {
        QueueOutcome::Stable(result) => result,
        QueueOutcome::Unstable {
            arrival_rate,
            service_rate,
        } => {
            return writeln!(
                out,
                "Unstable queue: arrival rate {} is not below service rate {}, \
                 the line grows without bound",
                rounded(*arrival_rate),
                rounded(*service_rate)
            );
        }
    };

    writeln!(out, "Utilization (ρ):         {}", rounded(result.utilization))?;
    writeln!(out, "Idle probability (P0):   {}", rounded(result.idle_probability))?;
    writeln!(out, "Customers in system (L): {}", rounded(result.mean_in_system))?;
    writeln!(out, "Customers in queue (Lq): {}", rounded(result.mean_in_queue))?;
    writeln!(out, "Time in system (W):      {}", rounded(result.mean_time_in_system))?;
    writeln!(out, "Time in queue (Wq):      {}", rounded(result.mean_time_in_queue))
}

pub fn forecast(
    out: &mut dyn Write,
    series: &DemandSeries,
    report: &ForecastReport,
) -> io::Result<()> {
    let regression = &report.regression;
    writeln!(
        out,
        "Trend: demand = {} + {} * period",
        rounded(regression.model.intercept),
        rounded(regression.model.slope)
    )?;
    writeln!(out, "R²:  {}", rounded(regression.r_squared))?;
    writeln!(out, "MAE: {}", rounded(regression.mean_absolute_error))?;
    writeln!(out)?;

    writeln!(out, "{:>8} {:>12} {:>12}", "Period", "Observed", "Fitted")?;
    for ((period, observed), fitted) in series.iter().zip(&regression.predicted) {
        writeln!(
            out,
            "{:>8} {:>12} {:>12}",
            rounded(period),
            rounded(observed),
            rounded(*fitted)
        )?;
    }
    for point in &regression.future {
        writeln!(
            out,
            "{:>8} {:>12} {:>12}",
            rounded(point.period),
            "",
            rounded(point.demand)
        )?;
    }

    if let Some(average) = &report.moving_average {
        writeln!(out)?;
        writeln!(out, "Moving average ({} periods)", average.window)?;
        writeln!(out, "MAE:           {}", rounded(average.mean_absolute_error))?;
        writeln!(out, "Next forecast: {}", rounded(average.next_forecast))?;
    }
    Ok(())
}

pub fn break_even(out: &mut dyn Write, result: &BreakEvenResult) -> io::Result<()> {
    writeln!(out, "Contribution margin: {}", rounded(result.contribution_margin))?;
    writeln!(out, "Break-even volume:   {}", rounded(result.bep_units))?;
    writeln!(out, "Break-even sales:    {}", rounded(result.bep_sales))
}

/// Revenue, cost and profit side by side, with the region of each volume.
pub fn break_even_chart(
    out: &mut dyn Write,
    params: &BreakEvenParameters,
    curves: &[Curve],
) -> io::Result<()> {
    let Some(first) = curves.first() else {
        return Ok(());
    };

    writeln!(out)?;
    write!(out, "{:>12}", "Units")?;
    for curve in curves {
        write!(out, " {:>14}", curve.name)?;
    }
    writeln!(out, "  Region")?;
    for (i, units) in first.xs().enumerate() {
        write!(out, "{:>12}", rounded(units))?;
        for curve in curves {
            let value = curve.points.get(i).map(|point| rounded(point.y));
            write!(out, " {:>14}", value.unwrap_or_default())?;
        }
        writeln!(out, "  {}", breakeven::region_at(params, units))?;
    }
    Ok(())
}

/// Each curve as its own two-column table.
pub fn curves(out: &mut dyn Write, curves: &[Curve]) -> io::Result<()> {
    for curve in curves {
        writeln!(out)?;
        writeln!(out, "{}", curve.name)?;
        for point in &curve.points {
            writeln!(out, "{:>12} {:>14}", rounded(point.x), rounded(point.y))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use ops_core::{
        breakeven::BreakEven,
        planner::{Planner, RawPlanInput, SolverStatus},
        queue::{self as mm1, Mm1, RawQueueInput},
        Model,
    };
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config;

    fn rendered(f: impl FnOnce(&mut dyn Write) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn optimal_plan_lists_products_and_resources() {
        let raw: RawPlanInput = config::load_scenario(None).unwrap();
        let outcome = Planner::run(raw).unwrap();
        let text = rendered(|out| plan(out, &outcome));

        assert!(text.contains("Total profit: 125000"));
        let vanilla = text
            .lines()
            .find(|line| line.starts_with("Vanilla"))
            .unwrap();
        assert_eq!(
            vanilla.split_whitespace().collect::<Vec<_>>(),
            vec!["Vanilla", "50", "125000"]
        );
        let jam = text.lines().find(|line| line.starts_with("jam")).unwrap();
        assert_eq!(
            jam.split_whitespace().collect::<Vec<_>>(),
            vec!["jam", "75", "80", "5"]
        );
    }

    #[test]
    fn infeasible_plan_names_the_status() {
        let outcome = PlanOutcome::Infeasible {
            status: SolverStatus::Unbounded,
        };
        assert_eq!(
            rendered(|out| plan(out, &outcome)),
            "No optimal production plan: the problem is unbounded\n"
        );
    }

    #[test]
    fn unstable_queue_is_reported_not_failed() {
        let outcome = Mm1::run(RawQueueInput {
            arrival_rate: 6.,
            service_rate: 5.,
        })
        .unwrap();
        assert!(rendered(|out| queue(out, &outcome)).starts_with("Unstable queue"));
    }

    #[test]
    fn curves_print_one_row_per_point() {
        let outcome = mm1::compute_mm1(2., 5.).unwrap();
        let QueueOutcome::Stable(result) = outcome else {
            panic!("expected a stable queue");
        };
        let text = rendered(|out| curves(out, &[mm1::state_probabilities(&result, 2)]));
        assert_eq!(
            text.lines()
                .map(|line| line.split_whitespace().collect::<Vec<_>>())
                .collect::<Vec<_>>(),
            vec![
                vec![],
                vec!["P(n)"],
                vec!["0", "0.6"],
                vec!["1", "0.24"],
                vec!["2", "0.096"],
            ]
        );
    }

    #[test]
    fn break_even_chart_marks_each_region() {
        let params = BreakEvenParameters::new(10_000., 2.5, 5.);
        let result = BreakEven::compute(&params).unwrap();
        let chart = breakeven::chart(&params, &result, 3);
        let text = rendered(|out| break_even_chart(out, &params, &chart));

        let regions = text
            .lines()
            .skip(2)
            .filter_map(|line| line.split_whitespace().last())
            .collect::<Vec<_>>();
        assert_eq!(regions, vec!["loss", "break-even", "profit"]);
    }
}
