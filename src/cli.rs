use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use ops_core::{forecast::DEFAULT_HORIZON, DEFAULT_SAMPLES};

/// Longest state probability table the queue command prints.
pub const MAX_CUSTOMERS: i64 = 1000;

#[derive(Debug, Parser)]
#[command(name = "icecream-ops", version)]
#[command(about = "Operations-research toolkit for a small ice-cream factory")]
pub struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG overrides the default
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print the result as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Points per sampled curve
    #[arg(long, global = true, default_value_t = DEFAULT_SAMPLES)]
    pub samples: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Find the most profitable production mix
    Plan {
        /// JSON scenario file; the built-in ice-cream scenario when omitted
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Force every product to the same quantity
        #[arg(long)]
        equalize: bool,
    },

    /// Economic order quantity
    Eoq {
        /// Annual demand in units
        #[arg(long, allow_negative_numbers = true)]
        demand: f64,

        /// Cost of placing one order
        #[arg(long, allow_negative_numbers = true)]
        order_cost: f64,

        /// Holding cost per unit per year
        #[arg(long, allow_negative_numbers = true)]
        holding_cost: f64,

        /// Also print the cost curves around the optimum
        #[arg(long)]
        curve: bool,
    },

    /// M/M/1 queue statistics
    Queue {
        /// Customers arriving per unit time (λ)
        #[arg(long, allow_negative_numbers = true)]
        arrival: f64,

        /// Customers served per unit time (μ)
        #[arg(long, allow_negative_numbers = true)]
        service: f64,

        /// Largest queue length in the state probability table
        #[arg(
            long,
            default_value_t = 10,
            value_parser = clap::value_parser!(u32).range(0..=MAX_CUSTOMERS)
        )]
        max_customers: u32,
    },

    /// Fit a demand trend and forecast the next periods
    Forecast {
        /// Observed demand, comma separated
        #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
        demand: Vec<f64>,

        /// Period of each observation, comma separated; 1, 2, ... when omitted
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        periods: Option<Vec<f64>>,

        /// Periods to forecast past the last observation
        #[arg(long, default_value_t = DEFAULT_HORIZON)]
        horizon: usize,

        /// Also smooth the series with a moving average of this width
        #[arg(long)]
        window: Option<usize>,

        /// Also print the observed and fitted series
        #[arg(long)]
        curve: bool,
    },

    /// Break-even volume for a single product
    BreakEven {
        /// Fixed cost
        #[arg(long, allow_negative_numbers = true)]
        fixed: f64,

        /// Variable cost per unit
        #[arg(long, allow_negative_numbers = true)]
        variable: f64,

        /// Selling price per unit
        #[arg(long, allow_negative_numbers = true)]
        price: f64,

        /// Also print revenue, cost and profit over the volume range
        #[arg(long)]
        curve: bool,
    },
}
