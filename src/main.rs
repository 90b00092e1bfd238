use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use nestegg::api::{
    ContributionPayload, MortgagePayload, SavingsPayload, ScenarioPayload,
    mortgage_response_from_payload, run_http_server, savings_response_from_payload,
};
use nestegg::core::Currency;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliCurrency {
    Usd,
    Ils,
}

impl From<CliCurrency> for Currency {
    fn from(value: CliCurrency) -> Self {
        match value {
            CliCurrency::Usd => Currency::Usd,
            CliCurrency::Ils => Currency::Ils,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "nestegg",
    about = "Compound-interest savings projector and mortgage risk analyzer"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API
    Serve {
        #[arg(long, env = "NESTEGG_HOST", default_value = "0.0.0.0")]
        host: IpAddr,
        #[arg(long, env = "NESTEGG_PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Project a single savings scenario and print it as JSON
    Savings {
        #[arg(long, default_value_t = 1000.0, help = "Initial amount in the display currency")]
        initial: f64,
        #[arg(long, default_value_t = 20)]
        start_age: u32,
        #[arg(long, default_value_t = 10.0, help = "Annual interest rate in percent")]
        rate: f64,
        #[arg(long, default_value_t = 500.0, help = "Monthly contribution in the display currency")]
        contribution: f64,
        #[arg(long, help = "First contributing age, defaults to --start-age")]
        contribution_from: Option<u32>,
        #[arg(long, default_value_t = 65, help = "Age at which contributions stop")]
        contribution_to: u32,
        #[arg(long, default_value_t = 70)]
        horizon: u32,
        #[arg(long, value_enum, default_value_t = CliCurrency::Usd)]
        currency: CliCurrency,
    },
    /// Amortize a loan and run both risk analyses, printed as JSON
    Mortgage {
        #[arg(long, default_value_t = 1_000_000.0, help = "Loan amount in the display currency")]
        principal: f64,
        #[arg(long, default_value_t = 4.5, help = "Annual interest rate in percent")]
        rate: f64,
        #[arg(long, default_value_t = 30)]
        years: u32,
        #[arg(long, default_value_t = 5.0)]
        prepayment_year: f64,
        #[arg(
            long,
            help = "Market rate at prepayment in percent, defaults to the lowest historical rate"
        )]
        market_rate: Option<f64>,
        #[arg(long, default_value_t = 5.0)]
        update_year: f64,
        #[arg(long, default_value_t = 6.0, help = "Variable rate after the update, in percent")]
        new_rate: f64,
        #[arg(long, value_enum, default_value_t = CliCurrency::Usd)]
        currency: CliCurrency,
    },
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Serialization error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn input_error(e: impl std::fmt::Display) -> ExitCode {
    eprintln!("Invalid input: {e}");
    ExitCode::from(2)
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Serve { host, port } => {
            if let Err(e) = run_http_server(SocketAddr::new(host, port)).await {
                log::error!("server error: {e}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Command::Savings {
            initial,
            start_age,
            rate,
            contribution,
            contribution_from,
            contribution_to,
            horizon,
            currency,
        } => {
            let payload = SavingsPayload {
                scenarios: Some(vec![ScenarioPayload {
                    id: Some("scenario-1".to_string()),
                    name: Some("Scenario 1".to_string()),
                    initial_amount: Some(initial),
                    start_age: Some(start_age),
                    interest_rate: Some(rate),
                    contributions: Some(vec![ContributionPayload {
                        from_age: contribution_from,
                        to_age: Some(contribution_to),
                        amount: Some(contribution),
                    }]),
                }]),
                horizon_age: Some(horizon),
                currency: Some(currency.into()),
            };
            match savings_response_from_payload(payload) {
                Ok(response) => print_json(&response),
                Err(e) => input_error(e),
            }
        }
        Command::Mortgage {
            principal,
            rate,
            years,
            prepayment_year,
            market_rate,
            update_year,
            new_rate,
            currency,
        } => {
            let payload = MortgagePayload {
                principal: Some(principal),
                annual_rate_pct: Some(rate),
                term_years: Some(years),
                currency: Some(currency.into()),
                prepayment_year: Some(prepayment_year),
                market_rate_pct: market_rate,
                update_year: Some(update_year),
                new_rate_pct: Some(new_rate),
            };
            match mortgage_response_from_payload(payload) {
                Ok(response) => print_json(&response),
                Err(e) => input_error(e),
            }
        }
    }
}
