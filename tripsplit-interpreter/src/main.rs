use std::{borrow::Cow, fs, path::PathBuf, process};

use clap::{Parser, ValueEnum, builder::BoolishValueParser};
use tracing_subscriber::EnvFilter;
use tripsplit_domain::{SettlementEngine, TripSummaryCalculator, ValidationMode};
use tripsplit_infrastructure::TripSnapshotParser;
use tripsplit_presentation::{SettlementPresenter, SummaryPresenter, format_validation_error};

type CliResult<T> = Result<T, Cow<'static, str>>;

const DEFAULT_TRIP_NAME: &str = "trip";

#[derive(Parser, Debug)]
#[command(name = "tripsplit_interpreter")]
#[command(about = "Settle shared trip expenses from a JSON trip snapshot")]
struct Args {
    /// Trip snapshot (JSON)
    path: PathBuf,

    /// How inconsistent trip data is handled
    #[arg(
        long,
        env = "TRIPSPLIT_VALIDATION",
        value_enum,
        ignore_case = true,
        default_value_t = ValidationArg::Lenient
    )]
    validation: ValidationArg,

    /// Shorthand for `--validation strict`
    #[arg(long)]
    strict: bool,

    /// Also print the spending summary
    #[arg(long, env = "TRIPSPLIT_SUMMARY", value_parser = BoolishValueParser::new())]
    summary: bool,

    /// Print a UPI pay link beside each transfer
    #[arg(long)]
    payment_links: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ValidationArg {
    Lenient,
    Strict,
}

impl From<ValidationArg> for ValidationMode {
    fn from(value: ValidationArg) -> Self {
        match value {
            ValidationArg::Lenient => ValidationMode::Lenient,
            ValidationArg::Strict => ValidationMode::Strict,
        }
    }
}

impl Args {
    fn mode(&self) -> ValidationMode {
        if self.strict {
            ValidationMode::Strict
        } else {
            self.validation.into()
        }
    }
}

fn main() {
    let _ = dotenvy::dotenv();
    init_logging();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> CliResult<()> {
    tracing::debug!(
        path = %args.path.display(),
        mode = ?args.mode(),
        summary = args.summary,
        payment_links = args.payment_links,
        "Parsed interpreter arguments"
    );

    let source = fs::read_to_string(&args.path)
        .map_err(|err| format!("Failed to read '{}': {err}", args.path.display()))?;

    println!("{}", render(&source, args)?);
    Ok(())
}

fn render(source: &str, args: &Args) -> CliResult<String> {
    let snapshot = TripSnapshotParser
        .parse(source)
        .map_err(|err| err.to_string())?;
    let trip = &snapshot.trip;

    let settlement = SettlementEngine::new(args.mode())
        .settle(trip)
        .map_err(|err| format_validation_error(&err))?;

    let mut output = String::new();
    if let Some(name) = snapshot.name.as_deref() {
        output.push_str(&format!("Trip: {name}\n\n"));
    }

    let view = if args.payment_links {
        let trip_name = snapshot.name.as_deref().unwrap_or(DEFAULT_TRIP_NAME);
        SettlementPresenter::render_with_payment_links(&settlement, trip, trip_name)
    } else {
        SettlementPresenter::render_with_members(&settlement, trip)
    };
    output.push_str(&view.to_string());

    if args.summary {
        let duration_days = snapshot.duration_days().unwrap_or(1);
        let summary = TripSummaryCalculator.summarize_over(trip, duration_days);
        output.push('\n');
        output.push_str(&SummaryPresenter::render_with_members(&summary, trip));
    }

    Ok(output)
}
