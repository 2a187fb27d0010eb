//! market-synth - synthetic market dataset generator and next-day close model.
//!
//! # Subcommands
//!
//! - `generate`: build the full dataset in memory, then write every table
//!   under `--out`
//! - `train`: derive features from a price CSV, fit, evaluate and save the
//!   model artifact
//! - `predict`: serve next-day close predictions for one or all companies
//! - `companies`: list the companies the model can serve
//! - `serve`: HTTP API over the predictor (`/companies`, `/latest/{company}`,
//!   `/predict`)
//!
//! Nothing is written by `generate` until the catalog, the configuration and
//! every table have been produced successfully.

mod config;

use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use model::{Prediction, Predictor, TrainedModel, train};
use storage::{DatasetWriter, generation_log, read_trade_bars};
use synth::DatasetGenerator;
use tracing::{info, warn};

use crate::config::{GenerateArgs, ModelPaths, QuoteArgs, ServeArgs, TrainArgs};

/// Synthetic NSE/BSE market data and a next-day close price model
#[derive(Parser, Debug)]
#[command(name = "market-synth")]
#[command(about = "Generate synthetic market datasets and train a next-day close model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the dataset directory
    Generate(GenerateArgs),
    /// Train and save the next-day close model
    Train(TrainArgs),
    /// Predict the next close for a company (all companies if omitted)
    Predict {
        /// Company ticker; trimmed and uppercased
        #[arg(value_name = "COMPANY")]
        company: Option<String>,

        #[command(flatten)]
        paths: ModelPaths,

        #[command(flatten)]
        quote: QuoteArgs,

        /// Print predictions as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// List companies the model can serve
    Companies {
        #[command(flatten)]
        paths: ModelPaths,
    },
    /// Serve predictions over HTTP
    Serve {
        #[command(flatten)]
        paths: ModelPaths,

        #[command(flatten)]
        serve: ServeArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => run_generate(&args),
        Commands::Train(args) => run_train(&args),
        Commands::Predict {
            company,
            paths,
            quote,
            json,
        } => run_predict(company.as_deref(), &paths, &quote, json),
        Commands::Companies { paths } => {
            let predictor = load_predictor(&paths)?;
            for company in predictor.companies() {
                println!("{company}");
            }
            Ok(())
        }
        Commands::Serve { paths, serve } => {
            let predictor = load_predictor(&paths)?;
            let config = serve.server_config();
            server::serve(&config, server::AppState::new(predictor))
                .await
                .with_context(|| format!("serving on {}", config.bind_addr()))
        }
    }
}

// ============================================================================
// generate
// ============================================================================

fn run_generate(args: &GenerateArgs) -> Result<()> {
    let catalog = args.load_catalog()?;
    let config = args.generator_config();
    info!(
        out = %args.out.display(),
        seed = config.seed,
        start = %config.start,
        end = %config.end,
        frequency = %config.frequency,
        companies = catalog.companies().len(),
        "generating dataset"
    );

    let dataset = DatasetGenerator::new(&catalog, &config)
        .context("invalid generator configuration")?
        .generate()
        .context("dataset generation failed")?;

    let summary = DatasetWriter::new(args.layout())
        .write(&dataset)
        .with_context(|| format!("writing dataset to {}", args.out.display()))?;
    info!(
        files = summary.files.len(),
        rows = summary.total_rows(),
        "dataset written"
    );

    print!("{}", generation_log(&dataset));
    Ok(())
}

// ============================================================================
// train
// ============================================================================

fn run_train(args: &TrainArgs) -> Result<()> {
    let prices_path = args.paths.prices_path();
    let prices = read_trade_bars(&prices_path)
        .with_context(|| format!("reading prices {}", prices_path.display()))?;
    if prices.bars.is_empty() {
        bail!("no usable rows in {}", prices_path.display());
    }

    let model = train(&prices.bars, &args.train_config()).context("training failed")?;
    model
        .save(&args.paths.model)
        .with_context(|| format!("saving model {}", args.paths.model.display()))?;

    match model.metrics() {
        Some(metrics) => {
            println!("MAE: {:.2}", metrics.mae);
            println!("R2 Score: {:.4}", metrics.r2);
        }
        None => println!("No rows held out; model trained on all samples"),
    }
    println!("Model saved to {}", args.paths.model.display());
    Ok(())
}

// ============================================================================
// predict / companies
// ============================================================================

fn load_predictor(paths: &ModelPaths) -> Result<Predictor> {
    let model = load_model(&paths.model)?;
    let prices_path = paths.prices_path();
    Predictor::from_price_file(model, &prices_path)
        .with_context(|| format!("reading prices {}", prices_path.display()))
}

fn load_model(path: &Path) -> Result<TrainedModel> {
    TrainedModel::load(path).with_context(|| format!("loading model {}", path.display()))
}

fn run_predict(
    company: Option<&str>,
    paths: &ModelPaths,
    quote: &QuoteArgs,
    json: bool,
) -> Result<()> {
    let quote = quote.quote()?;
    let predictor = load_predictor(paths)?;

    let companies: Vec<String> = match company {
        Some(company) => vec![company.to_string()],
        None if quote.is_some() => bail!("a supplied bar needs a COMPANY"),
        None => predictor
            .companies()
            .into_iter()
            .map(str::to_string)
            .collect(),
    };

    let mut failures = 0usize;
    for company in &companies {
        let result = match quote {
            Some(quote) => predictor.predict_from_quote(company, quote),
            None => predictor.predict_next(company),
        };
        match result {
            Ok(prediction) => print_prediction(&prediction, json)?,
            Err(e) => {
                failures += 1;
                warn!(company = %company, error = %e, "prediction unavailable");
                if !json {
                    println!("{company}: {e}");
                }
            }
        }
    }

    if failures > 0 {
        info!(failures, served = companies.len() - failures, "prediction run finished");
    }
    Ok(())
}

fn print_prediction(prediction: &Prediction, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(prediction)?);
    } else {
        println!(
            "{:<12} {}  close {:>10.2}  next {:>10.2}  {}",
            prediction.company,
            prediction.as_of,
            prediction.close,
            prediction.predicted_close,
            prediction.trend
        );
    }
    Ok(())
}
