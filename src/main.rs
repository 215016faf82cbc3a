use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead};
use std::path::PathBuf;

use pollution_predictor::index::{Measurement, PollutionCalculator, TemperatureUnit, Weights};
use pollution_predictor::training::trainer::{train_model, TrainConfig};
use pollution_predictor::utils::{input, io as model_io, plot};

#[derive(Parser)]
#[command(name = "pollution_predictor", about = "Air pollution level predictor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the pollution index for one set of readings.
    Predict(PredictArgs),
    /// Fit a regression model on a CSV of measurements.
    Train(TrainArgs),
}

#[derive(Args)]
struct PredictArgs {
    /// SO₂ (µg/m³)
    #[arg(long)]
    so2: Option<f64>,
    /// CO₂ (ppm)
    #[arg(long)]
    co2: Option<f64>,
    /// PM10 (µg/m³)
    #[arg(long)]
    pm10: Option<f64>,
    /// PM2.5 (µg/m³)
    #[arg(long)]
    pm25: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    temperature: Option<f64>,
    /// c, f or k
    #[arg(long)]
    unit: Option<TemperatureUnit>,
    /// RON file overriding the default weight table
    #[arg(long)]
    weights: Option<PathBuf>,
    #[arg(long, default_value = "pollutant_levels.png")]
    chart: PathBuf,
    #[arg(long)]
    no_chart: bool,
}

#[derive(Args)]
struct TrainArgs {
    #[arg(long, default_value = "pollution1.csv")]
    csv: PathBuf,
    #[arg(long, default_value = "pollution_predictor.bin")]
    model: PathBuf,
    #[arg(long, default_value = "training_plot.png")]
    plot: PathBuf,
    #[arg(long, default_value_t = 1000)]
    epochs: usize,
    #[arg(long, default_value_t = 0.05)]
    learning_rate: f64,
    #[arg(long, default_value_t = 0.2)]
    test_size: f64,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Predict(args) => predict(args),
        Command::Train(args) => train(args),
    }
}

fn reading<R: BufRead>(stdin: &mut R, given: Option<f64>, prompt: &str) -> Result<f64> {
    match given {
        Some(v) => flag_value(input::check_concentration(v), prompt),
        None => input::get_concentration(stdin, prompt),
    }
}

fn temperature_reading<R: BufRead>(
    stdin: &mut R,
    given: Option<f64>,
    unit: TemperatureUnit,
) -> Result<f64> {
    let prompt = format!("Temperature ({}): ", unit);
    match given {
        Some(t) => flag_value(input::check_number(t), &prompt),
        None => input::get_input(stdin, &prompt),
    }
}

fn flag_value(checked: Result<f64, String>, prompt: &str) -> Result<f64> {
    checked.map_err(|msg| anyhow!("{}: {}", prompt.trim_end_matches(": "), msg))
}

fn predict(args: PredictArgs) -> Result<()> {
    let weights = match &args.weights {
        Some(path) => Weights::load(path)?,
        None => Weights::default(),
    };
    let calculator = PollutionCalculator::new(weights);

    let mut stdin = io::stdin().lock();
    let so2 = reading(&mut stdin, args.so2, "SO₂ (µg/m³): ")?;
    let co2 = reading(&mut stdin, args.co2, "CO₂ (ppm): ")?;
    let pm10 = reading(&mut stdin, args.pm10, "PM10 (µg/m³): ")?;
    let pm25 = reading(&mut stdin, args.pm25, "PM2.5 (µg/m³): ")?;
    let unit = match args.unit {
        Some(unit) => unit,
        None => input::get_unit(&mut stdin)?,
    };
    let temperature = temperature_reading(&mut stdin, args.temperature, unit)?;

    let assessment = calculator.assess(&Measurement { so2, co2, pm10, pm25, temperature, unit });
    log::debug!("{:?}", assessment);

    println!("\nPredicted Pollution Level Index: {:.2}", assessment.index);
    println!("\nCalculation Details:\n{}", assessment);
    println!("\nInterpretation:\nAir Quality: {}", assessment.band.interpretation());

    if !args.no_chart {
        plot::draw_pollutant_chart(&assessment, &args.chart)
            .with_context(|| format!("drawing chart to {}", args.chart.display()))?;
        println!("\nPollutant chart saved to {}", args.chart.display());
    }

    println!("\nThis is a demo using fixed weights. For real predictions, integrate with a trained ML model.");
    Ok(())
}

fn train(args: TrainArgs) -> Result<()> {
    let config = TrainConfig {
        csv_path: args.csv,
        model_path: args.model,
        plot_path: Some(args.plot),
        epochs: args.epochs,
        learning_rate: args.learning_rate,
        test_size: args.test_size,
        seed: args.seed,
    };

    let (model, _) = train_model(&config)?;
    model_io::save_model(&config.model_path, &model)?;

    println!(
        "Model trained and saved successfully to {} (test RMSE {:.3}, R² {:.3})",
        config.model_path.display(),
        model.test_rmse,
        model.test_r2
    );
    Ok(())
}
