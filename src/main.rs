use advisor::{Advisor, Recommendation};
use chrono::{DateTime, Datelike, Utc};
use clap::Parser;
use configuration::{InputDocument, ResolvedInputs};
use indicatif::{ProgressBar, ProgressStyle};
use projection::{apply_overrides, build_annual_rows, FireCalculationResult, ProjectionEngine};
use serde::Serialize;
use simulation::{CancellationToken, MonteCarloResult, MonteCarloSimulator};
use std::path::Path;
use uuid::Uuid;

/// Household FIRE planning: deterministic projection, recommendations and
/// Monte Carlo simulation.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the input document (TOML). A missing file falls back to the
    /// documented defaults.
    #[arg(long, default_value = "firecast.toml")]
    config: String,

    /// Base seed for the Monte Carlo batch; reruns with the same seed
    /// reproduce the batch exactly.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Emit only the projection and recommendations, without a Monte Carlo
    /// batch.
    #[arg(long)]
    skip_monte_carlo: bool,

    /// Calendar year the projection starts from (defaults to the current
    /// year).
    #[arg(long)]
    as_of_year: Option<i32>,
}

/// The results document handed to the presentation layer: either this full
/// document is produced, or the run fails with a single typed error.
#[derive(Debug, Serialize)]
struct ResultsDocument {
    run_id: Uuid,
    generated_at: DateTime<Utc>,
    calculation: FireCalculationResult,
    recommendations: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    monte_carlo: Option<MonteCarloResult>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let document = if Path::new(&cli.config).exists() {
        configuration::load_config(&cli.config)?
    } else {
        tracing::warn!(path = %cli.config, "input document not found, using defaults");
        InputDocument::default()
    };
    let ResolvedInputs {
        profile,
        items,
        overrides,
        settings,
    } = document.resolve()?;

    let as_of_year = cli.as_of_year.unwrap_or_else(|| Utc::now().year());
    let base_rows = build_annual_rows(&profile, &items, as_of_year)?;
    let rows = apply_overrides(&profile, &base_rows, &items, &overrides)?;

    let engine = ProjectionEngine::new();
    let calculation = engine.calculate(&profile, &rows)?;

    let advisor = Advisor::new(profile.clone(), items.clone(), overrides.clone(), as_of_year);
    let mut recommendations = advisor.recommend()?;

    let monte_carlo = if cli.skip_monte_carlo {
        None
    } else {
        let progress_bar = ProgressBar::new(settings.num_simulations as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
                .progress_chars("=>-"),
        );

        let simulator = MonteCarloSimulator::new();
        let cancel = CancellationToken::new();
        let result = simulator.run(
            &profile,
            &rows,
            &settings,
            cli.seed,
            |completed, _total| progress_bar.set_position(completed as u64),
            &cancel,
        )?;
        progress_bar.finish_with_message("Simulation complete.");

        // Attach a success rate to the leading achievable recommendation by
        // re-running the batch on its adjusted inputs.
        if let Some(rec) = recommendations.iter_mut().find(|r| r.is_achievable) {
            if let Some((adj_profile, adj_items)) = advisor.adjusted_inputs(rec) {
                let adj_rows = build_annual_rows(&adj_profile, &adj_items, as_of_year)?;
                let adj_rows = apply_overrides(&adj_profile, &adj_rows, &adj_items, &overrides)?;
                let adj_result = simulator.run(
                    &adj_profile,
                    &adj_rows,
                    &settings,
                    cli.seed,
                    |_, _| {},
                    &cancel,
                )?;
                rec.monte_carlo_success_rate = Some(adj_result.success_rate);
            }
        }

        Some(result)
    };

    let results = ResultsDocument {
        run_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        calculation,
        recommendations,
        monte_carlo,
    };

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
