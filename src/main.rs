use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;

use cinemerge::config::Config;
use cinemerge::logging;
use cinemerge::pipeline::{
    run_enrich_stage, run_full_pipeline, run_ingest_stage, run_reconcile_stage, InputPaths,
};
use cinemerge::storage::{JsonFileStore, SnapshotStore};

#[derive(Parser)]
#[command(name = "cinemerge")]
#[command(about = "Movie metadata reconciliation pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the lookup-table configuration
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Directory holding the stage snapshots
    #[arg(long, default_value = "snapshots")]
    snapshot_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load raw source documents and award ledgers into the first snapshot
    Ingest {
        /// Directory holding the raw input documents
        #[arg(long, default_value = "data")]
        input_dir: PathBuf,
    },
    /// Reconcile the ingested snapshots into canonical movies
    Reconcile,
    /// Fill the derived award and proportion columns
    Enrich,
    /// Run ingest, reconcile and enrich sequentially
    Run {
        /// Directory holding the raw input documents
        #[arg(long, default_value = "data")]
        input_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let store: Arc<dyn SnapshotStore> = Arc::new(JsonFileStore::new(&cli.snapshot_dir)?);

    match cli.command {
        Commands::Ingest { input_dir } => {
            println!("🔄 Running ingest stage...");
            let input = InputPaths::from_dir(&input_dir);
            match run_ingest_stage(store.as_ref(), &input, &config).await {
                Ok(stats) => {
                    println!("\n📊 Ingest results:");
                    println!("   Movie records: {}", stats.omdb_records);
                    println!("   Provider records: {}", stats.tmdb_records);
                    println!("   People: {} ({} dropped)", stats.people, stats.people_dropped);
                    println!("   Soundtrack credit rows: {}", stats.soundtrack_rows);
                    println!(
                        "   Ledger records: {} / {} / {} ({} rows skipped)",
                        stats.oscar_records,
                        stats.golden_globe_records,
                        stats.grammy_records,
                        stats.ledger_rows_skipped
                    );
                }
                Err(e) => {
                    error!("Ingest stage failed: {}", e);
                    println!("❌ Ingest stage failed: {}", e);
                }
            }
        }
        Commands::Reconcile => {
            println!("🔗 Running reconcile stage...");
            match run_reconcile_stage(store.as_ref(), &config).await {
                Ok(stats) => {
                    println!("\n📊 Reconcile results:");
                    println!("   Input records: {}", stats.input_records);
                    println!("   Canonical movies: {}", stats.reconciled_movies);
                    println!("   Duplicates merged: {}", stats.duplicates_merged);
                    println!(
                        "   Dropped: {} missing-field, {} TV entries",
                        stats.dropped_missing_field, stats.dropped_tv_type
                    );
                    println!("   Ambiguous matches: {}", stats.ambiguous_matches);
                    println!("   Follow-up titles: {}", stats.follow_up_titles);
                }
                Err(e) => {
                    error!("Reconcile stage failed: {}", e);
                    println!("❌ Reconcile stage failed: {}", e);
                }
            }
        }
        Commands::Enrich => {
            println!("🏆 Running enrich stage...");
            match run_enrich_stage(store.as_ref()).await {
                Ok(stats) => {
                    println!("\n📊 Enrich results:");
                    println!("   Movies enriched: {}", stats.movies);
                    println!("   With prior awards: {}", stats.movies_with_prior_awards);
                    println!("   Roster size: {}", stats.roster_size);
                }
                Err(e) => {
                    error!("Enrich stage failed: {}", e);
                    println!("❌ Enrich stage failed: {}", e);
                }
            }
        }
        Commands::Run { input_dir } => {
            println!("🎬 Running full pipeline...");
            let input = InputPaths::from_dir(&input_dir);
            match run_full_pipeline(store.as_ref(), &input, &config).await {
                Ok(summary) => {
                    println!("\n✅ Pipeline complete");
                    println!(
                        "   {} raw records → {} canonical movies",
                        summary.reconcile.input_records, summary.reconcile.reconciled_movies
                    );
                    println!(
                        "   Dropped: {} missing-field, {} TV entries; {} follow-up titles",
                        summary.reconcile.dropped_missing_field,
                        summary.reconcile.dropped_tv_type,
                        summary.reconcile.follow_up_titles
                    );
                    println!(
                        "   Enriched {} movies against a roster of {}",
                        summary.enrich.movies, summary.enrich.roster_size
                    );
                }
                Err(e) => {
                    error!("Pipeline failed: {}", e);
                    println!("❌ Pipeline failed: {}", e);
                }
            }
        }
    }

    Ok(())
}
