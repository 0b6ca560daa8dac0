use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use hazardscope::config::{Config, ModelChoice};
use hazardscope::store::DocumentStore;

/// Hazardscope: hazard classification and analytics for disaster request data.
///
/// Trains a text classifier on reported hazards, then finds the request
/// collections in the document store, classifies their free text, and
/// publishes per-hazard counts.
#[derive(Parser)]
#[command(name = "hazardscope", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the document store
    Init,

    /// Fetch hazard reports from the backend into hazards.csv
    Fetch {
        /// Also insert the raw reports into this collection
        #[arg(long, value_name = "COLLECTION")]
        ingest: Option<String>,
    },

    /// Load a JSON array of documents into a collection
    Ingest {
        /// Collection to append to (created if missing)
        collection: String,

        /// Path to a JSON file containing an array of documents
        file: PathBuf,
    },

    /// Clean hazards.csv and encode hazard types
    Preprocess,

    /// Fit the vectorizer and split train/test data
    Features,

    /// Train the baseline logistic regression model
    Train,

    /// Evaluate a trained model on the test split and draw its confusion matrix
    Evaluate {
        /// `baseline` or `improved` (defaults to HAZARDSCOPE_MODEL)
        #[arg(long)]
        model: Option<ModelChoice>,
    },

    /// Train the improved naive Bayes model
    Improve,

    /// Classify every request in the store and publish hazard counts
    Analytics {
        /// Analyze a JSON export (`{"collection": [documents]}`) instead of the store
        #[arg(long, value_name = "FILE")]
        from_json: Option<PathBuf>,
    },

    /// Write a Markdown report from the latest analytics run
    Report,

    /// Start the hazard prediction service
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: 8000)
        #[arg(long, default_value = "8000")]
        port: u16,

        /// Address to bind (default: 127.0.0.1)
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },

    /// Show system status (store contents, trained artifacts, outputs)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hazardscope=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Init => {
            info!("Initializing hazardscope store...");
            let store = hazardscope::store::initialize_sqlite(&config.db_path)?;
            let table_count = store.table_count().await?;
            println!("Store initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nNext: load request data with `hazardscope ingest <collection> <file>`");
            println!("  or fetch reports with `hazardscope fetch`");
        }

        Commands::Fetch { ingest } => {
            let rows = match ingest.as_deref() {
                Some(collection) => {
                    let store = hazardscope::store::initialize_sqlite(&config.db_path)?;
                    let target: (&dyn DocumentStore, &str) = (&store, collection);
                    hazardscope::pipeline::ingest::run_fetch(&config, Some(target)).await?
                }
                None => hazardscope::pipeline::ingest::run_fetch(&config, None).await?,
            };
            if rows > 0 {
                println!("{}", "Next: `hazardscope preprocess`".dimmed());
            }
        }

        Commands::Ingest { collection, file } => {
            config.require_store()?;
            let store = hazardscope::store::open_sqlite(&config.db_path)?;
            let inserted =
                hazardscope::pipeline::ingest::run_ingest(&store, &collection, &file).await?;
            println!("Inserted {inserted} documents into `{collection}`");
        }

        Commands::Preprocess => {
            let (kept, read) = hazardscope::pipeline::training::run_preprocess(&config)?;
            println!(
                "Preprocessed {kept} of {read} reports ({} without a description dropped)",
                read - kept
            );
        }

        Commands::Features => {
            hazardscope::pipeline::training::run_features(&config)?;
        }

        Commands::Train => {
            println!("Training baseline model...");
            hazardscope::pipeline::training::run_train(&config)?;
            println!("{}", "Baseline model saved.".bold());
        }

        Commands::Evaluate { model } => {
            let choice = model.unwrap_or(config.model);
            hazardscope::pipeline::training::run_evaluate(&config, choice)?;
        }

        Commands::Improve => {
            println!("Training improved model...");
            hazardscope::pipeline::training::run_improve(&config)?;
            println!("{}", "Improved model saved.".bold());
        }

        Commands::Analytics { from_json } => {
            config.require_model()?;
            let predictor = hazardscope::pipeline::load_predictor(&config)?;

            let store: Arc<dyn DocumentStore> = match from_json {
                Some(path) => {
                    info!(file = %path.display(), "Analyzing JSON export");
                    Arc::new(hazardscope::pipeline::analytics::load_json_export(&path).await?)
                }
                None => {
                    config.require_store()?;
                    Arc::new(hazardscope::store::open_sqlite(&config.db_path)?)
                }
            };

            let ctx = hazardscope::pipeline::analytics::AnalyticsContext {
                store,
                predictor,
                settings: hazardscope::pipeline::analytics::AnalyticsSettings::from_config(&config),
            };
            let outcome = hazardscope::pipeline::analytics::run(&ctx).await?;

            if !outcome.rows.is_empty() {
                hazardscope::output::terminal::display_prediction_preview(&outcome.rows, 5);
                hazardscope::output::terminal::display_hazard_counts(&outcome.counts);
                for path in &outcome.artifacts {
                    println!("  Saved {}", path.display());
                }
                println!(
                    "  Replaced `{}` with {} summary documents",
                    config.summary_collection, outcome.summaries_written
                );
            }
        }

        Commands::Report => {
            if let Some(path) = hazardscope::pipeline::report::run(&config.output_dir)? {
                println!("Report saved to: {}", path.display());
            }
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            config.require_model()?;
            let predictor = hazardscope::pipeline::load_predictor(&config)?;
            hazardscope::web::run_server(predictor, port, &bind).await?;
        }

        Commands::Status => {
            let store: Option<Arc<dyn DocumentStore>> = match config.require_store() {
                Ok(()) => Some(Arc::new(hazardscope::store::open_sqlite(&config.db_path)?)),
                Err(_) => None,
            };
            hazardscope::status::show(store.as_ref(), &config).await?;
        }
    }

    Ok(())
}
