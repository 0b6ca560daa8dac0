use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::model::artifacts::{BASELINE_MODEL_FILE, IMPROVED_MODEL_FILE, VECTORIZER_FILE};
use crate::output::charts::{CONFUSION_MATRIX_FILE, IMPROVED_CONFUSION_MATRIX_FILE};
use crate::resolver::fields::FIELD_SAMPLE_SIZE;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_SUMMARY_COLLECTION: &str = "hazard_summaries";

/// Which trained classifier the analytics pass and the server load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelChoice {
    /// Multinomial naive Bayes from `hazardscope improve` (default)
    Improved,
    /// Logistic regression from `hazardscope train`
    Baseline,
}

impl ModelChoice {
    pub fn file_name(self) -> &'static str {
        match self {
            ModelChoice::Improved => IMPROVED_MODEL_FILE,
            ModelChoice::Baseline => BASELINE_MODEL_FILE,
        }
    }

    /// The subcommand that writes this model's artifact.
    pub fn produced_by(self) -> &'static str {
        match self {
            ModelChoice::Improved => "improve",
            ModelChoice::Baseline => "train",
        }
    }

    /// Where `hazardscope evaluate` draws this model's confusion matrix.
    pub fn confusion_matrix_file(self) -> &'static str {
        match self {
            ModelChoice::Improved => IMPROVED_CONFUSION_MATRIX_FILE,
            ModelChoice::Baseline => CONFUSION_MATRIX_FILE,
        }
    }
}

impl FromStr for ModelChoice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "improved" => Ok(ModelChoice::Improved),
            "baseline" => Ok(ModelChoice::Baseline),
            other => Err(format!("expected `improved` or `baseline`, got `{other}`")),
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// Nothing here is secret. The .env file is loaded automatically at startup
/// via dotenvy, so a checkout can keep its paths in one place.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    /// Base URL of the hazard reporting backend
    pub api_url: String,
    /// Where CSV datasets and model artifacts live
    pub data_dir: PathBuf,
    /// Where analytics writes its CSV, charts, and report
    pub output_dir: PathBuf,
    pub model: ModelChoice,
    /// Documents sampled per collection when resolving its text field
    pub sample_size: usize,
    /// Collection that receives the per-hazard summary documents
    pub summary_collection: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every setting has a default; only malformed values are errors.
    pub fn load() -> Result<Self> {
        let model = match env::var("HAZARDSCOPE_MODEL") {
            Ok(raw) => raw
                .parse::<ModelChoice>()
                .map_err(|e| anyhow::anyhow!("HAZARDSCOPE_MODEL: {e}"))?,
            Err(_) => ModelChoice::Improved,
        };

        let sample_size = match env::var("HAZARDSCOPE_SAMPLE_SIZE") {
            Ok(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("HAZARDSCOPE_SAMPLE_SIZE is not a number: {raw}"))?,
            Err(_) => FIELD_SAMPLE_SIZE,
        };
        if sample_size == 0 {
            anyhow::bail!("HAZARDSCOPE_SAMPLE_SIZE must be at least 1");
        }

        Ok(Self {
            db_path: env::var("HAZARDSCOPE_DB_PATH").unwrap_or_else(|_| "./hazardscope.db".to_string()),
            api_url: env::var("HAZARD_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            data_dir: env::var("HAZARDSCOPE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            output_dir: env::var("HAZARDSCOPE_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("analytics_outputs")),
            model,
            sample_size,
            summary_collection: env::var("HAZARDSCOPE_SUMMARY_COLLECTION")
                .unwrap_or_else(|_| DEFAULT_SUMMARY_COLLECTION.to_string()),
        })
    }

    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    pub fn output_file(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }

    pub fn model_path(&self) -> PathBuf {
        self.data_file(self.model.file_name())
    }

    /// Check that the vectorizer and the chosen model have been trained.
    /// Call this before anything that predicts.
    pub fn require_model(&self) -> Result<()> {
        let vectorizer = self.data_file(VECTORIZER_FILE);
        if !vectorizer.exists() {
            anyhow::bail!(
                "Vectorizer not found at {}\n\
                 Run `hazardscope features` to build it.",
                vectorizer.display()
            );
        }
        let model = self.model_path();
        if !model.exists() {
            anyhow::bail!(
                "Model not found at {}\n\
                 Run `hazardscope {}` to train it, or set HAZARDSCOPE_MODEL to the other model.",
                model.display(),
                self.model.produced_by()
            );
        }
        Ok(())
    }

    /// Check that the store file has been created.
    /// Call this before any operation that reads or writes documents.
    pub fn require_store(&self) -> Result<()> {
        if !Path::new(&self.db_path).exists() {
            anyhow::bail!(
                "Store not found at {}\n\
                 Run `hazardscope init` first, or set HAZARDSCOPE_DB_PATH.",
                self.db_path
            );
        }
        Ok(())
    }

    /// Create the output directory if needed.
    pub fn ensure_output_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path) -> Config {
        Config {
            db_path: dir.join("hazardscope.db").display().to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: dir.to_path_buf(),
            output_dir: dir.join("out"),
            model: ModelChoice::Improved,
            sample_size: FIELD_SAMPLE_SIZE,
            summary_collection: DEFAULT_SUMMARY_COLLECTION.to_string(),
        }
    }

    #[test]
    fn test_model_choice_files() {
        assert_eq!(ModelChoice::Improved.file_name(), IMPROVED_MODEL_FILE);
        assert_eq!(ModelChoice::Baseline.produced_by(), "train");
        assert_ne!(
            ModelChoice::Improved.confusion_matrix_file(),
            ModelChoice::Baseline.confusion_matrix_file()
        );
    }

    #[test]
    fn test_model_choice_parses_cli_names() {
        assert_eq!("baseline".parse::<ModelChoice>(), Ok(ModelChoice::Baseline));
        assert_eq!("improved".parse::<ModelChoice>(), Ok(ModelChoice::Improved));
        assert!("bayes".parse::<ModelChoice>().unwrap_err().contains("bayes"));
    }

    #[test]
    fn test_require_model_names_missing_step() {
        let dir = std::env::temp_dir().join(format!("hazardscope-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = config_in(&dir);

        let err = config.require_model().unwrap_err();
        assert!(err.to_string().contains("hazardscope features"));

        std::fs::write(dir.join(VECTORIZER_FILE), "{}").unwrap();
        let err = config.require_model().unwrap_err();
        assert!(err.to_string().contains("hazardscope improve"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_require_store() {
        let config = config_in(Path::new("/nonexistent"));
        assert!(config.require_store().unwrap_err().to_string().contains("hazardscope init"));
    }
}
