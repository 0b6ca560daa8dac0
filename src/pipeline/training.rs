// Training stages: preprocess, features, train, evaluate, improve.
//
// Each stage reads the previous stage's artifacts from the data directory
// and writes its own, so they can be rerun independently. A missing input
// is a fatal error naming the command that produces it.

use anyhow::Result;
use colored::Colorize;
use tracing::info;

use crate::config::{Config, ModelChoice};
use crate::dataset::fetch::read_hazards_csv;
use crate::dataset::preprocess::{self, read_clean_csv, write_clean_csv, LabelEncoder};
use crate::dataset::split::{stratified_split, DatasetSplit, SPLIT_SEED, TEST_FRACTION};
use crate::dataset::{CLEAN_CSV, HAZARDS_CSV};
use crate::evaluation::{accuracy, classification_report, confusion_matrix, ClassificationReport};
use crate::model::artifacts::{
    load_json, save_json, Estimator, ModelBundle, BASELINE_MODEL_FILE, IMPROVED_MODEL_FILE,
    LABEL_ENCODER_FILE, SPLIT_FILE, VECTORIZER_FILE,
};
use crate::model::logistic::{LogisticParams, LogisticRegression};
use crate::model::naive_bayes::{MultinomialNaiveBayes, DEFAULT_ALPHA};
use crate::model::traits::TextVectorizer;
use crate::model::vectorizer::CountVectorizer;
use crate::output::charts::write_confusion_matrix;
use crate::output::terminal;

/// Clean hazards.csv and encode its hazard types.
/// Returns (rows kept, rows read).
pub fn run_preprocess(config: &Config) -> Result<(usize, usize)> {
    let raw = read_hazards_csv(&config.data_file(HAZARDS_CSV))?;
    let read = raw.len();
    let (rows, encoder) = preprocess::preprocess(raw);
    if rows.is_empty() {
        anyhow::bail!("No reports with a description in {HAZARDS_CSV}; nothing to train on");
    }

    write_clean_csv(&rows, &config.data_file(CLEAN_CSV))?;
    save_json(&encoder, &config.data_file(LABEL_ENCODER_FILE))?;
    info!(kept = rows.len(), dropped = read - rows.len(), "Preprocessed hazard reports");

    println!("{}", "Label mapping:".bold());
    for (code, name) in encoder.classes().iter().enumerate() {
        println!("  {code} -> {name}");
    }
    Ok((rows.len(), read))
}

/// Fit the vectorizer and write the stratified split.
pub fn run_features(config: &Config) -> Result<DatasetSplit> {
    let rows = read_clean_csv(&config.data_file(CLEAN_CSV))?;
    let encoder: LabelEncoder = load_json(&config.data_file(LABEL_ENCODER_FILE), "preprocess")?;

    let texts: Vec<String> = rows.iter().map(|r| r.description.clone()).collect();
    let labels: Vec<usize> = rows.iter().map(|r| r.label).collect();
    let (vectorizer, split) = build_split(&texts, &labels, encoder.classes())?;

    save_json(&vectorizer, &config.data_file(VECTORIZER_FILE))?;
    save_json(&split, &config.data_file(SPLIT_FILE))?;

    println!(
        "Training samples: {}, Testing samples: {}",
        split.train_rows.len(),
        split.test_rows.len()
    );
    println!("Vocabulary size: {}", split.n_features);
    Ok(split)
}

/// Vectorize texts with a freshly fitted vocabulary and split them.
pub fn build_split(
    texts: &[String],
    labels: &[usize],
    classes: &[String],
) -> Result<(CountVectorizer, DatasetSplit)> {
    if texts.len() != labels.len() {
        anyhow::bail!("{} texts but {} labels", texts.len(), labels.len());
    }
    let vectorizer = CountVectorizer::fit(texts)?;
    let rows = vectorizer.transform(texts);
    let (train, test) = stratified_split(labels, TEST_FRACTION, SPLIT_SEED);
    info!(train = train.len(), test = test.len(), "Split dataset");

    let pick = |indices: &[usize]| {
        (
            indices.iter().map(|&i| rows[i].clone()).collect::<Vec<_>>(),
            indices.iter().map(|&i| labels[i]).collect::<Vec<_>>(),
        )
    };
    let (train_rows, train_labels) = pick(&train);
    let (test_rows, test_labels) = pick(&test);

    let split = DatasetSplit {
        train_rows,
        train_labels,
        test_rows,
        test_labels,
        classes: classes.to_vec(),
        n_features: vectorizer.feature_count(),
    };
    Ok((vectorizer, split))
}

fn load_split(config: &Config) -> Result<DatasetSplit> {
    load_json(&config.data_file(SPLIT_FILE), "features")
}

/// Train/test accuracy of a bundle on a split.
fn accuracies(bundle: &ModelBundle, split: &DatasetSplit) -> (f64, f64) {
    let train = accuracy(&split.train_labels, &bundle.predict_codes(&split.train_rows));
    let test = accuracy(&split.test_labels, &bundle.predict_codes(&split.test_rows));
    (train, test)
}

/// Fit the baseline logistic regression and save it.
pub fn run_train(config: &Config) -> Result<ModelBundle> {
    let split = load_split(config)?;
    let bundle = train_baseline(&split)?;
    let (train_acc, test_acc) = accuracies(&bundle, &split);
    terminal::display_accuracy(train_acc, test_acc);
    save_json(&bundle, &config.data_file(BASELINE_MODEL_FILE))?;
    Ok(bundle)
}

pub fn train_baseline(split: &DatasetSplit) -> Result<ModelBundle> {
    let params = LogisticParams::default();
    let pb = terminal::spinner("Training logistic regression");
    let model = LogisticRegression::fit(
        &split.train_rows,
        &split.train_labels,
        split.classes.len(),
        split.n_features,
        &params,
    )?;
    pb.finish_and_clear();
    Ok(ModelBundle::new(
        Estimator::LogisticRegression(model),
        split.classes.clone(),
    ))
}

/// Report a trained model on the test split and draw its confusion matrix.
/// Each model gets its own matrix file.
pub fn run_evaluate(config: &Config, choice: ModelChoice) -> Result<ClassificationReport> {
    let split = load_split(config)?;
    let bundle: ModelBundle =
        load_json(&config.data_file(choice.file_name()), choice.produced_by())?;
    let predicted = bundle.predict_codes(&split.test_rows);
    info!(model = bundle.estimator.name(), test = predicted.len(), "Evaluating model");

    let report = classification_report(&split.test_labels, &predicted, &split.classes);
    let title = match choice {
        ModelChoice::Baseline => "Classification Report (test data)",
        ModelChoice::Improved => "Classification Report (improved, test data)",
    };
    terminal::display_report(title, &report);

    config.ensure_output_dir()?;
    let matrix = confusion_matrix(&split.test_labels, &predicted, &split.classes);
    let path = config.output_file(choice.confusion_matrix_file());
    write_confusion_matrix(&matrix, &path)?;
    println!("Confusion matrix saved to {}", path.display());
    Ok(report)
}

/// Fit multinomial naive Bayes on the same split, report, and save it.
pub fn run_improve(config: &Config) -> Result<ModelBundle> {
    let split = load_split(config)?;
    let bundle = train_improved(&split)?;
    let predicted = bundle.predict_codes(&split.test_rows);
    let report = classification_report(&split.test_labels, &predicted, &split.classes);
    terminal::display_report("Classification Report (improved, test data)", &report);

    let (train_acc, test_acc) = accuracies(&bundle, &split);
    terminal::display_accuracy(train_acc, test_acc);
    save_json(&bundle, &config.data_file(IMPROVED_MODEL_FILE))?;
    Ok(bundle)
}

pub fn train_improved(split: &DatasetSplit) -> Result<ModelBundle> {
    let pb = terminal::spinner("Training naive Bayes");
    let model = MultinomialNaiveBayes::fit(
        &split.train_rows,
        &split.train_labels,
        split.classes.len(),
        split.n_features,
        DEFAULT_ALPHA,
    )?;
    pb.finish_and_clear();
    Ok(ModelBundle::new(Estimator::NaiveBayes(model), split.classes.clone()))
}
