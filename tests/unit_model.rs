// Unit tests for the classification stack: text cleaning, vectorizing,
// both classifiers, and the batch prediction adapter's label handling.
//
// The adapter tests use small fakes for the vectorizer and classifier so
// they can count model calls and return arbitrary codes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hazardscope::dataset::preprocess::{clean_text, LabelEncoder};
use hazardscope::model::artifacts::{Estimator, ModelBundle};
use hazardscope::model::labels::{LabelTable, UNKNOWN_LABEL};
use hazardscope::model::naive_bayes::{MultinomialNaiveBayes, DEFAULT_ALPHA};
use hazardscope::model::predict::BatchPredictor;
use hazardscope::model::traits::{HazardClassifier, RawPrediction, SparseVector, TextVectorizer};
use hazardscope::model::vectorizer::CountVectorizer;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ============================================================
// Fakes
// ============================================================

struct ConstantVectorizer {
    calls: Arc<AtomicUsize>,
}

impl TextVectorizer for ConstantVectorizer {
    fn transform(&self, texts: &[String]) -> Vec<SparseVector> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        texts.iter().map(|_| SparseVector::default()).collect()
    }

    fn feature_count(&self) -> usize {
        0
    }
}

/// Returns a fixed list of predictions regardless of input.
struct ScriptedClassifier {
    output: Vec<RawPrediction>,
    classes: Option<Vec<String>>,
    calls: Arc<AtomicUsize>,
}

impl HazardClassifier for ScriptedClassifier {
    fn predict(&self, rows: &[SparseVector]) -> Vec<RawPrediction> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.output.iter().take(rows.len()).cloned().collect()
    }

    fn classes(&self) -> Option<&[String]> {
        self.classes.as_deref()
    }
}

fn scripted(output: Vec<RawPrediction>, classes: Option<&[&str]>) -> (BatchPredictor, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let predictor = BatchPredictor::new(
        Arc::new(ConstantVectorizer {
            calls: calls.clone(),
        }),
        Arc::new(ScriptedClassifier {
            output,
            classes: classes.map(strings),
            calls: calls.clone(),
        }),
    );
    (predictor, calls)
}

const SIX: &[&str] = &["cyclone", "earthquake", "fire", "flood", "high waves", "storm surge"];

// ============================================================
// Batch prediction adapter
// ============================================================

#[test]
fn empty_batch_never_touches_the_model() {
    let (predictor, calls) = scripted(vec![RawPrediction::Code(0)], Some(SIX));
    assert!(predictor.predict_labels(&[]).unwrap().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn out_of_range_code_maps_to_unknown() {
    let (predictor, _) = scripted(vec![RawPrediction::Code(7)], Some(SIX));
    assert_eq!(predictor.predict_one("anything").unwrap(), UNKNOWN_LABEL);
}

#[test]
fn negative_code_maps_to_unknown() {
    let (predictor, _) = scripted(vec![RawPrediction::Code(-1)], Some(SIX));
    assert_eq!(predictor.predict_one("anything").unwrap(), UNKNOWN_LABEL);
}

#[test]
fn text_predictions_pass_through_unchanged() {
    let (predictor, _) = scripted(
        vec![RawPrediction::Label("tsunami".to_string()), RawPrediction::Code(3)],
        Some(SIX),
    );
    let labels = predictor.predict_labels(&strings(&["a", "b"])).unwrap();
    assert_eq!(labels, vec!["tsunami", "flood"]);
}

#[test]
fn whole_batch_is_one_model_call() {
    let (predictor, calls) = scripted(vec![RawPrediction::Code(2); 4], Some(SIX));
    let labels = predictor.predict_labels(&strings(&["a", "b", "c", "d"])).unwrap();
    assert_eq!(labels, vec!["fire"; 4]);
    // one vectorizer call plus one classifier call
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn short_classifier_output_is_an_error() {
    let (predictor, _) = scripted(vec![RawPrediction::Code(0)], Some(SIX));
    assert!(predictor.predict_labels(&strings(&["a", "b"])).is_err());
}

#[test]
fn legacy_table_matches_deployed_codes() {
    let table = LabelTable::legacy();
    assert_eq!(table.len(), 6);
    assert_eq!(table.label(0), "cyclone");
    assert_eq!(table.label(5), "storm surge");
    assert_eq!(table.label(6), UNKNOWN_LABEL);
}

// ============================================================
// Preprocessing and vectorizing
// ============================================================

#[test]
fn clean_text_lowercases_and_collapses() {
    assert_eq!(clean_text("Storm\tSURGE!!\n at 6AM"), "storm surge at 6am");
}

#[test]
fn label_encoder_codes_follow_sorted_names() {
    let encoder = LabelEncoder::fit(&["storm surge", "cyclone", "high waves"]);
    assert_eq!(encoder.encode("cyclone"), Some(0));
    assert_eq!(encoder.encode("storm surge"), Some(2));
}

#[test]
fn vectorizer_drops_single_character_tokens() {
    let vectorizer = CountVectorizer::fit(&strings(&["a big wave", "I saw a wave"])).unwrap();
    let vocabulary: Vec<&String> = vectorizer.vocabulary().keys().collect();
    assert_eq!(vocabulary, vec!["big", "saw", "wave"]);

    let rows = vectorizer.transform(&strings(&["Wave WAVE big x"]));
    assert_eq!(rows[0].entries, vec![(0, 1.0), (2, 2.0)]);
}

#[test]
fn vectorizer_ignores_unknown_terms() {
    let vectorizer = CountVectorizer::fit(&strings(&["flood warning"])).unwrap();
    let rows = vectorizer.transform(&strings(&["earthquake tremor"]));
    assert!(rows[0].is_empty());
}

// ============================================================
// Trained bundle through the adapter
// ============================================================

#[test]
fn trained_bundle_predicts_names_through_adapter() {
    let texts = strings(&[
        "thick smoke and flames near the forest",
        "flames spreading to houses",
        "water rising in the streets",
        "flood water entering homes",
    ]);
    let vectorizer = CountVectorizer::fit(&texts).unwrap();
    let rows = vectorizer.transform(&texts);
    let model = MultinomialNaiveBayes::fit(
        &rows,
        &[0, 0, 1, 1],
        2,
        vectorizer.feature_count(),
        DEFAULT_ALPHA,
    )
    .unwrap();
    let bundle = ModelBundle::new(Estimator::NaiveBayes(model), strings(&["fire", "flood"]));

    let predictor = BatchPredictor::new(Arc::new(vectorizer), Arc::new(bundle));
    let labels = predictor
        .predict_labels(&strings(&["Flames everywhere", "The streets have water"]))
        .unwrap();
    assert_eq!(labels, vec!["fire", "flood"]);
}
