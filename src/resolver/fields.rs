// Field resolution: picks the attribute holding free text for one collection.
//
// Works from a bounded sample rather than the full collection. A text field
// that is rare in the sample can be missed; that is the accepted cost of
// keeping resolution cheap on large collections.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::store::models::{Document, ID_FIELD};

/// Default number of documents sampled per collection.
pub const FIELD_SAMPLE_SIZE: usize = 200;

/// Attribute names that usually hold free text, most likely first.
pub const FIELD_PRIORITIES: &[&str] = &[
    "description",
    "details",
    "request_details",
    "message",
    "text",
    "report",
    "desc",
    "body",
    "note",
];

/// Choose the text attribute for a collection from a sample of its documents.
///
/// 1. The first priority name present on any sampled document wins.
/// 2. Otherwise the attribute most often holding a non-blank string wins,
///    ties going to whichever attribute the scan met first.
/// 3. Otherwise there is no usable field and the collection should be skipped.
pub fn resolve_field<S: AsRef<str>>(sample: &[Document], priorities: &[S]) -> Option<String> {
    let present: HashSet<&str> = sample.iter().flat_map(|doc| doc.keys()).collect();

    if let Some(field) = priorities
        .iter()
        .map(|p| p.as_ref())
        .find(|p| present.contains(p))
    {
        return Some(field.to_string());
    }

    most_frequent_text_field(sample)
}

/// Tally non-blank string attributes across the sample.
fn most_frequent_text_field(sample: &[Document]) -> Option<String> {
    // Counts in first-seen order, so a strict > comparison keeps the earliest on ties
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for doc in sample {
        for (key, value) in &doc.fields {
            // Identifiers are strings in exported data but never request text
            if key == ID_FIELD || !is_nonblank_string(value) {
                continue;
            }
            match index.get(key.as_str()) {
                Some(&i) => order[i].1 += 1,
                None => {
                    index.insert(key.as_str(), order.len());
                    order.push((key.as_str(), 1));
                }
            }
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for &(key, count) in &order {
        let better = match best {
            None => true,
            Some((_, top)) => count > top,
        };
        if better {
            best = Some((key, count));
        }
    }
    best.map(|(key, _)| key.to_string())
}

fn is_nonblank_string(value: &Value) -> bool {
    value.as_str().is_some_and(|s| !s.trim().is_empty())
}
