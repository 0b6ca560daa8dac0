// Collection resolution: maps whatever the store's collections happen to be
// called onto the fixed categories hazard analytics cares about.
//
// Matching runs in three tiers per category: exact (case-insensitive) name
// variants, then the category keyword as a substring. Only if every category came
// up empty does it scan for a handful of generic tokens.

use std::collections::HashSet;

/// One category of the keyword table: the keyword used for substring
/// matching and the exact name variants tried first, in order.
#[derive(Debug, Clone, Copy)]
pub struct CategoryKeywords {
    pub keyword: &'static str,
    pub variants: &'static [&'static str],
}

/// The standard keyword table, in resolution order.
pub const STANDARD_KEYWORDS: &[CategoryKeywords] = &[
    CategoryKeywords {
        keyword: "help",
        variants: &["help_requests", "helprequests", "help"],
    },
    CategoryKeywords {
        keyword: "resource",
        variants: &[
            "resource_requests",
            "resourcerequests",
            "resourcerequest",
            "resource_request",
            "resourceRequests",
        ],
    },
    CategoryKeywords {
        keyword: "service",
        variants: &[
            "service_requests",
            "servicerequests",
            "service_requests",
            "servicerequest",
            "serviceRequests",
        ],
    },
    CategoryKeywords {
        keyword: "donation",
        variants: &["donations", "donation"],
    },
    CategoryKeywords {
        keyword: "emergency",
        variants: &["emergency_reports", "emergencyreports", "emergency"],
    },
    CategoryKeywords {
        keyword: "reports",
        variants: &["reports", "hazardreports", "hazard_reports"],
    },
];

/// Tokens for the last-resort scan when no category matched anything.
pub const GENERIC_TOKENS: &[&str] = &["request", "report", "help", "emergency", "donat"];

/// Choose the collections to analyze from the live catalog.
///
/// Returns catalog names verbatim (original casing), deduplicated with the
/// first occurrence kept. An empty result means there is nothing to analyze.
pub fn resolve_collections(catalog: &[String], table: &[CategoryKeywords]) -> Vec<String> {
    let lowered: Vec<String> = catalog.iter().map(|name| name.to_lowercase()).collect();

    let mut selected = Vec::new();
    for category in table {
        if let Some(index) = match_category(&lowered, category) {
            selected.push(catalog[index].clone());
        }
    }

    if selected.is_empty() {
        selected = lowered
            .iter()
            .enumerate()
            .filter(|(_, name)| GENERIC_TOKENS.iter().any(|token| name.contains(token)))
            .map(|(i, _)| catalog[i].clone())
            .collect();
    }

    dedup_preserving_order(selected)
}

/// Index of the catalog entry a category resolves to, if any.
fn match_category(lowered: &[String], category: &CategoryKeywords) -> Option<usize> {
    let exact = category.variants.iter().find_map(|variant| {
        let variant = variant.to_lowercase();
        lowered.iter().position(|name| *name == variant)
    });

    exact.or_else(|| {
        let keyword = category.keyword.to_lowercase();
        lowered.iter().position(|name| name.contains(&keyword))
    })
}

fn dedup_preserving_order(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
