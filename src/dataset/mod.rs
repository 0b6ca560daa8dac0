// Training data: fetching hazard reports, cleaning them, and splitting
// them into train and test partitions.

pub mod fetch;
pub mod preprocess;
pub mod split;

/// Raw reports as fetched from the backend.
pub const HAZARDS_CSV: &str = "hazards.csv";
/// Reports after cleaning and label encoding.
pub const CLEAN_CSV: &str = "hazards_clean.csv";
