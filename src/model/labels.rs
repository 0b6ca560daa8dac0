// Label tables: map a classifier's numeric codes back to hazard names.
//
// The table comes from the class list bundled in the model artifact, so
// retraining with different classes can't leave it stale. `legacy()` keeps
// the fixed mapping older artifacts were served with, for bundles that
// carry no class list.

/// Label used for any code the table doesn't cover.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Code order the first deployed hazard model was trained with.
pub const LEGACY_LABELS: &[&str] = &[
    "cyclone",
    "earthquake",
    "fire",
    "flood",
    "high waves",
    "storm surge",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelTable {
    names: Vec<String>,
}

impl LabelTable {
    /// Build a table where code `i` maps to `classes[i]`.
    pub fn from_classes<S: AsRef<str>>(classes: &[S]) -> Self {
        Self {
            names: classes.iter().map(|c| c.as_ref().to_string()).collect(),
        }
    }

    pub fn legacy() -> Self {
        Self::from_classes(LEGACY_LABELS)
    }

    /// The name for `code`, or "unknown" when the table has no such entry.
    pub fn label(&self, code: i64) -> &str {
        usize::try_from(code)
            .ok()
            .and_then(|i| self.names.get(i))
            .map(|s| s.as_str())
            .unwrap_or(UNKNOWN_LABEL)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_code() {
        assert_eq!(LabelTable::legacy().label(3), "flood");
    }

    #[test]
    fn test_out_of_range_and_negative_codes_are_unknown() {
        let table = LabelTable::legacy();
        assert_eq!(table.len(), 6);
        assert_eq!(table.label(7), UNKNOWN_LABEL);
        assert_eq!(table.label(6), UNKNOWN_LABEL);
        assert_eq!(table.label(-1), UNKNOWN_LABEL);
    }
}
