//! Maps facility types to output tags and tracks drift between the registry
//! and the tagging reference.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::apis::tagging::TagReference;
use crate::constants::TYPE_UNDEFINED;
use crate::error::Result;
use crate::types::{OutputRecord, TagMap};

/// Placeholder tag inserted for types the reference does not know yet.
const FIXME_KEY: &str = "fixme";
const FIXME_VALUE: &str = "Tagging not defined";

/// Accumulates everything the operator needs to reconcile the tagging
/// reference after a run: unknown (category, type) pairs and a corrected
/// copy of the category → type → tags structure.
#[derive(Debug, Default)]
pub struct DriftDetector {
    undefined: BTreeSet<(String, String)>,
    corrected: BTreeMap<String, BTreeMap<String, TagMap>>,
    structure_changed: bool,
}

impl DriftDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one observed (category, type) combination. Known types copy
    /// their reference tags into the corrected structure; unknown types get
    /// a fixme placeholder and land in the undefined set. The undefined
    /// sentinel type is ignored entirely.
    pub fn observe(&mut self, reference: &TagReference, category: &str, type_description: &str) {
        if type_description == TYPE_UNDEFINED {
            return;
        }

        if !reference.contains_combination(category, type_description) {
            self.structure_changed = true;
        }

        let slot = self
            .corrected
            .entry(category.to_string())
            .or_default()
            .entry(type_description.to_string());

        match reference.tags_for(type_description) {
            Some(tags) => {
                slot.or_insert_with(|| tags.clone());
            }
            None => {
                slot.or_insert_with(|| {
                    let mut placeholder = TagMap::new();
                    placeholder.insert(FIXME_KEY.to_string(), Value::String(FIXME_VALUE.to_string()));
                    placeholder
                });
                self.undefined
                    .insert((category.to_string(), type_description.to_string()));
            }
        }
    }

    /// Whether a corrected reference file should be written at all.
    pub fn has_drift(&self) -> bool {
        self.structure_changed || !self.undefined.is_empty()
    }

    pub fn structure_changed(&self) -> bool {
        self.structure_changed
    }

    /// Unknown (category, type) pairs, deduplicated and sorted.
    pub fn undefined_types(&self) -> impl Iterator<Item = &(String, String)> {
        self.undefined.iter()
    }

    /// The corrected reference document, alphabetically sorted at category
    /// and type level, pretty-printed.
    pub fn corrected_document(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.corrected)?)
    }
}

/// Applies type-specific tags to an output record: observes the combination
/// for drift and appends the reference's tag pairs in order, skipping empty
/// values. The undefined sentinel emits nothing.
pub fn apply_type_tags(
    record: &mut OutputRecord,
    reference: &TagReference,
    drift: &mut DriftDetector,
    category: &str,
    type_description: &str,
) {
    if type_description == TYPE_UNDEFINED {
        return;
    }

    drift.observe(reference, category, type_description);

    if let Some(tags) = reference.tags_for(type_description) {
        for (key, value) in tags {
            if let Some(value) = value.as_str() {
                record.push_tag(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reference() -> TagReference {
        let document = json!({
            "Bad": {
                "Svømmebasseng": {
                    "leisure": "swimming_pool",
                    "access": "",
                    "sport": "swimming"
                }
            },
            "Friluftsliv": {
                "Turløype": { "highway": "path" }
            }
        });
        TagReference::from_document(document.as_object().unwrap()).unwrap()
    }

    fn record() -> OutputRecord {
        OutputRecord::new(-1001, 59.9, 10.7)
    }

    #[test]
    fn test_known_type_emits_tags_in_reference_order() {
        let reference = reference();
        let mut drift = DriftDetector::new();
        let mut record = record();

        apply_type_tags(&mut record, &reference, &mut drift, "Bad", "Svømmebasseng");

        // "access" has an empty value and is skipped
        assert_eq!(
            record.tags,
            vec![
                ("leisure".to_string(), "swimming_pool".to_string()),
                ("sport".to_string(), "swimming".to_string()),
            ]
        );
        assert!(!drift.has_drift());
    }

    #[test]
    fn test_undefined_sentinel_emits_nothing() {
        let reference = reference();
        let mut drift = DriftDetector::new();
        let mut record = record();

        apply_type_tags(&mut record, &reference, &mut drift, "Bad", "UDEFINERT");

        assert!(record.tags.is_empty());
        assert!(!drift.has_drift());
    }

    #[test]
    fn test_unknown_type_is_recorded_once() {
        let reference = reference();
        let mut drift = DriftDetector::new();

        for _ in 0..3 {
            let mut record = record();
            apply_type_tags(&mut record, &reference, &mut drift, "Bad", "Badstue");
            assert!(record.tags.is_empty());
        }

        let undefined: Vec<_> = drift.undefined_types().collect();
        assert_eq!(
            undefined,
            vec![&("Bad".to_string(), "Badstue".to_string())]
        );
        assert!(drift.has_drift());
        assert!(drift.structure_changed());
    }

    #[test]
    fn test_known_type_under_new_category_flags_structure_change() {
        let reference = reference();
        let mut drift = DriftDetector::new();
        let mut record = record();

        apply_type_tags(&mut record, &reference, &mut drift, "Bad", "Turløype");

        // Tags still come from the flattened lookup
        assert_eq!(
            record.tags,
            vec![("highway".to_string(), "path".to_string())]
        );
        // The combination is new even though the type is known
        assert!(drift.structure_changed());
        assert_eq!(drift.undefined_types().count(), 0);
    }

    #[test]
    fn test_corrected_document_sorts_and_placeholders() {
        let reference = reference();
        let mut drift = DriftDetector::new();

        drift.observe(&reference, "Friluftsliv", "Turløype");
        drift.observe(&reference, "Bad", "Badstue");
        drift.observe(&reference, "Bad", "Svømmebasseng");

        let document = drift.corrected_document().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&document).unwrap();

        let categories: Vec<&String> = parsed.as_object().unwrap().keys().collect();
        assert_eq!(categories, ["Bad", "Friluftsliv"]);

        let bad: Vec<&String> = parsed["Bad"].as_object().unwrap().keys().collect();
        assert_eq!(bad, ["Badstue", "Svømmebasseng"]);

        assert_eq!(parsed["Bad"]["Badstue"]["fixme"], "Tagging not defined");
        assert_eq!(parsed["Bad"]["Svømmebasseng"]["leisure"], "swimming_pool");
    }
}
