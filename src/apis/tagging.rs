//! Loads the category → type → tags reference file and flattens it into the
//! per-type lookup used during conversion.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::{debug, info};

use crate::constants::{TAGGING_URL, USER_AGENT};
use crate::error::{ConvertError, Result};
use crate::types::TagMap;

/// The facility-type tagging reference: a flattened type → tags lookup plus
/// the original category/type structure for drift detection.
#[derive(Debug, Clone, Default)]
pub struct TagReference {
    by_type: HashMap<String, TagMap>,
    combinations: HashMap<String, HashSet<String>>,
}

impl TagReference {
    /// Builds the reference from the parsed document. Flattening is
    /// last-write-wins: a type listed under two categories keeps the tag set
    /// of the category that appears later in the document.
    pub fn from_document(document: &serde_json::Map<String, Value>) -> Result<Self> {
        let mut by_type = HashMap::new();
        let mut combinations: HashMap<String, HashSet<String>> = HashMap::new();

        for (category, types) in document {
            let types = types.as_object().ok_or_else(|| {
                ConvertError::MissingField(format!("category '{category}' is not an object"))
            })?;
            for (type_name, tags) in types {
                let tags = tags.as_object().ok_or_else(|| {
                    ConvertError::MissingField(format!("type '{type_name}' is not an object"))
                })?;
                by_type.insert(type_name.clone(), tags.clone());
                combinations
                    .entry(category.clone())
                    .or_default()
                    .insert(type_name.clone());
            }
        }

        Ok(Self {
            by_type,
            combinations,
        })
    }

    /// Tag pairs for a facility type, in the reference file's order.
    pub fn tags_for(&self, type_description: &str) -> Option<&TagMap> {
        self.by_type.get(type_description)
    }

    /// Whether the exact (category, type) combination exists in the
    /// reference structure.
    pub fn contains_combination(&self, category: &str, type_description: &str) -> bool {
        self.combinations
            .get(category)
            .map(|types| types.contains(type_description))
            .unwrap_or(false)
    }
}

/// Fetches and parses the tagging reference. Any failure is fatal.
pub async fn fetch_tag_reference(client: &reqwest::Client) -> Result<TagReference> {
    info!("Fetching tag reference from {}", TAGGING_URL);
    let document: Value = client
        .get(TAGGING_URL)
        .header("User-Agent", USER_AGENT)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let document = document
        .as_object()
        .ok_or_else(|| ConvertError::MissingField("tag reference root object".to_string()))?;

    let reference = TagReference::from_document(document)?;
    debug!("Loaded tagging for {} facility types", reference.by_type.len());
    Ok(reference)
}
