//! Municipality boundary data from Kartverket's kommuneinfo service.
//!
//! One list request yields the municipality numbers; one detail request per
//! municipality yields the county name, the Norwegian municipality name and
//! the boundary polygon the bounding box is folded from.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, info};

use crate::constants::{KOMMUNE_API_URL, USER_AGENT};
use crate::error::{ConvertError, Result};
use crate::pipeline::normalize;
use crate::types::MunicipalityBoundingBox;

#[derive(Debug, Deserialize)]
struct MunicipalitySummary {
    kommunenummer: String,
}

#[derive(Debug, Deserialize)]
struct MunicipalityDetail {
    fylkesnavn: String,
    #[serde(rename = "kommunenavnNorsk")]
    kommunenavn_norsk: String,
    kommunenummer: String,
    avgrensningsboks: BoundaryPolygon,
}

#[derive(Debug, Deserialize)]
struct BoundaryPolygon {
    coordinates: Vec<Vec<[f64; 2]>>,
}

pub struct GeonorgeClient {
    client: reqwest::Client,
}

impl Default for GeonorgeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GeonorgeClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Fetches every municipality and returns bounding boxes keyed by
    /// "county/municipality". Any network or parse failure is fatal.
    pub async fn load_bounding_boxes(&self) -> Result<HashMap<String, MunicipalityBoundingBox>> {
        info!("Fetching municipality list from {}", KOMMUNE_API_URL);
        let summaries: Vec<MunicipalitySummary> = self
            .client
            .get(KOMMUNE_API_URL)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut boundaries = HashMap::with_capacity(summaries.len());
        for summary in summaries {
            let detail = self.fetch_detail(&summary.kommunenummer).await?;
            let bbox = bounding_box_from_detail(&detail)?;
            let key = format!(
                "{}/{}",
                detail.fylkesnavn,
                normalize::normalize_municipality(&detail.kommunenavn_norsk)
            );
            debug!("Municipality {} -> {}", detail.kommunenummer, key);
            boundaries.insert(key, bbox);
        }

        info!("Loaded {} municipality bounding boxes", boundaries.len());
        Ok(boundaries)
    }

    async fn fetch_detail(&self, kommunenummer: &str) -> Result<MunicipalityDetail> {
        let url = format!("{KOMMUNE_API_URL}/{kommunenummer}");
        let detail = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(detail)
    }
}

/// Folds the first boundary ring into a bounding box. The ring is closed, so
/// the first vertex repeats as the last and is skipped.
fn bounding_box_from_detail(detail: &MunicipalityDetail) -> Result<MunicipalityBoundingBox> {
    let ring = detail
        .avgrensningsboks
        .coordinates
        .first()
        .filter(|ring| ring.len() > 1)
        .ok_or_else(|| {
            ConvertError::MissingField(format!(
                "boundary ring for municipality {}",
                detail.kommunenummer
            ))
        })?;

    let mut bbox = MunicipalityBoundingBox::new(detail.kommunenummer.clone());
    for &[longitude, latitude] in ring.iter().skip(1) {
        bbox.extend(latitude, longitude);
    }
    Ok(bbox)
}
