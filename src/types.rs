use serde::Deserialize;

use crate::constants::STATUS_EXISTING;

/// Tag key/value pairs in the order the reference file defines them.
pub type TagMap = serde_json::Map<String, serde_json::Value>;

/// One page of the registry feed.
#[derive(Debug, Clone, Deserialize)]
pub struct FacilityPage {
    pub content: Vec<Facility>,
    pub last: bool,
}

/// Registry lifecycle status. Anything the registry does not mark as
/// existing is skipped by the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum FacilityStatus {
    Existing,
    Inactive,
}

impl From<String> for FacilityStatus {
    fn from(status: String) -> Self {
        if status == STATUS_EXISTING {
            Self::Existing
        } else {
            Self::Inactive
        }
    }
}

/// One facility entry as returned by the registry feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub facility_id: i64,
    pub status: FacilityStatus,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub name: String,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub operator_name: Option<String>,
    pub municipality_name: String,
    pub county_name: String,
    pub category_description: String,
    pub type_description: String,
}

impl Facility {
    /// The facility's coordinate pair, if it has one. The registry stores
    /// missing coordinates as null or 0, both count as absent.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Axis-aligned bounding box around a municipality's boundary polygon,
/// keyed by "county/municipality" in the boundary index.
#[derive(Debug, Clone)]
pub struct MunicipalityBoundingBox {
    /// Kartverket municipality number, e.g. "0301" for Oslo.
    pub code: String,
    pub latitude_min: f64,
    pub latitude_max: f64,
    pub longitude_min: f64,
    pub longitude_max: f64,
}

impl MunicipalityBoundingBox {
    /// An empty box; `extend` must be called at least once before the box
    /// is used for containment checks.
    pub fn new(code: String) -> Self {
        Self {
            code,
            latitude_min: 90.0,
            latitude_max: -90.0,
            longitude_min: 180.0,
            longitude_max: -180.0,
        }
    }

    pub fn extend(&mut self, latitude: f64, longitude: f64) {
        self.latitude_min = self.latitude_min.min(latitude);
        self.latitude_max = self.latitude_max.max(latitude);
        self.longitude_min = self.longitude_min.min(longitude);
        self.longitude_max = self.longitude_max.max(longitude);
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        self.contains_latitude(latitude) && self.contains_longitude(longitude)
    }

    pub fn contains_latitude(&self, latitude: f64) -> bool {
        latitude >= self.latitude_min && latitude <= self.latitude_max
    }

    pub fn contains_longitude(&self, longitude: f64) -> bool {
        longitude >= self.longitude_min && longitude <= self.longitude_max
    }
}

/// One OSM node ready for serialization: a synthetic negative id, final
/// coordinates and the tags in emission order.
#[derive(Debug, Clone)]
pub struct OutputRecord {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub tags: Vec<(String, String)>,
}

impl OutputRecord {
    pub fn new(id: i64, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            latitude,
            longitude,
            tags: Vec::new(),
        }
    }

    /// Appends a tag, dropping empty values the same way the output format
    /// omits them.
    pub fn push_tag(&mut self, key: &str, value: &str) {
        if !value.is_empty() {
            self.tags.push((key.to_string(), value.to_string()));
        }
    }
}
