//! The conversion pipeline: walks the paginated feed, runs each active
//! facility through normalization, coordinate checking and tag mapping, and
//! emits one OSM node per facility.

pub mod coordinates;
pub mod normalize;
pub mod tagging;

use std::collections::HashMap;
use std::io::Write;

use tracing::{info, warn};

use crate::apis::anleggsregisteret::FacilityFeed;
use crate::apis::tagging::TagReference;
use crate::constants::NODE_ID_SEED;
use crate::error::{ConvertError, Result};
use crate::osm::OsmWriter;
use crate::types::{Facility, FacilityStatus, MunicipalityBoundingBox, OutputRecord};

use self::coordinates::{CheckedCoordinates, CoordinateOutcome};
use self::tagging::DriftDetector;

/// Everything loaded up front before the feed is walked.
pub struct ReferenceData {
    pub tagging: TagReference,
    pub boundaries: HashMap<String, MunicipalityBoundingBox>,
}

/// Run-level counts. The four coordinate counters are mutually exclusive
/// and sum to the number of active facilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunCounters {
    pub total: u64,
    pub inactive: u64,
    pub coordinates_ok: u64,
    pub coordinates_fixed: u64,
    pub coordinates_not_fixed: u64,
    pub no_coordinates: u64,
}

impl RunCounters {
    pub fn active(&self) -> u64 {
        self.total - self.inactive
    }
}

/// Mutable state threaded through a run: counters, the decrementing node id
/// and the drift accumulation.
struct RunContext {
    counters: RunCounters,
    node_id: i64,
    drift: DriftDetector,
}

impl RunContext {
    fn new() -> Self {
        Self {
            counters: RunCounters::default(),
            node_id: NODE_ID_SEED,
            drift: DriftDetector::new(),
        }
    }

    fn next_node_id(&mut self) -> i64 {
        self.node_id -= 1;
        self.node_id
    }

    fn record_outcome(&mut self, outcome: CoordinateOutcome) {
        match outcome {
            CoordinateOutcome::Ok { .. } => self.counters.coordinates_ok += 1,
            CoordinateOutcome::Fixed { .. } => self.counters.coordinates_fixed += 1,
            CoordinateOutcome::NotFixed => self.counters.coordinates_not_fixed += 1,
            CoordinateOutcome::NoCoordinates => self.counters.no_coordinates += 1,
        }
    }

    fn into_summary(self) -> Result<RunSummary> {
        let corrected_mapping = if self.drift.has_drift() {
            Some(self.drift.corrected_document()?)
        } else {
            None
        };
        Ok(RunSummary {
            counters: self.counters,
            undefined_types: self.drift.undefined_types().cloned().collect(),
            structure_changed: self.drift.structure_changed(),
            corrected_mapping,
        })
    }
}

/// What a completed run reports back to the operator.
#[derive(Debug)]
pub struct RunSummary {
    pub counters: RunCounters,
    /// Unknown (category, type) pairs, sorted and deduplicated.
    pub undefined_types: Vec<(String, String)>,
    pub structure_changed: bool,
    /// The corrected tagging reference, serialized, when drift was found.
    pub corrected_mapping: Option<String>,
}

pub struct Converter {
    reference: ReferenceData,
}

impl Converter {
    pub fn new(reference: ReferenceData) -> Self {
        Self { reference }
    }

    /// Walks the feed page by page until the last one, emitting accepted
    /// facilities as they are seen. The output stream is flushed after
    /// every page.
    pub async fn run<W: Write>(
        &self,
        feed: &dyn FacilityFeed,
        writer: &mut OsmWriter<W>,
    ) -> Result<RunSummary> {
        let mut ctx = RunContext::new();
        let mut page_index = 0;

        loop {
            let page = feed.fetch_page(page_index).await?;
            for facility in &page.content {
                self.process_facility(facility, &mut ctx, writer)?;
            }
            writer.flush()?;

            print!("\r{} ", ctx.counters.total);
            std::io::stdout().flush()?;

            if page.last {
                break;
            }
            page_index += 1;
        }

        info!(
            "Converted {} facilities ({} inactive)",
            ctx.counters.total, ctx.counters.inactive
        );
        ctx.into_summary()
    }

    /// Converts one facility into one output node, or counts it away if the
    /// registry no longer marks it as existing.
    fn process_facility<W: Write>(
        &self,
        facility: &Facility,
        ctx: &mut RunContext,
        writer: &mut OsmWriter<W>,
    ) -> Result<()> {
        ctx.counters.total += 1;

        if facility.status != FacilityStatus::Existing {
            ctx.counters.inactive += 1;
            return Ok(());
        }

        let id = ctx.next_node_id();
        let municipality = normalize::normalize_municipality(&facility.municipality_name);
        let checked = self.check_coordinates(facility, &municipality)?;
        ctx.record_outcome(checked.outcome);

        if checked.outcome == CoordinateOutcome::NotFixed {
            warn!(
                "Facility {} has coordinates outside {}/{}",
                facility.facility_id, facility.county_name, municipality
            );
        }

        let mut record = OutputRecord::new(id, checked.latitude, checked.longitude);
        if let Some(diagnostic) = checked.diagnostic() {
            record.push_tag("ERROR", &diagnostic);
        }
        record.push_tag("ref:anlegg", &facility.facility_id.to_string());
        record.push_tag("name", &normalize::normalize_facility_name(&facility.name));
        if let Some(owner) = &facility.owner_name {
            record.push_tag("owner", &normalize::normalize_owner(owner));
        }
        if let Some(operator) = &facility.operator_name {
            record.push_tag("operator", &normalize::normalize_owner(operator));
        }
        record.push_tag("MUNICIPALITY", &municipality);
        record.push_tag("COUNTY", &facility.county_name);
        record.push_tag("CATEGORY", &facility.category_description);
        record.push_tag("TYPE", &facility.type_description);

        tagging::apply_type_tags(
            &mut record,
            &self.reference.tagging,
            &mut ctx.drift,
            &facility.category_description,
            &facility.type_description,
        );

        writer.write_node(&record)?;
        Ok(())
    }

    /// Looks up the municipality box and checks the coordinate pair. A
    /// facility without coordinates never needs the lookup; a facility whose
    /// municipality has no box is a reference-data defect and fatal.
    fn check_coordinates(
        &self,
        facility: &Facility,
        municipality: &str,
    ) -> Result<CheckedCoordinates> {
        match facility.coordinates() {
            None => Ok(coordinates::missing()),
            Some((latitude, longitude)) => {
                let reference = format!("{}/{}", facility.county_name, municipality);
                let bbox = self
                    .reference
                    .boundaries
                    .get(&reference)
                    .ok_or(ConvertError::UnknownMunicipality(reference))?;
                Ok(coordinates::check(latitude, longitude, bbox))
            }
        }
    }
}
