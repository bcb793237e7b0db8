/// Endpoint and conversion constants shared across the codebase.

// Data sources
pub const FACILITY_API_URL: &str = "https://fagsystem.anleggsregisteret.no/idrett/api/facilities";
pub const KOMMUNE_API_URL: &str = "https://ws.geonorge.no/kommuneinfo/v1/kommuner";
pub const TAGGING_URL: &str =
    "https://raw.githubusercontent.com/osmno/leisure2osm/master/anleggsregister_kategorier.json";

// The registry rejects requests without a browser-looking header set
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_6) \
    AppleWebKit/605.1.15 (KHTML, like Gecko) Version/11.1.2 Safari/605.1.15";

pub const PAGE_SIZE: u32 = 500;

// Registry sentinels
pub const STATUS_EXISTING: &str = "EXISTING";
pub const TYPE_UNDEFINED: &str = "UDEFINERT";

// Output
pub const OSM_OUTPUT_FILE: &str = "anleggsregister.osm";
pub const CORRECTED_TAGGING_FILE: &str = "anleggsregister_kategorier_new.json";

/// Node ids count downwards from here; the first emitted id is the seed minus one.
pub const NODE_ID_SEED: i64 = -1000;

/// Longitude shifts tried when a point misses its municipality box sideways,
/// one UTM zone is 6 degrees wide.
pub const ZONE_SHIFTS_DEGREES: [i32; 6] = [-18, -12, -6, 6, 12, 18];

/// Placeholder coordinates the registry assigns to some Oslo facilities.
pub const OSLO_PLACEHOLDER_COORDINATES: [(f64, f64); 2] =
    [(59.917201, 10.727413), (59.917112, 10.727424)];
