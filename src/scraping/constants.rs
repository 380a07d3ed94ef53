// defaults read by Config::default, override through VAX_* env vars
pub const LOCATIONS_URL: &str =
    "https://raw.githubusercontent.com/CovidEngine/vaxxnzlocations/main/uniqLocations.json";
pub const API_BASE: &str = "https://skl-api.bookmyvaccine.covid19.health.nz";

// booking request inputs
pub const VACCINE_DATA: &str = "WyJhMVQ0YTAwMDAwMEdiVGdFQUsiXQ==";
pub const BOOKING_URL: &str = "https://app.bookmyvaccine.covid19.health.nz/appointment-select";
pub const TIME_ZONE: &str = "Pacific/Auckland";
pub const GROUP_SIZE: u32 = 1;
pub const DOSE_NUMBER: u32 = 1;

// the booking api only answers to this agent
pub const USER_AGENT: &str = "node-fetch/1.0 (+https://github.com/bitinn/node-fetch)";
pub const ACCEPT: &str = "application/JSON";

pub const WINDOW_MONTHS: u32 = 2;
pub const OUTPUT_DIR: &str = "slots";
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
