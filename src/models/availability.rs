use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Body of `POST /public/locations/{extId}/availability`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest<'a> {
    pub end_date: NaiveDate,
    pub start_date: NaiveDate,
    pub vaccine_data: &'a str,
    pub group_size: u32,
    pub dose_number: u32,
    pub url: &'a str,
    pub time_zone: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableDate {
    pub date: String,
    pub available: bool,
    #[serde(default)]
    pub vaccine_data: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationAvailability {
    #[serde(default)]
    pub location_ext_id: String,
    #[serde(default)]
    pub vaccine_data: String,
    #[serde(default)]
    pub availability: Vec<AvailableDate>,
}
