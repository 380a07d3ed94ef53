use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `POST /public/locations/{extId}/date/{date}/slots`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRequest {
    pub vaccine_data: String,
    pub group_size: u32,
    pub url: String,
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub local_start_time: String,
    pub duration_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRecord {
    #[serde(default)]
    pub location_ext_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(rename = "slotsWithAvailability", default)]
    pub slots: Vec<TimeSlot>,
}

/// date -> slots for one location, the unit written to disk.
/// Ordered so the same records always serialise to the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DateSlotMap(pub BTreeMap<String, Vec<TimeSlot>>);

impl DateSlotMap {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
