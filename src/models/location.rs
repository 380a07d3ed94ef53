use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub ext_id: String,
    #[serde(default)]
    pub vaccine_data: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub location: Coordinates,
    #[serde(default)]
    pub region_external_id: String,
    #[serde(default)]
    pub display_address: String,
}
