// Copyright (C) 2018 Stephane Raux. Distributed under the MIT license.

use crate::Coordinates;
use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Place returned by forward or reverse geocoding.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GeocodeResult {
    #[serde(flatten)]
    pub coordinates: Coordinates,
    pub label: String,
    #[serde(rename = "boundingBox", default,
        skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

/// Geographic extent in degrees.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// Approximate location of an IP address.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct IpLookupResult {
    #[serde(flatten)]
    pub coordinates: Coordinates,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub postal: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub asn: Option<String>,
    #[serde(default)]
    pub org: Option<String>,
}

/// Self-description served at the API root.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ApiInfo {
    pub service: String,
    pub version: String,
    pub description: String,
    pub endpoints: BTreeMap<String, String>,
    pub examples: BTreeMap<String, String>,
    pub clients: BTreeMap<String, String>,
}
