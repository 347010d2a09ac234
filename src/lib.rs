// Copyright (C) 2018 Stephane Raux. Distributed under the MIT license.

//! Blocking client for the quick-geocode REST API.
//!
//! ```no_run
//! use quick_geocode_client::GeocodeClient;
//!
//! let client = GeocodeClient::new("http://localhost:3000")?;
//! if let Some(place) = client.geocode("Sydney, Australia")? {
//!     println!("{} {}", place.coordinates.latitude, place.label);
//! }
//! # Ok::<(), quick_geocode_client::Error>(())
//! ```

#![deny(warnings)]

mod client;
mod config;
mod err;
mod model;
mod protocol;

pub use crate::client::GeocodeClient;
pub use crate::config::Config;
pub use crate::err::{Error, ErrorKind};
pub use crate::model::{ApiInfo, BoundingBox, GeocodeResult, IpLookupResult};
pub use crate::protocol::ApiResponse;

use serde_derive::{Deserialize, Serialize};

/// Latitude and longitude in degrees.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Coordinates {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}
