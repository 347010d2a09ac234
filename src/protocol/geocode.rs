// Copyright (C) 2018 Stephane Raux. Distributed under the MIT license.

use crate::{Error, GeocodeResult};
use super::{endpoint_url, parse_envelope, Protocol};
use url::Url;

/// Single best match for a place name.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Geocode<'a> {
    pub(crate) query: &'a str,
}

impl Protocol for Geocode<'_> {
    type Output = Option<GeocodeResult>;

    fn url(&self, base: &str) -> Result<Url, Error> {
        endpoint_url(base, "/geocode", &[
            ("query", Some(self.query.to_string())),
        ])
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, Error> {
        parse_envelope(body)
    }
}

/// All matches for a place name, optionally capped.
#[derive(Clone, Copy, Debug)]
pub(crate) struct GeocodeSearch<'a> {
    pub(crate) query: &'a str,
    pub(crate) limit: Option<u32>,
}

impl Protocol for GeocodeSearch<'_> {
    type Output = Vec<GeocodeResult>;

    fn url(&self, base: &str) -> Result<Url, Error> {
        endpoint_url(base, "/geocode/search", &[
            ("query", Some(self.query.to_string())),
            ("limit", self.limit.map(|l| l.to_string())),
        ])
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, Error> {
        Ok(parse_envelope(body)?.unwrap_or_default())
    }
}

/// Place at the given coordinates.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Reverse {
    pub(crate) lat: f64,
    pub(crate) lon: f64,
    pub(crate) zoom: Option<u8>,
}

impl Protocol for Reverse {
    type Output = Option<GeocodeResult>;

    fn url(&self, base: &str) -> Result<Url, Error> {
        endpoint_url(base, "/reverse", &[
            ("lat", Some(self.lat.to_string())),
            ("lon", Some(self.lon.to_string())),
            ("zoom", self.zoom.map(|z| z.to_string())),
        ])
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, Error> {
        parse_envelope(body)
    }
}
