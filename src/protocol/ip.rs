// Copyright (C) 2018 Stephane Raux. Distributed under the MIT license.

use crate::{Error, IpLookupResult};
use super::{endpoint_url, parse_envelope, Protocol};
use url::Url;

/// Geolocation of `ip`, or of the caller when `ip` is `None`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct IpLookup<'a> {
    pub(crate) ip: Option<&'a str>,
}

impl Protocol for IpLookup<'_> {
    type Output = Option<IpLookupResult>;

    fn url(&self, base: &str) -> Result<Url, Error> {
        endpoint_url(base, "/ip", &[("ip", self.ip.map(str::to_string))])
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, Error> {
        parse_envelope(body)
    }
}
