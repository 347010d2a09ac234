// Copyright (C) 2018 Stephane Raux. Distributed under the MIT license.

mod geocode;
mod info;
mod ip;

pub(crate) use self::geocode::{Geocode, GeocodeSearch, Reverse};
pub(crate) use self::info::Info;
pub(crate) use self::ip::IpLookup;

use crate::{Error, ErrorKind};
use serde::de::DeserializeOwned;
use serde_derive::{Deserialize, Serialize};
use url::Url;

/// Request and response shape of one API endpoint.
pub(crate) trait Protocol {
    type Output;

    fn url(&self, base: &str) -> Result<Url, Error>;
    fn parse(&self, body: &[u8]) -> Result<Self::Output, Error>;
}

/// Envelope wrapping the body of every data-bearing endpoint.
///
/// Single-result endpoints carry their payload under `result`, search
/// under `results`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Payload if the server reported success, `None` otherwise. `result`
    /// wins when both keys are present.
    pub fn into_result(self) -> Option<T> {
        if self.success {
            self.result.or(self.results)
        } else {
            None
        }
    }
}

/// Builds `{base}{path}` with the given query pairs, skipping absent ones.
pub(crate) fn endpoint_url(
    base: &str,
    path: &str,
    params: &[(&str, Option<String>)],
) -> Result<Url, Error> {
    let mut url = Url::parse(&format!("{}{}", base, path))?;
    let present = params.iter()
        .filter_map(|(k, v)| v.as_ref().map(|v| (*k, v.as_str())))
        .collect::<Vec<_>>();
    if !present.is_empty() {
        url.query_pairs_mut().extend_pairs(present);
    }
    Ok(url)
}

/// Decodes an enveloped body. An unsuccessful envelope means nothing was
/// found; a body that is not an envelope, empty included, is an error.
pub(crate) fn parse_envelope<T>(body: &[u8]) -> Result<Option<T>, Error>
where
    T: DeserializeOwned,
{
    let envelope = serde_json::from_slice::<ApiResponse<T>>(body)
        .map_err(|e| Error::new(ErrorKind::InvalidResponse, e))?;
    if !envelope.success {
        log::debug!("Server reported failure: {}", envelope.error.as_deref()
            .or_else(|| envelope.message.as_deref())
            .unwrap_or("no detail"));
    }
    Ok(envelope.into_result())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeocodeResult;

    #[test]
    fn endpoint_url_encodes_query_values() {
        let url = endpoint_url("http://host", "/geocode", &[
            ("query", Some("São Paulo & co".to_string())),
        ]).unwrap();
        assert_eq!(url.as_str(),
            "http://host/geocode?query=S%C3%A3o+Paulo+%26+co");
    }

    #[test]
    fn endpoint_url_without_params_has_no_query() {
        let url = endpoint_url("http://host", "/ip", &[("ip", None)]).unwrap();
        assert_eq!(url.as_str(), "http://host/ip");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn endpoint_url_keeps_base_path() {
        let url = endpoint_url("https://host/api/v1", "/health", &[]).unwrap();
        assert_eq!(url.as_str(), "https://host/api/v1/health");
    }

    #[test]
    fn unsuccessful_envelope_is_not_found() {
        let body = br#"{"success":false,"error":"not found"}"#;
        let result = parse_envelope::<GeocodeResult>(body).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn missing_success_flag_is_not_found() {
        let body = br#"{"result":{"lat":1.0,"lon":2.0,"label":"x"}}"#;
        let result = parse_envelope::<GeocodeResult>(body).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn null_result_is_not_found() {
        let body = br#"{"success":true,"result":null}"#;
        let result = parse_envelope::<GeocodeResult>(body).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn search_results_key_is_accepted() {
        let body = br#"{"success":true,"count":1,
            "results":[{"lat":1.5,"lon":2.5,"label":"x"}]}"#;
        let results = parse_envelope::<Vec<GeocodeResult>>(body).unwrap()
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].label, "x");
    }

    #[test]
    fn result_key_wins_over_results() {
        let body = br#"{"success":true,
            "result":[{"lat":1.0,"lon":2.0,"label":"single"}],
            "results":[{"lat":3.0,"lon":4.0,"label":"many"}]}"#;
        let results = parse_envelope::<Vec<GeocodeResult>>(body).unwrap()
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].label, "single");
    }

    #[test]
    fn empty_body_is_invalid_response() {
        let e = parse_envelope::<GeocodeResult>(b"  \n").unwrap_err();
        assert_eq!(e.kind(), &ErrorKind::InvalidResponse);
        let e = parse_envelope::<GeocodeResult>(b"").unwrap_err();
        assert_eq!(e.kind(), &ErrorKind::InvalidResponse);
    }

    #[test]
    fn malformed_body_is_invalid_response() {
        let e = parse_envelope::<GeocodeResult>(b"<html>").unwrap_err();
        assert_eq!(e.kind(), &ErrorKind::InvalidResponse);
    }
}
