// Copyright (C) 2018 Stephane Raux. Distributed under the MIT license.

use crate::{ApiInfo, Error, ErrorKind};
use super::{endpoint_url, Protocol};
use url::Url;

/// Server self-description. Not enveloped; a JSON `null` means absent.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Info;

impl Protocol for Info {
    type Output = Option<ApiInfo>;

    fn url(&self, base: &str) -> Result<Url, Error> {
        endpoint_url(base, "/", &[])
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, Error> {
        serde_json::from_slice(body)
            .map_err(|e| Error::new(ErrorKind::InvalidResponse, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_invalid_response() {
        let e = Info.parse(b"").unwrap_err();
        assert_eq!(e.kind(), &ErrorKind::InvalidResponse);
    }

    #[test]
    fn null_body_is_absent() {
        assert_eq!(Info.parse(b"null").unwrap(), None);
    }

    #[test]
    fn url_is_api_root() {
        assert_eq!(Info.url("http://host").unwrap().as_str(), "http://host/");
    }
}
