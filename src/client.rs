// Copyright (C) 2018 Stephane Raux. Distributed under the MIT license.

use crate::protocol::{self, Geocode, GeocodeSearch, Info, IpLookup, Protocol,
    Reverse};
use crate::{ApiInfo, Config, Error, ErrorKind, GeocodeResult, IpLookupResult};
use hyper::body::Bytes;
use hyper::client::HttpConnector;
use hyper::header::{HeaderValue, ACCEPT, USER_AGENT};
use hyper::{Body, Request, Response, StatusCode, Uri};
use hyper_tls::HttpsConnector;
use serde_derive::Deserialize;
use std::time::Duration;
use tokio::runtime::Runtime;
use url::Url;

/// Blocking client for a quick-geocode server.
///
/// Every call issues exactly one GET request and blocks until it completes.
/// The client can be shared between threads. It drives its requests on a
/// private runtime, so it must not be called or dropped from within an
/// async context.
#[derive(Debug)]
pub struct GeocodeClient {
    base_url: String,
    user_agent: HeaderValue,
    read_timeout: Duration,
    write_timeout: Duration,
    http: hyper::Client<HttpsConnector<HttpConnector>>,
    runtime: Runtime,
}

impl GeocodeClient {
    /// Client with default settings talking to `base_url`.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Config::default().base_url(base_url).build()
    }

    pub(crate) fn from_config(config: Config) -> Result<Self, Error> {
        let base_url = config.get_base_url().to_string();
        let parsed = Url::parse(&base_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::new(ErrorKind::InvalidUrl,
                format!("Unsupported scheme in {}", base_url)));
        }
        let user_agent = HeaderValue::from_str(config.get_user_agent())
            .map_err(|e| Error::new(ErrorKind::InvalidConfig, e))?;
        let mut connector = HttpConnector::new();
        connector.enforce_http(false);
        connector.set_connect_timeout(Some(config.get_connect_timeout()));
        let http = hyper::Client::builder()
            .build::<_, Body>(HttpsConnector::new_with_connector(connector));
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("quick-geocode-client")
            .enable_all()
            .build()
            .map_err(|e| Error::new(ErrorKind::Network, e))?;
        Ok(GeocodeClient {
            base_url,
            user_agent,
            read_timeout: config.get_read_timeout(),
            write_timeout: config.get_write_timeout(),
            http,
            runtime,
        })
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.to_str().unwrap_or_default()
    }

    /// Best match for a place name, `None` if the server found nothing.
    pub fn geocode(&self, query: &str)
        -> Result<Option<GeocodeResult>, Error>
    {
        self.call(Geocode {query})
    }

    /// All matches for a place name. Never fails on "nothing found", the
    /// list is just empty.
    pub fn geocode_search(&self, query: &str, limit: Option<u32>)
        -> Result<Vec<GeocodeResult>, Error>
    {
        self.call(GeocodeSearch {query, limit})
    }

    /// Place at the given coordinates. `zoom` (0-18) sets the level of
    /// detail and is sent as is.
    pub fn reverse_geocode(&self, lat: f64, lon: f64, zoom: Option<u8>)
        -> Result<Option<GeocodeResult>, Error>
    {
        self.call(Reverse {lat, lon, zoom})
    }

    /// Geolocation of `ip`, or of this machine's public address if `None`.
    pub fn lookup_ip(&self, ip: Option<&str>)
        -> Result<Option<IpLookupResult>, Error>
    {
        self.call(IpLookup {ip})
    }

    /// Whether the server answers its health endpoint with a success status.
    pub fn health_check(&self) -> bool {
        let url = match protocol::endpoint_url(&self.base_url, "/health", &[])
        {
            Ok(url) => url,
            Err(e) => {
                log::debug!("Health check URL error: {}", e);
                return false;
            }
        };
        let status = self.runtime.block_on(async {
            self.send(&url).await.map(|response| response.status())
        });
        match status {
            Ok(status) if status.is_success() => true,
            Ok(status) => {
                log::debug!("Health check of {} returned {}", url, status);
                false
            }
            Err(e) => {
                log::debug!("Health check of {} failed: {}", url, e);
                false
            }
        }
    }

    pub fn api_info(&self) -> Result<Option<ApiInfo>, Error> {
        self.call(Info)
    }

    fn call<P: Protocol>(&self, proto: P) -> Result<P::Output, Error> {
        let url = proto.url(&self.base_url)?;
        let body = self.runtime.block_on(self.fetch(&url))?;
        proto.parse(&body)
    }

    async fn send(&self, url: &Url) -> Result<Response<Body>, Error> {
        let uri = url.as_str().parse::<Uri>()?;
        let request = Request::get(uri)
            .header(USER_AGENT, self.user_agent.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .body(Body::empty())
            .map_err(|e| Error::new(ErrorKind::InvalidUrl, e))?;
        log::debug!("GET {}", url);
        // hyper has no separate write deadline; the request head is tiny, so
        // both budgets bound the wait for the response head.
        let deadline = self.write_timeout.saturating_add(self.read_timeout);
        let response = tokio::time::timeout(deadline, self.http.request(request))
            .await??;
        Ok(response)
    }

    async fn fetch(&self, url: &Url) -> Result<Bytes, Error> {
        let response = self.send(url).await?;
        let status = response.status();
        let body = tokio::time::timeout(self.read_timeout,
            hyper::body::to_bytes(response.into_body()));
        if !status.is_success() {
            let body = body.await.ok().and_then(Result::ok);
            log::warn!("GET {} returned {}", url, status);
            return Err(status_error(status, body.as_deref()));
        }
        Ok(body.await??)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn status_error(status: StatusCode, body: Option<&[u8]>) -> Error {
    let kind = ErrorKind::Status {
        code: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_string(),
    };
    let detail = body
        .and_then(|body| serde_json::from_slice::<ErrorBody>(body).ok())
        .and_then(|body| match (body.error, body.message) {
            (Some(error), Some(message)) =>
                Some(format!("{}: {}", error, message)),
            (error, message) => error.or(message),
        });
    match detail {
        Some(detail) => Error::new(kind, detail),
        None => kind.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_carries_server_detail() {
        let body = br#"{"error":"Internal server error","message":"upstream down"}"#;
        let e = status_error(StatusCode::INTERNAL_SERVER_ERROR, Some(body));
        assert_eq!(e.to_string(), "HTTP 500: Internal Server Error");
        let cause = std::error::Error::source(&e).unwrap();
        assert_eq!(cause.to_string(), "Internal server error: upstream down");
    }

    #[test]
    fn status_error_without_json_body() {
        let e = status_error(StatusCode::NOT_FOUND, Some(b"Not Found"));
        assert_eq!(e.status(), Some(404));
        assert!(std::error::Error::source(&e).is_none());
    }

    #[test]
    fn rejects_unsupported_scheme() {
        let e = GeocodeClient::new("ftp://host").unwrap_err();
        assert_eq!(e.kind(), &ErrorKind::InvalidUrl);
    }

    #[test]
    fn rejects_relative_base_url() {
        let e = GeocodeClient::new("localhost:3000/").unwrap_err();
        assert_eq!(e.kind(), &ErrorKind::InvalidUrl);
    }

    #[test]
    fn rejects_invalid_user_agent() {
        let e = Config::default().user_agent("bad\nagent").build()
            .unwrap_err();
        assert_eq!(e.kind(), &ErrorKind::InvalidConfig);
    }

    #[test]
    fn normalizes_base_url() {
        let client = GeocodeClient::new("http://host/").unwrap();
        assert_eq!(client.base_url(), "http://host");
        assert!(client.user_agent().starts_with("rust-quick-geocode-client/"));
    }
}
