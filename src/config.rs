// Copyright (C) 2018 Stephane Raux. Distributed under the MIT license.

use crate::{Error, ErrorKind, GeocodeClient};
use serde_derive::{Deserialize, Serialize};
use std::io::Read;
use std::time::Duration;

/// Settings a [`GeocodeClient`] is built from.
///
/// Every field is optional in the JSON form and falls back to its default.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Config {
    #[serde(default = "Config::default_base_url")]
    base_url: String,
    #[serde(default = "Config::default_user_agent")]
    user_agent: String,
    #[serde(default = "Config::default_connect_timeout_ms")]
    connect_timeout_ms: u64,
    #[serde(default = "Config::default_io_timeout_ms")]
    read_timeout_ms: u64,
    #[serde(default = "Config::default_io_timeout_ms")]
    write_timeout_ms: u64,
}

impl Config {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:3000";
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(60);

    fn default_base_url() -> String {
        Self::DEFAULT_BASE_URL.to_string()
    }

    fn default_user_agent() -> String {
        format!("rust-quick-geocode-client/{}", env!("CARGO_PKG_VERSION"))
    }

    fn default_connect_timeout_ms() -> u64 {
        Self::DEFAULT_CONNECT_TIMEOUT.as_millis() as u64
    }

    fn default_io_timeout_ms() -> u64 {
        Self::DEFAULT_IO_TIMEOUT.as_millis() as u64
    }

    pub fn build(self) -> Result<GeocodeClient, Error> {
        GeocodeClient::from_config(self)
    }

    pub fn base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, agent: S) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn connect_timeout(mut self, t: Duration) -> Self {
        self.connect_timeout_ms = t.as_millis() as u64;
        self
    }

    pub fn read_timeout(mut self, t: Duration) -> Self {
        self.read_timeout_ms = t.as_millis() as u64;
        self
    }

    pub fn write_timeout(mut self, t: Duration) -> Self {
        self.write_timeout_ms = t.as_millis() as u64;
        self
    }

    /// Base URL with trailing slashes removed.
    pub fn get_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn get_user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn get_connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn get_read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn get_write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    pub fn from_config<R: Read>(config: R) -> Result<Self, Error> {
        serde_json::from_reader(config)
            .map_err(|e| Error::new(ErrorKind::InvalidConfig, e))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: Self::default_base_url(),
            user_agent: Self::default_user_agent(),
            connect_timeout_ms: Self::default_connect_timeout_ms(),
            read_timeout_ms: Self::default_io_timeout_ms(),
            write_timeout_ms: Self::default_io_timeout_ms(),
        }
    }
}
