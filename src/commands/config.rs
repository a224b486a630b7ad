use anyhow::Result;
use log::debug;
use std::time::Duration;

use crate::{
    http::HttpClient,
    retry::RetryPolicy,
    users::{UserApi, UsersClient},
};

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings gathered from the command line and environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }
}

/// Everything a command needs to talk to the API.
pub struct Config<U: UserApi> {
    pub users: U,
    pub http: HttpClient,
    pub retry: RetryPolicy,
}

impl Config<UsersClient> {
    pub fn new(settings: &ClientConfig) -> Result<Self> {
        debug!(
            "Using API at {} (timeout {:?}, {} attempt(s), {:?} between)",
            settings.base_url, settings.timeout, settings.retry.attempts, settings.retry.delay
        );

        let http = HttpClient::build(&settings.base_url, settings.timeout)?;
        let users = UsersClient::new(http.clone());

        Ok(Self {
            users,
            http,
            retry: settings.retry,
        })
    }
}
