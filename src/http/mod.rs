//! HTTP transport for the user resource.

mod client;

pub use client::HttpClient;
