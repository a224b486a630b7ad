use anyhow::Result;
use reqwest::StatusCode;

use crate::{
    http::HttpClient,
    retry::{RetryPolicy, with_retry},
};

/// Path requested by the sample retried call.
pub const SAMPLE_PATH: &str = "/posts/1";

/// GETs `path` and prints the status code, retrying transport failures.
///
/// Any HTTP status counts as a response; only failing to reach the server is
/// retried. Once the attempts run out the last error is returned.
#[tracing::instrument(skip(http, policy))]
pub async fn probe(http: &HttpClient, path: &str, policy: &RetryPolicy) -> Result<StatusCode> {
    let operation = format!("GET {}", http.url(path));

    let status = with_retry(&operation, policy, || async move {
        let response = http.get(path, &[]).await?;
        Ok::<_, anyhow::Error>(response.status())
    })
    .await?;

    println!("{}", status.as_u16());
    Ok(status)
}
