use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use super::types::{Failure, Outcome, UserId, UserRecord};
use crate::http::HttpClient;
use crate::retry::is_transient;

const USERS_PATH: &str = "/users";

/// CRUD operations on the remote user resource.
///
/// Operations never fail with `Err`: every problem ends up in the returned
/// [`Outcome`] and is reported through the log.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserApi: Send + Sync {
    async fn list_users(&self, filters: &[(String, String)]) -> Outcome<Vec<UserRecord>>;
    async fn create_user(&self, record: &UserRecord) -> Outcome<UserRecord>;
    async fn update_user(&self, id: UserId, record: &UserRecord) -> Outcome<UserRecord>;
    async fn delete_user(&self, id: UserId) -> Outcome<()>;
}

pub struct UsersClient {
    http: HttpClient,
}

impl UsersClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl UserApi for UsersClient {
    #[tracing::instrument(skip(self))]
    async fn list_users(&self, filters: &[(String, String)]) -> Outcome<Vec<UserRecord>> {
        let sent = self.http.get(USERS_PATH, filters).await;
        receive("List users", sent, StatusCode::OK).await
    }

    #[tracing::instrument(skip(self, record))]
    async fn create_user(&self, record: &UserRecord) -> Outcome<UserRecord> {
        let sent = self.http.post_json(USERS_PATH, record).await;
        receive("Create user", sent, StatusCode::CREATED).await
    }

    #[tracing::instrument(skip(self, record))]
    async fn update_user(&self, id: UserId, record: &UserRecord) -> Outcome<UserRecord> {
        let sent = self.http.put_json(&user_path(id), record).await;
        receive(&format!("Update user {}", id), sent, StatusCode::OK).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_user(&self, id: UserId) -> Outcome<()> {
        let operation = format!("Delete user {}", id);
        let response = match responded(&operation, self.http.delete(&user_path(id)).await) {
            Ok(response) => response,
            Err(outcome) => return outcome,
        };

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => {
                info!("User {} deleted", id);
                Outcome::Success(())
            }
            status => rejected(&operation, status),
        }
    }
}

fn user_path(id: UserId) -> String {
    format!("{}/{}", USERS_PATH, id)
}

/// Unpacks a sent request, turning a send error into a failed outcome.
fn responded<T>(operation: &str, sent: Result<Response>) -> Result<Response, Outcome<T>> {
    sent.map_err(|e| {
        warn!("{}: {:#}", operation, e);
        let msg = format!("{:#}", e);
        if is_transient(&e) {
            Outcome::Failed(Failure::Transport(msg))
        } else {
            Outcome::Failed(Failure::Request(msg))
        }
    })
}

fn rejected<T>(operation: &str, status: StatusCode) -> Outcome<T> {
    if status == StatusCode::NOT_FOUND {
        warn!("{}: not found (404)", operation);
        Outcome::NotFound
    } else {
        warn!("{}: server responded with {}", operation, status);
        Outcome::Failed(Failure::Status(status))
    }
}

/// Decodes the JSON body when the response carries the expected status.
async fn receive<T: DeserializeOwned>(
    operation: &str,
    sent: Result<Response>,
    expected: StatusCode,
) -> Outcome<T> {
    let response = match responded(operation, sent) {
        Ok(response) => response,
        Err(outcome) => return outcome,
    };

    let status = response.status();
    if status != expected {
        return rejected(operation, status);
    }

    match response.json::<T>().await {
        Ok(value) => Outcome::Success(value),
        Err(e) => {
            warn!("{}: failed to parse response: {}", operation, e);
            Outcome::Failed(Failure::Decode(e.to_string()))
        }
    }
}
