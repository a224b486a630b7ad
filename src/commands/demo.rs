use anyhow::Result;
use serde_json::Value;

use crate::{
    http::HttpClient,
    retry::RetryPolicy,
    users::{UserApi, UserRecord},
};

use super::{SAMPLE_PATH, create, delete, list, probe, update};

const DEMO_USER_ID: u64 = 1;

fn demo_record(name: &str, username: &str, email: &str) -> UserRecord {
    [("name", name), ("username", username), ("email", email)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}

/// Walks through every operation once: list, create, update, delete, then a
/// retried sample request.
///
/// Failures are reported along the way and never abort the walkthrough; an
/// exhausted sample request is printed and suppressed.
#[tracing::instrument(skip_all)]
pub async fn demo<U: UserApi>(api: &U, http: &HttpClient, policy: &RetryPolicy) -> Result<()> {
    println!("Fetching users:");
    list(api, &[("_limit".to_string(), "5".to_string())]).await;

    println!("\nCreating a new user:");
    let new_user = demo_record("John Doe", "johndoe", "johndoe@example.com");
    create(api, &new_user).await;

    println!("\nUpdating user {}:", DEMO_USER_ID);
    let changes = demo_record("Jane Doe", "janedoe", "janedoe@example.com");
    update(api, DEMO_USER_ID, &changes).await;

    println!("\nDeleting user {}:", DEMO_USER_ID);
    delete(api, DEMO_USER_ID).await;

    println!("\nRetrying a sample request:");
    if let Err(e) = probe(http, SAMPLE_PATH, policy).await {
        println!("Request failed: {:#}", e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::{Failure, MockUserApi, Outcome};
    use mockall::Sequence;
    use reqwest::Client;
    use serde_json::json;
    use std::time::Duration;

    fn expect_full_sequence(api: &mut MockUserApi) {
        let mut seq = Sequence::new();

        api.expect_list_users()
            .withf(|filters| filters.len() == 1 && filters[0].0 == "_limit" && filters[0].1 == "5")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Outcome::NotFound);

        api.expect_create_user()
            .withf(|r| r.get("username") == Some(&json!("johndoe")))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|r| Outcome::Success(r.clone()));

        api.expect_update_user()
            .withf(|id, r| *id == 1 && r.get("name") == Some(&json!("Jane Doe")))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Outcome::Failed(Failure::Transport("refused".to_string())));

        api.expect_delete_user()
            .withf(|id| *id == 1)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Outcome::NotFound);
    }

    #[test]
    fn test_demo_record() {
        let record = demo_record("John Doe", "johndoe", "johndoe@example.com");
        assert_eq!(record.len(), 3);
        assert_eq!(record["email"], json!("johndoe@example.com"));
    }

    #[tokio::test]
    async fn test_demo_runs_every_operation_in_order() {
        let mut server = mockito::Server::new_async().await;
        let probe_mock = server
            .mock("GET", "/posts/1")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let mut api = MockUserApi::new();
        expect_full_sequence(&mut api);

        let http = HttpClient::new(Client::new(), &server.url());
        demo(&api, &http, &RetryPolicy::default()).await.unwrap();

        probe_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_demo_suppresses_exhausted_probe() {
        let mut api = MockUserApi::new();
        expect_full_sequence(&mut api);

        let http = HttpClient::new(Client::new(), "http://127.0.0.1:1");
        let policy = RetryPolicy::new(2, Duration::from_millis(10));

        assert!(demo(&api, &http, &policy).await.is_ok());
    }
}
