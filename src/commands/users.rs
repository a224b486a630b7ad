use log::debug;
use serde_json::Value;

use crate::users::{Outcome, UserApi, UserId, UserRecord};

/// Prints one line per user.
#[tracing::instrument(skip(api))]
pub async fn list<U: UserApi>(api: &U, filters: &[(String, String)]) -> Outcome<Vec<UserRecord>> {
    let outcome = api.list_users(filters).await;

    match &outcome {
        Outcome::Success(users) if !users.is_empty() => {
            debug!("Received {} user(s)", users.len());
            for user in users {
                println!("Name: {}, Email: {}", field(user, "name"), field(user, "email"));
            }
        }
        _ => println!("No users found."),
    }

    outcome
}

#[tracing::instrument(skip(api, record))]
pub async fn create<U: UserApi>(api: &U, record: &UserRecord) -> Outcome<UserRecord> {
    let outcome = api.create_user(record).await;
    match &outcome {
        Outcome::Success(created) if !created.is_empty() => {
            println!("Created user: {}", Value::Object(created.clone()));
        }
        _ => debug!("No user created"),
    }
    outcome
}

#[tracing::instrument(skip(api, record))]
pub async fn update<U: UserApi>(api: &U, id: UserId, record: &UserRecord) -> Outcome<UserRecord> {
    let outcome = api.update_user(id, record).await;
    match &outcome {
        Outcome::Success(updated) if !updated.is_empty() => {
            println!("Updated user {}: {}", id, Value::Object(updated.clone()));
        }
        _ => debug!("User {} not updated", id),
    }
    outcome
}

#[tracing::instrument(skip(api))]
pub async fn delete<U: UserApi>(api: &U, id: UserId) -> Outcome<()> {
    let outcome = api.delete_user(id).await;
    if outcome.is_success() {
        println!("Deleted user {}", id);
    }
    outcome
}

/// A field rendered for display; strings lose their JSON quotes.
fn field(user: &UserRecord, key: &str) -> String {
    match user.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
