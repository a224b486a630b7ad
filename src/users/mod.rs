//! Client for the remote `/users` resource.

mod client;
mod types;

#[cfg(test)]
pub use client::MockUserApi;
pub use client::{UserApi, UsersClient};
pub use types::{Failure, Outcome, UserId, UserRecord};
