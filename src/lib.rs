pub mod commands;
pub mod http;
pub mod retry;
pub mod users;
