//! HTTP route handlers.

pub mod health;
pub mod login;
pub mod logout;
pub mod me;
pub mod profile;
pub mod proxy;
pub mod refresh;
