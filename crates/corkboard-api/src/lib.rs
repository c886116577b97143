pub mod auth;
pub mod error;
pub mod posts;
pub mod routes;
pub mod session;
pub mod views;
