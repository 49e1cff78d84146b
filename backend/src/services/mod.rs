pub mod auth;
pub mod responses;
