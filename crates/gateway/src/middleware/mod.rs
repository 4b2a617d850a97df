//! Request-intercepting middleware

pub mod auth;
