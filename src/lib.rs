//! Bearer-token authentication for an axum resource server.
//!
//! Requests without `Authorization: Bearer` pass through anonymously;
//! requests with one must carry a valid JWT for a known principal, whose
//! identity is then available to handlers through the per-request
//! [`security::SecurityContext`].

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod security;
pub mod services;
pub mod state;
