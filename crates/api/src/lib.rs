//! HTTP client for the NeuroVisa backend.
//!
//! `InterviewClient` implements `neurovisa_core::api::InterviewApi` over
//! `reqwest`, so the core flow never sees HTTP. The `auth` module covers the
//! login/register endpoints that run before an authenticated client exists.

pub mod auth;
pub mod client;
pub mod config;

pub use client::InterviewClient;
pub use config::Config;
