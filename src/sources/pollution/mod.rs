//! Pollution API integration
//!
//! An authenticated upstream serving per-country pollution records.
//! Access is via short-lived bearer tokens obtained from a login endpoint,
//! with an optional refresh token to reauthenticate without re-sending the
//! password.

mod client;
pub mod dto;
mod token;

pub use client::PollutionClient;
