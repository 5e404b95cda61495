//! Wiki summary API integration
//!
//! A REST summary endpoint keyed by page title: `GET {base}/{title}`
//! returns a JSON document whose `extract` field holds the intro text.
//! A miss is a plain 404, which is an expected outcome here, not an error.

mod client;
pub mod dto;

pub use client::WikiClient;
