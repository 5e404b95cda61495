//! External API integrations - the pollution feed and the wiki summary source.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **API DTOs** (`pollution/dto.rs`, `wiki/dto.rs`) - Exact API response shapes
//! - **Clients** - HTTP clients for the external APIs
//! - **Token state** (`pollution/token.rs`) - Access/refresh session lifecycle
//! - **Traits** (`traits.rs`) - Seams for dependency injection and mocking
//!
//! This decoupling means:
//! 1. API changes don't ripple through our codebase
//! 2. We can test API contracts independently
//! 3. The pipeline and enricher are testable without a network
//!
//! # Usage
//!
//! ```ignore
//! use airsift::sources::{PollutionClient, WikiClient};
//!
//! let pollution = PollutionClient::new(&config.pollution)?;
//! let records = pollution.fetch_pollution("PL", 1, 50).await?;
//! ```

pub mod pollution;
pub mod traits;
pub mod wiki;

pub use pollution::PollutionClient;
pub use traits::{PollutionApi, SummaryApi};
pub use wiki::WikiClient;
