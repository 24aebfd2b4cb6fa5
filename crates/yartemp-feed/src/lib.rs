//! Ingestion pipeline for the YarTemp observation feed.
//!
//! The feed publishes one semicolon-delimited line of current weather
//! observations. This crate fetches it, converts and range-checks the
//! published quantities, keeps the last good reading in a single-entry
//! cache and hands frontends an immutable snapshot.
//!
//! - [`client`]: HTTP access to the feed
//! - [`reading`]: line parsing and plausibility rules
//! - [`cache`]: last-good-reading cache
//! - [`model`]: refresh orchestration and the published snapshot
//! - [`error`]: the pipeline's error taxonomy

pub mod cache;
pub mod client;
pub mod error;
pub mod model;
mod op_state;
pub mod reading;
pub mod types;

pub use cache::CacheEntry;
pub use client::FeedClient;
pub use error::{ModelError, NetworkError};
pub use model::{Refresher, Snapshot, WeatherModel};
pub use reading::Reading;
pub use types::{Pressure, Temperature};
