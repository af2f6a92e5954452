//! # Dream Car Builder
//!
//! Application layer for the Dream Car Builder site: configuration, the
//! remote VIN lookup client, file-backed counters, catalog loading, and
//! the `dreamcar` command-line front end. The pure logic (VIN validation,
//! the recommendation engine, the build wizard) lives in
//! [`dreamcar_core`].
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────────┐   ┌──────────────────┐
//! │   VIN    │──▶│ vPIC lookup   │──▶│  VehicleRecord   │
//! │ validate │   │ (reqwest)     │   └────────┬─────────┘
//! └──────────┘   └───────────────┘            ▼
//!                ┌───────────────┐   ┌──────────────────┐
//!                │ Build wizard  │──▶│ Recommendation   │
//!                │ (CarBuilder)  │   │ context + engine │
//!                └───────────────┘   └────────┬─────────┘
//!                                             ▼
//!                                    ┌──────────────────┐
//!                                    │ affiliate links, │
//!                                    │ counters (JSON)  │
//!                                    └──────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration with defaults and validation |
//! | [`decode`] | Async VIN lookup against the vPIC service |
//! | [`file_store`] | JSON-file key-value store for counters |
//! | [`catalog_file`] | Catalog loading and engine construction |
//! | [`panel`] | Recommendation panel that follows the build wizard |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`vin_cmd`], [`recommend_cmd`], [`stats`], [`build_cmd`] | CLI commands |

pub mod build_cmd;
pub mod catalog_file;
pub mod config;
pub mod decode;
pub mod file_store;
pub mod logging;
pub mod panel;
pub mod recommend_cmd;
pub mod stats;
pub mod vin_cmd;

pub use dreamcar_core;
