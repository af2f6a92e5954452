//! # Dream Car Builder Core
//!
//! Pure logic behind the Dream Car Builder site: VIN validation, the
//! product catalog and recommendation engine, the build wizard state
//! machine, and affiliate performance counters.
//!
//! This crate performs no network or filesystem I/O and spawns no
//! runtime. The application crate supplies the VIN lookup transport,
//! configuration, and on-disk storage.

pub mod affiliate;
pub mod builder;
pub mod catalog;
pub mod context;
pub mod counters;
pub mod recommend;
pub mod store;
pub mod vin;
