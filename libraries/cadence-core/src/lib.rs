//! Cadence Core
//!
//! Catalog and entitlement types shared by the Cadence crates.
//!
//! The playback coordinator treats both as external collaborators:
//! - **Catalog**: `TrackCatalog` trait, `StaticCatalog` implementation
//! - **Entitlements**: `EntitlementGate` trait, `StaticEntitlements`
//! - **Error Handling**: `CoreError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{StaticCatalog, StaticEntitlements, EntitlementGate, Track, TrackCatalog, TrackId};
//!
//! let catalog = StaticCatalog::new(vec![
//!     Track::new("1", "Intro", "Band", "https://cdn.example/1.mp3"),
//!     Track::new("2", "Encore", "Band", "https://cdn.example/2.mp3").with_premium(true),
//! ])
//! .unwrap();
//!
//! let encore = catalog.find_by_id(&TrackId::from("2")).unwrap();
//! assert!(!StaticEntitlements::free().can_play(encore));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod entitlement;
pub mod error;
pub mod types;

pub use catalog::{StaticCatalog, TrackCatalog};
pub use entitlement::{Capability, EntitlementGate, StaticEntitlements};
pub use error::{CoreError, Result};
pub use types::{format_duration, parse_duration, Track, TrackId};
