//! Core services for the AyurTrace platform: the batch registry and its
//! append-only transaction ledger, the payment book, role sessions, the
//! traceability projection, and the pluggable ledger-anchor simulator.
//!
//! Everything here is presentation-free; `ayur-node` exposes these
//! operations over HTTP.

pub mod anchor;
pub mod demo;
pub mod error;
pub mod ledger;
pub mod payments;
pub mod registry;
pub mod session;
pub mod trace;

pub use error::RegistryError;
pub use registry::{BatchRegistry, FarmerStats, RecipientRole, RegisterHarvest};
