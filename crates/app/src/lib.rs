//! # sfbridge-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `HubClient` — set device values, read the hub's device map
//!   - `MessagePublisher` — publish retained messages to the broker
//! - Own the **device registry** (snapshot read, atomic replace)
//! - Provide the **bridge service**: topic routing and cover-state inference
//! - Provide the **dispatcher**: a single consumer loop that drains broker
//!   messages and hub events one at a time
//!
//! ## Dependency rule
//! Depends on `sfbridge-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod dispatcher;
pub mod inference;
pub mod ports;
pub mod registry;
pub mod services;
