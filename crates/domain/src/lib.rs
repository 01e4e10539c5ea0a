//! # sfbridge-domain
//!
//! Pure domain model for the Smart Friends ↔ MQTT bridge.
//!
//! ## Responsibilities
//! - Foundational types: device identifiers, error conventions
//! - Define **Devices** as reported by the hub (switches, position sensors, …)
//! - Define **Values** and the payload codec used on the MQTT wire
//! - Define **Topics**: construction of outbound topics, parsing of inbound ones
//! - Define the **Command mapping** (`open` / `close` / `stop` payloads)
//! - Define hub **Events** and broker **Messages**
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod command;
pub mod device;
pub mod event;
pub mod message;
pub mod topic;
pub mod value;
