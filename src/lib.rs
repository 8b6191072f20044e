//! # pozyx-bridge - Serial bridge for Pozyx UWB positioning base stations
//!
//! Detects a USB-attached Pozyx base station among the enumerated serial
//! ports, registers a fixed set of reference anchors, and exposes the two
//! operations a configurator GUI needs:
//! - A bounded position poll (3D, UWB-only) with an anchor diagnostic sweep
//! - A length-checked broadcast message send towards the positioning tags
//!
//! The vendor positioning SDK stays an external collaborator behind the
//! [`sdk::PositioningSdk`] trait; this crate owns port discovery, connection
//! guarding, retry policy, and the JSON reply surface consumed by the GUI.
//!
//! ## Quick Start
//! ```no_run
//! use pozyx_bridge::{reply, Bridge, BridgeConfig};
//!
//! // Wire in a vendor SDK connector here; with `None` every call reports
//! // the SDK-unavailable reply to the GUI.
//! let mut bridge = Bridge::initialize(BridgeConfig::from_env(), None);
//! println!("{}", reply::handle_get_position(&mut bridge));
//! ```

pub mod error;
pub mod types;
pub mod sdk;
pub mod ports;
pub mod bridge;
pub mod reply;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use bridge::{Bridge, BridgeConfig};
pub use error::BridgeError;
pub use types::*;

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
