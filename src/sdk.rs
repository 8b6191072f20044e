//! Seam towards the vendor positioning SDK.
//!
//! Everything that actually touches the UWB hardware lives behind
//! [`PositioningSdk`]: register I/O, serial framing, and the positioning
//! algorithm itself are the vendor's business. The bridge only issues the
//! five primitives below and interprets their results.

use crate::types::{Anchor, Coordinates};

/// Network identifier used for broadcast sends.
pub const BROADCAST_ID: u16 = 0;

/// Register value a live Pozyx unit reports for the who-am-i query.
pub const WHO_AM_I_ID: u8 = 0x43;

/// Positioning algorithm selector, matching the vendor constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    UwbOnly = 0,
    Tracking = 4,
}

/// Positioning dimension selector, matching the vendor constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    TwoAndAHalf = 1,
    Two = 2,
    Three = 3,
}

/// Errors surfaced by the vendor SDK.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SdkError {
    /// The device reported failure for the requested operation.
    #[error("operation failed")]
    Failure,

    /// The device did not answer in time.
    #[error("device timeout")]
    Timeout,

    #[error("{0}")]
    Other(String),
}

/// Result type alias for SDK primitives.
pub type SdkResult<T> = std::result::Result<T, SdkError>;

/// The vendor SDK surface the bridge depends on.
///
/// A `remote` of `None` addresses the USB-connected base station itself;
/// `Some(id)` routes the operation to that unit over UWB.
pub trait PositioningSdk {
    /// Drop the device list on the target.
    fn clear_devices(&mut self, remote: Option<u16>) -> SdkResult<()>;

    /// Register one anchor in the target's device list.
    fn add_device(&mut self, anchor: &Anchor, remote: Option<u16>) -> SdkResult<()>;

    /// Run one positioning attempt and return the computed coordinate.
    fn do_positioning(
        &mut self,
        dimension: Dimension,
        height_mm: i32,
        algorithm: Algorithm,
        remote: Option<u16>,
    ) -> SdkResult<Coordinates>;

    /// Read the who-am-i register. Returns 0 when the target produced no
    /// data, which callers treat as "not alive".
    fn who_am_i(&mut self, remote: Option<u16>) -> SdkResult<u8>;

    /// Hand a raw payload to the device's send primitive.
    fn send_data(&mut self, destination: u16, payload: &[u8]) -> SdkResult<()>;
}

/// Startup seam producing a connected SDK for a serial port path.
///
/// Passing no connector to [`crate::Bridge::initialize`] is the
/// "SDK not installed" capability state: the bridge still answers every GUI
/// call, but only with the installation-instruction error.
pub trait SdkConnector {
    fn connect(&self, port: &str) -> SdkResult<Box<dyn PositioningSdk>>;
}
