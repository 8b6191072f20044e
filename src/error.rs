use crate::sdk::SdkError;

/// Errors that can occur when talking to the Pozyx base station.
///
/// Display strings are the exact wording the configurator GUI shows; the
/// [`crate::reply`] layer appends the refresh hint to the setup and
/// diagnostic variants before handing them over.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Pozyx SDK not available! Install the vendor positioning SDK")]
    SdkUnavailable,

    #[error("No pozyx device connected! Check USB connection")]
    NoDevice,

    #[error("Connection to pozyx device lost! Check USB connection")]
    ConnectionLost,

    #[error("Could not establish connection to device with ID 0x{id:04x}")]
    RemoteUnreachable { id: u16 },

    #[error("message too long!")]
    MessageTooLong { len: usize },

    #[error("Can't connect to at least {count} anchors. Check the anchor's power connection and the pozyx's USB connection")]
    AnchorsUnreachable { count: usize },

    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("SDK error: {0}")]
    Sdk(#[from] SdkError),
}

impl BridgeError {
    /// Whether the GUI should be told to refresh the Pozyx tab after this
    /// error. True for the setup and diagnostic categories, false for
    /// per-call validation and remote liveness failures.
    pub fn wants_refresh_hint(&self) -> bool {
        matches!(
            self,
            BridgeError::SdkUnavailable
                | BridgeError::NoDevice
                | BridgeError::ConnectionLost
                | BridgeError::AnchorsUnreachable { .. }
        )
    }
}
