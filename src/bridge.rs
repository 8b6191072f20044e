//! Connection state, precondition guard, and the two GUI-facing operations.

use crate::ports::{self, PortScan, SystemPorts};
use crate::sdk::{Algorithm, Dimension, PositioningSdk, SdkConnector, BROADCAST_ID};
use crate::types::{Anchor, Coordinates, PollOutcome};
use crate::{BridgeError, Result};

/// Device height handed to the positioning call, in millimeters.
pub const DEFAULT_HEIGHT_MM: i32 = 1000;

/// Positioning attempts per poll before the diagnostic sweep.
pub const DEFAULT_MAX_TRIES: u32 = 20;

/// Broadcast frame capacity for waypoint messages, in bytes.
pub const MAX_MESSAGE_LEN: usize = 27;

/// Anchor layout of the deployment site, coordinates in millimeters.
pub const DEFAULT_ANCHORS: [Anchor; 5] = [
    Anchor::new(0x6951, 1, Coordinates::new(0, 0, 1500)),
    Anchor::new(0x6e59, 2, Coordinates::new(5340, 0, 2000)),
    Anchor::new(0x695d, 3, Coordinates::new(6812, -8923, 2500)),
    Anchor::new(0x690b, 4, Coordinates::new(-541, -10979, 3000)),
    Anchor::new(0x6748, 5, Coordinates::new(6812, -4581, 20)),
];

/// Bridge configuration, fixed for the process lifetime.
#[derive(Debug, Clone, Copy)]
pub struct BridgeConfig {
    /// Fixed device height for the 3D positioning call.
    pub height_mm: i32,
    /// Retry ceiling for one position poll.
    pub max_tries: u32,
    /// Remote unit to position instead of the base station, if any.
    pub remote_id: Option<u16>,
    /// Anchors registered on the device at startup.
    pub anchors: [Anchor; 5],
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            height_mm: DEFAULT_HEIGHT_MM,
            max_tries: DEFAULT_MAX_TRIES,
            remote_id: None,
            anchors: DEFAULT_ANCHORS,
        }
    }
}

impl BridgeConfig {
    /// Defaults with optional environment overrides:
    /// `POZYX_REMOTE_ID` (hex with `0x` prefix, or decimal) and
    /// `POZYX_HEIGHT_MM`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(id) = read_env_u16("POZYX_REMOTE_ID") {
            config.remote_id = Some(id);
        }
        if let Some(height) = read_env_i32("POZYX_HEIGHT_MM") {
            config.height_mm = height;
        }
        config
    }
}

fn read_env_u16(name: &str) -> Option<u16> {
    std::env::var(name).ok().and_then(|v| parse_u16(v.trim()))
}

fn read_env_i32(name: &str) -> Option<i32> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_u16(value: &str) -> Option<u16> {
    if let Some(hex) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).ok()
    } else {
        value.parse().ok()
    }
}

/// Connection state decided once at startup.
enum ConnectionState {
    /// No SDK connector was wired in.
    SdkUnavailable,
    /// SDK present, but no base station was found or it would not open.
    NoDevice,
    /// Base station opened and anchors registered.
    Connected {
        sdk: Box<dyn PositioningSdk>,
        port: String,
    },
}

/// Context object owning the connection state, configuration, and port
/// scanner. Constructed once at startup and handed to the GUI layer; every
/// operation re-runs the precondition guard before touching the device.
pub struct Bridge {
    state: ConnectionState,
    scan: Box<dyn PortScan>,
    config: BridgeConfig,
}

impl Bridge {
    /// Initialize against the OS serial port enumeration.
    pub fn initialize(config: BridgeConfig, connector: Option<&dyn SdkConnector>) -> Bridge {
        Self::initialize_with(config, connector, Box::new(SystemPorts))
    }

    /// Initialize with an explicit port scanner. Never fails: the GUI keeps
    /// calling into the bridge regardless, and a degraded state answers
    /// every call with the matching error reply.
    pub fn initialize_with(
        config: BridgeConfig,
        connector: Option<&dyn SdkConnector>,
        scan: Box<dyn PortScan>,
    ) -> Bridge {
        let state = Self::startup(&config, connector, scan.as_ref());
        Bridge {
            state,
            scan,
            config,
        }
    }

    fn startup(
        config: &BridgeConfig,
        connector: Option<&dyn SdkConnector>,
        scan: &dyn PortScan,
    ) -> ConnectionState {
        let Some(connector) = connector else {
            log::warn!("No positioning SDK connector configured");
            return ConnectionState::SdkUnavailable;
        };

        let port = match ports::find_base_station(scan) {
            Ok(Some(port)) => port,
            Ok(None) => {
                log::warn!("No Pozyx base station found among serial ports");
                return ConnectionState::NoDevice;
            }
            Err(e) => {
                log::warn!("Serial port enumeration failed: {}", e);
                return ConnectionState::NoDevice;
            }
        };

        let mut sdk = match connector.connect(&port) {
            Ok(sdk) => sdk,
            Err(e) => {
                log::warn!("Failed to open base station on {}: {}", port, e);
                return ConnectionState::NoDevice;
            }
        };

        log::info!("Opened Pozyx base station on {}", port);
        Self::register_anchors(sdk.as_mut(), &config.anchors, config.remote_id);
        ConnectionState::Connected { sdk, port }
    }

    /// Clear the device list and push the anchor layout. Registration
    /// failures are logged but do not degrade the connection.
    fn register_anchors(sdk: &mut dyn PositioningSdk, anchors: &[Anchor], remote: Option<u16>) {
        if let Err(e) = sdk.clear_devices(remote) {
            log::warn!("Failed to clear the device list: {}", e);
        }
        for anchor in anchors {
            match sdk.add_device(anchor, remote) {
                Ok(()) => log::debug!(
                    "Registered anchor 0x{:04x} at ({}, {}, {})",
                    anchor.network_id,
                    anchor.coordinates.x,
                    anchor.coordinates.y,
                    anchor.coordinates.z
                ),
                Err(e) => log::warn!(
                    "Failed to register anchor 0x{:04x}: {}",
                    anchor.network_id,
                    e
                ),
            }
        }
    }

    /// Whether startup ended with an open base station.
    pub fn is_connected(&self) -> bool {
        matches!(self.state, ConnectionState::Connected { .. })
    }

    /// Serial port the base station was opened on, if connected.
    pub fn port(&self) -> Option<&str> {
        match &self.state {
            ConnectionState::Connected { port, .. } => Some(port),
            _ => None,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Precondition guard run before every device operation. Checks in
    /// order, short-circuiting on the first failure:
    /// 1. an SDK connector was configured
    /// 2. a base station was found and opened at startup
    /// 3. its port is still present in the live enumeration
    /// 4. a configured remote unit still answers the liveness query
    fn guard(&mut self) -> Result<&mut dyn PositioningSdk> {
        match &mut self.state {
            ConnectionState::SdkUnavailable => Err(BridgeError::SdkUnavailable),
            ConnectionState::NoDevice => Err(BridgeError::NoDevice),
            ConnectionState::Connected { sdk, port } => {
                let names = ports::port_names(self.scan.as_ref())?;
                if !names.iter().any(|name| name == port) {
                    return Err(BridgeError::ConnectionLost);
                }
                if let Some(id) = self.config.remote_id {
                    let who = sdk.who_am_i(Some(id)).unwrap_or(0);
                    if who == 0 {
                        return Err(BridgeError::RemoteUnreachable { id });
                    }
                }
                Ok(sdk.as_mut())
            }
        }
    }

    /// Poll for a 3D position fix, UWB-only, at the configured height.
    ///
    /// Returns on the first successful attempt. After the retry ceiling the
    /// anchors are swept for liveness: more than one silent anchor becomes
    /// [`BridgeError::AnchorsUnreachable`], otherwise the poll ends
    /// [`PollOutcome::Inconclusive`].
    pub fn get_position(&mut self) -> Result<PollOutcome> {
        let BridgeConfig {
            height_mm,
            max_tries,
            remote_id,
            anchors,
        } = self.config;
        let sdk = self.guard()?;

        for attempt in 1..=max_tries {
            if let Ok(coordinates) =
                sdk.do_positioning(Dimension::Three, height_mm, Algorithm::UwbOnly, remote_id)
            {
                log::debug!("Position fix after {} attempt(s)", attempt);
                return Ok(PollOutcome::Fix(coordinates));
            }
        }

        // Retries exhausted: check which anchors still answer.
        let mut silent = 0usize;
        for anchor in &anchors {
            let who = sdk.who_am_i(Some(anchor.network_id)).unwrap_or(0);
            if who == 0 {
                silent += 1;
            }
        }
        if silent > 1 {
            log::warn!(
                "{} of {} anchors unreachable after {} failed attempts",
                silent,
                anchors.len(),
                max_tries
            );
            return Err(BridgeError::AnchorsUnreachable { count: silent });
        }
        Ok(PollOutcome::Inconclusive)
    }

    /// Broadcast a waypoint message towards the tags.
    ///
    /// The payload is capped at [`MAX_MESSAGE_LEN`] bytes; there is no retry
    /// and no delivery confirmation beyond what the device reports.
    pub fn send_message(&mut self, payload: &[u8]) -> Result<()> {
        let sdk = self.guard()?;
        if payload.len() > MAX_MESSAGE_LEN {
            return Err(BridgeError::MessageTooLong {
                len: payload.len(),
            });
        }
        sdk.send_data(BROADCAST_ID, payload)?;
        Ok(())
    }
}
