use serde::Serialize;

/// 3D coordinate in millimeters, as reported by the positioning device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coordinates {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Fixed reference anchor with a known position, used by the device for
/// trilateration. The order index matches the slot the anchor occupies in
/// the device list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    /// UWB network identifier of the anchor.
    pub network_id: u16,
    pub order: u8,
    pub coordinates: Coordinates,
}

impl Anchor {
    pub const fn new(network_id: u16, order: u8, coordinates: Coordinates) -> Self {
        Self {
            network_id,
            order,
            coordinates,
        }
    }
}

/// Outcome of a position poll that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// A position fix, returned on the first successful attempt.
    Fix(Coordinates),
    /// All attempts exhausted, but the anchor sweep found at most one silent
    /// anchor, so there is nothing conclusive to report. The GUI receives
    /// an empty reply for this case.
    Inconclusive,
}
