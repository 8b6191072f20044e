//! JSON reply surface for the configurator GUI.
//!
//! The GUI expects plain mappings: `{"x","y","z"}` for a fix,
//! `{"error": "..."}` for any failure, `{"success": "WP sent"}` for a
//! delivered message, and an empty reply when a poll ends inconclusive.

use crate::types::PollOutcome;
use crate::{Bridge, BridgeError, Result};
use serde_json::{json, Map, Value};

/// Hint appended to setup and diagnostic errors; the GUI re-runs detection
/// when the user refreshes the tab.
pub const REFRESH_HINT: &str = " then refresh the Pozyx tab.";

/// Render an error as the GUI error mapping.
pub fn error_reply(err: &BridgeError) -> Value {
    let mut message = err.to_string();
    if err.wants_refresh_hint() {
        message.push_str(REFRESH_HINT);
    }
    json!({ "error": message })
}

/// Render a poll result. Inconclusive polls become JSON `null`, which the
/// GUI treats as "no update this cycle".
pub fn position_reply(result: &Result<PollOutcome>) -> Value {
    match result {
        Ok(PollOutcome::Fix(coordinates)) => json!({
            "x": coordinates.x,
            "y": coordinates.y,
            "z": coordinates.z,
        }),
        Ok(PollOutcome::Inconclusive) => Value::Null,
        Err(err) => error_reply(err),
    }
}

/// Render a message send result.
pub fn send_reply(result: &Result<()>) -> Value {
    match result {
        Ok(()) => json!({ "success": "WP sent" }),
        Err(err) => error_reply(err),
    }
}

/// Flatten a GUI message mapping into the broadcast payload, in field
/// order. The GUI sends byte-sized integer fields; anything else collapses
/// to zero.
pub fn message_payload(msg: &Map<String, Value>) -> Vec<u8> {
    msg.values()
        .map(|value| value.as_u64().unwrap_or(0) as u8)
        .collect()
}

/// GUI entry point: poll for a position and render the reply.
pub fn handle_get_position(bridge: &mut Bridge) -> Value {
    position_reply(&bridge.get_position())
}

/// GUI entry point: broadcast a waypoint message mapping and render the
/// acknowledgment.
pub fn handle_send_message(bridge: &mut Bridge, msg: &Map<String, Value>) -> Value {
    send_reply(&bridge.send_message(&message_payload(msg)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coordinates;

    #[test]
    fn fix_renders_as_coordinate_mapping() {
        let reply = position_reply(&Ok(PollOutcome::Fix(Coordinates::new(1200, -3400, 980))));
        assert_eq!(reply, json!({ "x": 1200, "y": -3400, "z": 980 }));
    }

    #[test]
    fn inconclusive_renders_as_null() {
        assert_eq!(position_reply(&Ok(PollOutcome::Inconclusive)), Value::Null);
    }

    #[test]
    fn setup_errors_carry_the_refresh_hint() {
        let reply = position_reply(&Err(BridgeError::NoDevice));
        let message = reply["error"].as_str().unwrap();
        assert!(message.starts_with("No pozyx device connected"));
        assert!(message.ends_with(REFRESH_HINT));
    }

    #[test]
    fn anchor_diagnostic_names_the_count() {
        let reply = position_reply(&Err(BridgeError::AnchorsUnreachable { count: 2 }));
        let message = reply["error"].as_str().unwrap();
        assert!(message.contains("at least 2 anchors"));
        assert!(message.ends_with(REFRESH_HINT));
    }

    #[test]
    fn validation_errors_stay_plain() {
        let reply = send_reply(&Err(BridgeError::MessageTooLong { len: 28 }));
        assert_eq!(reply, json!({ "error": "message too long!" }));

        let reply = send_reply(&Err(BridgeError::RemoteUnreachable { id: 0x6820 }));
        assert_eq!(
            reply,
            json!({ "error": "Could not establish connection to device with ID 0x6820" })
        );
    }

    #[test]
    fn send_success_is_the_fixed_acknowledgment() {
        assert_eq!(send_reply(&Ok(())), json!({ "success": "WP sent" }));
    }

    #[test]
    fn payload_keeps_field_order() {
        let mut msg = Map::new();
        msg.insert("cmd".into(), json!(16));
        msg.insert("lat".into(), json!(250));
        msg.insert("alt".into(), json!(3));
        assert_eq!(message_payload(&msg), vec![16, 250, 3]);
    }

    #[test]
    fn non_integer_fields_collapse_to_zero() {
        let mut msg = Map::new();
        msg.insert("cmd".into(), json!("north"));
        msg.insert("alt".into(), json!(7));
        assert_eq!(message_payload(&msg), vec![0, 7]);
    }
}
