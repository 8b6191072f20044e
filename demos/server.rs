//! Minimal HTTP bridge exposing the GUI operations as JSON endpoints.
//!
//!   GET  /position  -> {"x":..,"y":..,"z":..} | {"error":..} | null
//!   POST /message   -> {"success":"WP sent"} | {"error":..}
//!
//! Runs against the simulated SDK so it works without hardware:
//!
//! Usage: cargo run --example server --features mock

use pozyx_bridge::mock::{pozyx_descriptor, FixedPorts, MockConnector, MockSdk};
use pozyx_bridge::{reply, Bridge, BridgeConfig, Coordinates};
use serde_json::{json, Map, Value};
use std::io::Read as _;
use tiny_http::{Header, Method, Response, Server};

const ADDR: &str = "0.0.0.0:8080";

fn main() {
    env_logger::init();

    let mut sdk = MockSdk::fix_after(2, Coordinates::new(1200, -3400, 980));
    sdk.mark_alive(&[0x6951, 0x6e59, 0x695d, 0x690b, 0x6748]);

    let connector = MockConnector::new(sdk);
    let scan = FixedPorts::new(vec![pozyx_descriptor("/dev/ttyACM0")]);
    let mut bridge = Bridge::initialize_with(BridgeConfig::from_env(), Some(&connector), Box::new(scan));

    let server = Server::http(ADDR).unwrap_or_else(|e| {
        eprintln!("Failed to bind {}: {}", ADDR, e);
        std::process::exit(1);
    });
    println!("Listening on http://{}", ADDR);

    for mut request in server.incoming_requests() {
        let body = match (request.method(), request.url()) {
            (Method::Get, "/position") => reply::handle_get_position(&mut bridge),
            (Method::Post, "/message") => {
                let mut raw = String::new();
                let _ = request.as_reader().read_to_string(&mut raw);
                match serde_json::from_str::<Map<String, Value>>(&raw) {
                    Ok(msg) => reply::handle_send_message(&mut bridge, &msg),
                    Err(e) => json!({ "error": format!("invalid message body: {}", e) }),
                }
            }
            _ => {
                let _ = request.respond(Response::empty(404));
                continue;
            }
        };

        let json_header =
            Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).expect("valid header");
        let _ = request.respond(Response::from_string(body.to_string()).with_header(json_header));
    }
}
