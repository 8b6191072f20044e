//! Poll-and-print driver loop against the simulated SDK.
//!
//! Mirrors the way the configurator GUI drives the bridge: one synchronous
//! position request per cycle, rendered as a JSON line. Runs forever with no
//! backoff (Ctrl+C to stop).
//!
//! Usage: cargo run --example poll --features mock

use pozyx_bridge::mock::{pozyx_descriptor, FixedPorts, MockConnector, MockSdk};
use pozyx_bridge::{reply, Bridge, BridgeConfig, Coordinates};

fn main() {
    env_logger::init();

    let mut sdk = MockSdk::fix_after(2, Coordinates::new(1200, -3400, 980));
    sdk.mark_alive(&[0x6951, 0x6e59, 0x695d, 0x690b, 0x6748]);

    let connector = MockConnector::new(sdk);
    let scan = FixedPorts::new(vec![pozyx_descriptor("/dev/ttyACM0")]);
    let mut bridge = Bridge::initialize_with(BridgeConfig::from_env(), Some(&connector), Box::new(scan));

    loop {
        println!("{}", reply::handle_get_position(&mut bridge));
    }
}
