//! List serial ports and show which one looks like a Pozyx base station.

use pozyx_bridge::ports::{self, PortScan, SystemPorts};

fn main() {
    env_logger::init();

    let scan = SystemPorts;
    let found = match scan.ports() {
        Ok(found) => found,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("Found {} serial port(s):", found.len());
    for port in &found {
        println!(
            "  {}  manufacturer={}  product={}  hwid={}  serial={}  base_station={}",
            port.device,
            port.manufacturer.as_deref().unwrap_or("-"),
            port.product.as_deref().unwrap_or("-"),
            port.hwid.as_deref().unwrap_or("-"),
            port.serial_number.as_deref().unwrap_or("-"),
            ports::is_pozyx_port(port),
        );
    }

    match ports::find_base_station(&scan) {
        Ok(Some(device)) => println!("Base station: {}", device),
        Ok(None) => println!("No base station found"),
        Err(e) => eprintln!("Error: {}", e),
    }
}
