//! Serial port enumeration and base-station detection.
//!
//! The base station enumerates as a USB CDC serial device. Its descriptor
//! strings are not guaranteed: depending on OS and firmware the manufacturer
//! or product string may be missing, so detection falls through a list of
//! heuristics and treats any absent field as a non-match.

use serialport::SerialPortType;

/// Manufacturer string reported by Pozyx base stations.
const POZYX_MANUFACTURER: &str = "Pozyx Labs";

/// Product string fallback for firmware that omits the manufacturer.
const POZYX_PRODUCT: &str = "Pozyx";

/// STMicroelectronics vendor id as it appears in hardware-ID strings.
/// Both the base station and INAV flight controllers enumerate with this
/// VID, so a hardware-ID hit alone is not enough (see [`is_pozyx_port`]).
const STM_VID_PREFIX: &str = "0483:";

/// Descriptor of one enumerated serial port. Every field besides the device
/// path is optional because the OS may omit any of them.
#[derive(Debug, Clone)]
pub struct PortDescriptor {
    /// Device path, e.g. `/dev/ttyACM0` or `COM3`.
    pub device: String,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    /// Hardware-ID string in `USB VID:PID=xxxx:xxxx` form.
    pub hwid: Option<String>,
    pub serial_number: Option<String>,
}

impl PortDescriptor {
    /// Descriptor with only the device path set.
    pub fn new(device: &str) -> Self {
        Self {
            device: device.to_string(),
            manufacturer: None,
            product: None,
            hwid: None,
            serial_number: None,
        }
    }

    fn from_info(info: serialport::SerialPortInfo) -> Self {
        match info.port_type {
            SerialPortType::UsbPort(usb) => Self {
                device: info.port_name,
                manufacturer: usb.manufacturer,
                product: usb.product,
                hwid: Some(format!("USB VID:PID={:04X}:{:04X}", usb.vid, usb.pid)),
                serial_number: usb.serial_number,
            },
            _ => Self::new(&info.port_name),
        }
    }
}

/// Check if a port descriptor looks like a Pozyx base station.
///
/// First match wins:
/// 1. manufacturer contains "Pozyx Labs"
/// 2. product contains "Pozyx"
/// 3. hardware-ID carries the STM vendor prefix AND the serial number does
///    not start with "0x" (INAV flight controllers share the vendor prefix
///    but report a "0x..." serial number)
pub fn is_pozyx_port(port: &PortDescriptor) -> bool {
    if port
        .manufacturer
        .as_deref()
        .is_some_and(|m| m.contains(POZYX_MANUFACTURER))
    {
        return true;
    }
    if port
        .product
        .as_deref()
        .is_some_and(|p| p.contains(POZYX_PRODUCT))
    {
        return true;
    }
    match (port.hwid.as_deref(), port.serial_number.as_deref()) {
        (Some(hwid), Some(serial)) if hwid.contains(STM_VID_PREFIX) => {
            !serial.to_ascii_lowercase().starts_with("0x")
        }
        _ => false,
    }
}

/// Source of serial port descriptors.
///
/// The live implementation wraps the OS enumeration; tests and demos
/// substitute a fixed list.
pub trait PortScan {
    fn ports(&self) -> serialport::Result<Vec<PortDescriptor>>;
}

/// OS serial port enumeration via the `serialport` crate.
pub struct SystemPorts;

impl PortScan for SystemPorts {
    fn ports(&self) -> serialport::Result<Vec<PortDescriptor>> {
        Ok(serialport::available_ports()?
            .into_iter()
            .map(PortDescriptor::from_info)
            .collect())
    }
}

/// Scan all enumerated ports and return the device path of the first one
/// that looks like a base station.
pub fn find_base_station(scan: &dyn PortScan) -> serialport::Result<Option<String>> {
    Ok(scan
        .ports()?
        .into_iter()
        .find(is_pozyx_port)
        .map(|port| port.device))
}

/// Device paths of all currently enumerated ports.
pub fn port_names(scan: &dyn PortScan) -> serialport::Result<Vec<String>> {
    Ok(scan.ports()?.into_iter().map(|port| port.device).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::FixedPorts;

    #[test]
    fn matches_on_manufacturer_regardless_of_other_fields() {
        let port = PortDescriptor {
            manufacturer: Some("Pozyx Labs BV".into()),
            ..PortDescriptor::new("/dev/ttyACM0")
        };
        assert!(is_pozyx_port(&port));
    }

    #[test]
    fn matches_on_product_string() {
        let port = PortDescriptor {
            product: Some("Pozyx Virtual ComPort".into()),
            ..PortDescriptor::new("/dev/ttyACM1")
        };
        assert!(is_pozyx_port(&port));
    }

    #[test]
    fn rejects_flight_controller_with_hex_serial() {
        let port = PortDescriptor {
            hwid: Some("USB VID:PID=0483:5740".into()),
            serial_number: Some("0X1A2B".into()),
            ..PortDescriptor::new("/dev/ttyACM0")
        };
        assert!(!is_pozyx_port(&port));
    }

    #[test]
    fn accepts_stm_device_with_plain_serial() {
        let port = PortDescriptor {
            hwid: Some("USB VID:PID=0483:5740".into()),
            serial_number: Some("ABC123".into()),
            ..PortDescriptor::new("/dev/ttyACM0")
        };
        assert!(is_pozyx_port(&port));
    }

    #[test]
    fn missing_fields_are_a_non_match() {
        // Hardware-ID hit alone is not enough without a serial number.
        let port = PortDescriptor {
            hwid: Some("USB VID:PID=0483:5740".into()),
            ..PortDescriptor::new("/dev/ttyACM0")
        };
        assert!(!is_pozyx_port(&port));
        assert!(!is_pozyx_port(&PortDescriptor::new("/dev/ttyS0")));
    }

    #[test]
    fn selection_returns_first_matching_device_path() {
        let scan = FixedPorts::new(vec![
            PortDescriptor {
                hwid: Some("USB VID:PID=0483:5740".into()),
                serial_number: Some("0x8BADF00D".into()),
                ..PortDescriptor::new("/dev/ttyACM0")
            },
            PortDescriptor {
                manufacturer: Some("Pozyx Labs".into()),
                ..PortDescriptor::new("/dev/ttyACM1")
            },
            PortDescriptor {
                product: Some("Pozyx".into()),
                ..PortDescriptor::new("/dev/ttyACM2")
            },
        ]);
        assert_eq!(
            find_base_station(&scan).unwrap(),
            Some("/dev/ttyACM1".to_string())
        );
    }

    #[test]
    fn selection_is_none_without_candidates() {
        let scan = FixedPorts::new(vec![PortDescriptor::new("/dev/ttyS0")]);
        assert_eq!(find_base_station(&scan).unwrap(), None);
    }

    #[test]
    fn port_names_lists_every_device() {
        let scan = FixedPorts::new(vec![
            PortDescriptor::new("/dev/ttyS0"),
            PortDescriptor::new("/dev/ttyACM0"),
        ]);
        assert_eq!(port_names(&scan).unwrap(), vec!["/dev/ttyS0", "/dev/ttyACM0"]);
    }
}
