//! Hardware-free stand-ins for the vendor SDK and the port enumeration.
//!
//! Compiled for unit tests and, behind the `mock` feature, for the demo
//! binaries so the whole bridge can be driven without a base station.

use crate::ports::{PortDescriptor, PortScan};
use crate::sdk::{
    Algorithm, Dimension, PositioningSdk, SdkConnector, SdkError, SdkResult, WHO_AM_I_ID,
};
use crate::types::{Anchor, Coordinates};
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// Record of every call a [`MockSdk`] received, shared with the test through
/// [`MockSdk::log_handle`] since the bridge takes ownership of the SDK.
#[derive(Debug, Default)]
pub struct CallLog {
    pub clear_devices: usize,
    /// Network ids in registration order.
    pub added_anchors: Vec<u16>,
    pub positioning_calls: usize,
    /// Targets of who-am-i queries, `None` for the base station itself.
    pub liveness_queries: Vec<Option<u16>>,
    /// Broadcast frames as (destination, payload).
    pub sent: Vec<(u16, Vec<u8>)>,
}

/// Scripted positioning SDK.
///
/// Positioning outcomes are served from a queue; once the queue is empty
/// every further attempt returns the configured default. Liveness is a set
/// of unit ids that answer the who-am-i query.
pub struct MockSdk {
    outcomes: VecDeque<SdkResult<Coordinates>>,
    default_outcome: SdkResult<Coordinates>,
    alive: HashSet<u16>,
    log: Arc<Mutex<CallLog>>,
}

impl MockSdk {
    /// Every positioning attempt succeeds with the given fix.
    pub fn always(fix: Coordinates) -> Self {
        Self {
            outcomes: VecDeque::new(),
            default_outcome: Ok(fix),
            alive: HashSet::new(),
            log: Arc::default(),
        }
    }

    /// The first `failures` attempts fail, every later one returns the fix.
    pub fn fix_after(failures: usize, fix: Coordinates) -> Self {
        let mut sdk = Self::always(fix);
        sdk.outcomes = (0..failures).map(|_| Err(SdkError::Failure)).collect();
        sdk
    }

    /// Every positioning attempt fails.
    pub fn never_fixes() -> Self {
        Self {
            outcomes: VecDeque::new(),
            default_outcome: Err(SdkError::Failure),
            alive: HashSet::new(),
            log: Arc::default(),
        }
    }

    /// Mark units as answering the who-am-i query.
    pub fn mark_alive(&mut self, ids: &[u16]) {
        self.alive.extend(ids.iter().copied());
    }

    /// Shared handle onto the call log.
    pub fn log_handle(&self) -> Arc<Mutex<CallLog>> {
        self.log.clone()
    }

    fn log(&self) -> SdkResult<std::sync::MutexGuard<'_, CallLog>> {
        self.log
            .lock()
            .map_err(|_| SdkError::Other("mock call log poisoned".into()))
    }
}

impl PositioningSdk for MockSdk {
    fn clear_devices(&mut self, _remote: Option<u16>) -> SdkResult<()> {
        self.log()?.clear_devices += 1;
        Ok(())
    }

    fn add_device(&mut self, anchor: &Anchor, _remote: Option<u16>) -> SdkResult<()> {
        self.log()?.added_anchors.push(anchor.network_id);
        Ok(())
    }

    fn do_positioning(
        &mut self,
        _dimension: Dimension,
        _height_mm: i32,
        _algorithm: Algorithm,
        _remote: Option<u16>,
    ) -> SdkResult<Coordinates> {
        self.log()?.positioning_calls += 1;
        self.outcomes
            .pop_front()
            .unwrap_or_else(|| self.default_outcome.clone())
    }

    fn who_am_i(&mut self, remote: Option<u16>) -> SdkResult<u8> {
        self.log()?.liveness_queries.push(remote);
        match remote {
            // The base station itself always answers.
            None => Ok(WHO_AM_I_ID),
            Some(id) if self.alive.contains(&id) => Ok(WHO_AM_I_ID),
            Some(_) => Ok(0),
        }
    }

    fn send_data(&mut self, destination: u16, payload: &[u8]) -> SdkResult<()> {
        self.log()?.sent.push((destination, payload.to_vec()));
        Ok(())
    }
}

/// One-shot connector handing out a prepared [`MockSdk`].
pub struct MockConnector {
    sdk: Mutex<Option<MockSdk>>,
}

impl MockConnector {
    pub fn new(sdk: MockSdk) -> Self {
        Self {
            sdk: Mutex::new(Some(sdk)),
        }
    }
}

impl SdkConnector for MockConnector {
    fn connect(&self, _port: &str) -> SdkResult<Box<dyn PositioningSdk>> {
        let mut slot = self
            .sdk
            .lock()
            .map_err(|_| SdkError::Other("mock connector poisoned".into()))?;
        match slot.take() {
            Some(sdk) => Ok(Box::new(sdk)),
            None => Err(SdkError::Other("mock connector already consumed".into())),
        }
    }
}

/// Port scanner backed by a shared, mutable list so tests can unplug the
/// device mid-run.
pub struct FixedPorts {
    ports: Arc<Mutex<Vec<PortDescriptor>>>,
}

impl FixedPorts {
    pub fn new(ports: Vec<PortDescriptor>) -> Self {
        Self {
            ports: Arc::new(Mutex::new(ports)),
        }
    }

    /// Shared handle onto the port list.
    pub fn handle(&self) -> Arc<Mutex<Vec<PortDescriptor>>> {
        self.ports.clone()
    }
}

impl PortScan for FixedPorts {
    fn ports(&self) -> serialport::Result<Vec<PortDescriptor>> {
        Ok(self
            .ports
            .lock()
            .map(|ports| ports.clone())
            .unwrap_or_default())
    }
}

/// Descriptor of a plugged-in base station, for tests and demos.
pub fn pozyx_descriptor(device: &str) -> PortDescriptor {
    PortDescriptor {
        manufacturer: Some("Pozyx Labs".into()),
        product: Some("Pozyx Virtual ComPort".into()),
        hwid: Some("USB VID:PID=0483:5740".into()),
        serial_number: Some("POZYX001".into()),
        ..PortDescriptor::new(device)
    }
}
