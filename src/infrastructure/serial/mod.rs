// Serial module - Device access and enumeration
pub mod client;
pub mod ports;

pub use client::SerialClient;
pub use ports::{PortEnumerator, PortInfo, SystemPorts};
