use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::interface::interface::{InterfaceAddress, NetworkInterface};

/// One addressed, up entry as reported by the OS.
///
/// Backends produce one entry per (interface, address) pair; the registry
/// folds them into [`NetworkInterface`] records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveredAddress {
    pub name: String,
    pub index: u32,
    pub address: InterfaceAddress,
}

/// Source of interface address information.
///
/// Implemented by the OS backends and by test doubles.
pub trait DiscoveryBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Enumerates every addressed interface entry that is up.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Discovery`] when an OS call fails. No partial
    /// result is returned in that case.
    fn discover(&self) -> Result<Vec<DiscoveredAddress>, Error>;
}

/// Explicit choice of discovery backend.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BackendKind {
    /// `getifaddrs` linked list
    IfAddrs,
    /// `SIOCGIFCONF` ioctl (Linux/Android, IPv4 only)
    IfConf,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::IfAddrs => "ifaddrs",
            BackendKind::IfConf => "ifconf",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Folds per-address entries into one record per interface name.
///
/// The first entry for a name creates the record and supplies its index.
/// Records keep the order in which names first appear.
pub(crate) fn group_by_name(entries: Vec<DiscoveredAddress>) -> Vec<NetworkInterface> {
    let mut ifaces: Vec<NetworkInterface> = Vec::new();
    for entry in entries {
        match ifaces.iter_mut().find(|iface| iface.name == entry.name) {
            Some(iface) => iface.addresses.push(entry.address),
            None => ifaces.push(NetworkInterface::new(entry.name, entry.index, entry.address)),
        }
    }
    ifaces
}
