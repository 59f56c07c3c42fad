pub mod backend;
#[allow(clippy::module_inception)]
pub mod interface;

use std::fmt;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::error::{Error, Result};
use crate::net::addr::InetAddress;

use self::backend::{group_by_name, BackendKind, DiscoveryBackend};
use self::interface::NetworkInterface;

/// Enumerates network interfaces through a [`DiscoveryBackend`].
///
/// Every call queries the OS again; nothing is cached.
pub struct Registry {
    backend: Box<dyn DiscoveryBackend>,
}

impl Registry {
    pub fn new(backend: Box<dyn DiscoveryBackend>) -> Registry {
        Registry { backend }
    }

    /// Registry using the backend named by `kind`.
    /// Returns `None` if that backend does not exist on this platform.
    pub fn with_kind(kind: BackendKind) -> Option<Registry> {
        crate::os::backend_for(kind).map(Registry::new)
    }

    /// Process-wide registry. The backend is selected on first use.
    pub fn system() -> &'static Registry {
        static INSTANCE: OnceCell<Registry> = OnceCell::new();

        INSTANCE.get_or_init(|| {
            let registry = Registry::new(crate::os::system_backend());
            debug!(backend = registry.backend_name(), "selected interface discovery backend");
            registry
        })
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Get a list of addressed, up interfaces in OS enumeration order
    pub fn list_all(&self) -> Result<Vec<NetworkInterface>> {
        let entries = self.backend.discover()?;
        let ifaces = group_by_name(entries);
        debug!(
            backend = self.backend.name(),
            interfaces = ifaces.len(),
            "enumerated interfaces"
        );
        Ok(ifaces)
    }

    /// Finds the interface that has `address` as one of its unicast addresses.
    ///
    /// The scope index takes part in the comparison, so an IPv6 link-local
    /// address only matches when its scope is given too.
    pub fn find_by_address(&self, address: &InetAddress) -> Result<Option<NetworkInterface>> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|iface| iface.has_address(address)))
    }

    pub fn find_by_name(&self, name: &str) -> Result<Option<NetworkInterface>> {
        Ok(self.list_all()?.into_iter().find(|iface| iface.name == name))
    }

    /// First unicast address that is not a loopback address, in enumeration order.
    ///
    /// An IPv6 result carries the scope reported by the OS: the interface
    /// index for link-local addresses, 0 for global ones.
    pub fn local_host(&self) -> Result<InetAddress> {
        let ifaces = self.list_all().map_err(|e| Error::UnknownHost {
            reason: e.to_string(),
        })?;
        let found = ifaces
            .iter()
            .flat_map(|iface| iface.unicast_addresses())
            .find(|addr| !addr.is_loopback())
            .copied();
        found.ok_or_else(|| Error::UnknownHost {
            reason: "no non-loopback address is bound to any interface".to_string(),
        })
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("backend", &self.backend.name())
            .finish()
    }
}

/// Get a list of available Network Interfaces
pub fn get_interfaces() -> Result<Vec<NetworkInterface>> {
    Registry::system().list_all()
}

/// Get the Network Interface with the given name
pub fn get_interface_by_name(name: &str) -> Result<Option<NetworkInterface>> {
    Registry::system().find_by_name(name)
}

/// Get the Network Interface that owns the given address
pub fn get_interface_by_address(address: &InetAddress) -> Result<Option<NetworkInterface>> {
    Registry::system().find_by_address(address)
}
