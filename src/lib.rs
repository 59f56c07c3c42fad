#[cfg(not(unix))]
compile_error!("inetif only supports Unix-like systems");

mod sys;

pub mod error;
pub mod interface;
pub mod net;
pub mod os;
pub mod prelude;

pub use error::{Error, Result};
pub use interface::backend::{BackendKind, DiscoveredAddress, DiscoveryBackend};
pub use interface::interface::{InterfaceAddress, NetworkInterface};
pub use interface::{get_interface_by_address, get_interface_by_name, get_interfaces, Registry};
pub use net::addr::InetAddress;
pub use net::endpoint::IpEndpoint;
pub use net::family::AddressFamily;
