pub use crate::error::{Error, Result};
pub use crate::interface::backend::BackendKind;
pub use crate::interface::interface::{InterfaceAddress, NetworkInterface};
pub use crate::interface::{get_interface_by_address, get_interface_by_name, get_interfaces, Registry};
pub use crate::net::addr::InetAddress;
pub use crate::net::endpoint::IpEndpoint;
pub use crate::net::family::AddressFamily;
pub use ipnet::IpNet;
