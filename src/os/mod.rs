#[cfg(target_family = "unix")]
pub mod unix;

// Android shares the Linux ioctl interface.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub mod linux;

use tracing::{debug, warn};

use crate::interface::backend::{BackendKind, DiscoveryBackend};
use crate::os::unix::ifaddrs::IfAddrsBackend;

/// Picks the backend for the running process.
///
/// `getifaddrs` resolved at runtime is preferred. Without it Linux and
/// Android fall back to `SIOCGIFCONF`, other systems to the statically
/// linked `getifaddrs`.
pub(crate) fn system_backend() -> Box<dyn DiscoveryBackend> {
    if let Some(syms) = unix::symbols::ifaddrs_symbols() {
        debug!("using runtime-resolved getifaddrs backend");
        return Box::new(IfAddrsBackend::with_fns(syms.getifaddrs, syms.freeifaddrs));
    }
    fallback_backend()
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn fallback_backend() -> Box<dyn DiscoveryBackend> {
    warn!("getifaddrs could not be resolved, falling back to SIOCGIFCONF");
    Box::new(linux::ifconf::IfConfBackend::new())
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn fallback_backend() -> Box<dyn DiscoveryBackend> {
    warn!("getifaddrs could not be resolved, using the statically linked one");
    Box::new(IfAddrsBackend::new())
}

/// Builds the backend named by `kind`, or `None` if this platform lacks it.
pub(crate) fn backend_for(kind: BackendKind) -> Option<Box<dyn DiscoveryBackend>> {
    match kind {
        BackendKind::IfAddrs => Some(Box::new(IfAddrsBackend::new())),
        #[cfg(any(target_os = "linux", target_os = "android"))]
        BackendKind::IfConf => Some(Box::new(linux::ifconf::IfConfBackend::new())),
        #[cfg(not(any(target_os = "linux", target_os = "android")))]
        BackendKind::IfConf => None,
    }
}
