use dlopen2::raw::Library;
use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use super::ifaddrs::{FreeIfAddrsFn, GetIfAddrsFn};

/// `getifaddrs`/`freeifaddrs` resolved at runtime, with the library handle
/// that keeps them valid.
pub(crate) struct IfAddrsSymbols {
    _lib: Library,
    pub(crate) getifaddrs: GetIfAddrsFn,
    pub(crate) freeifaddrs: FreeIfAddrsFn,
}

#[cfg(target_os = "android")]
fn open_libc() -> Result<Library, dlopen2::Error> {
    Library::open("libc.so")
}

#[cfg(not(target_os = "android"))]
fn open_libc() -> Result<Library, dlopen2::Error> {
    Library::open_self()
}

fn load() -> Option<IfAddrsSymbols> {
    let lib = match open_libc() {
        Ok(lib) => lib,
        Err(err) => {
            warn!(error = ?err, "failed to open libc for symbol lookup");
            return None;
        }
    };
    let getifaddrs = match unsafe { lib.symbol::<GetIfAddrsFn>("getifaddrs") } {
        Ok(f) => f,
        Err(err) => {
            warn!(error = ?err, "getifaddrs is not available");
            return None;
        }
    };
    let freeifaddrs = match unsafe { lib.symbol::<FreeIfAddrsFn>("freeifaddrs") } {
        Ok(f) => f,
        Err(err) => {
            warn!(error = ?err, "freeifaddrs is not available");
            return None;
        }
    };
    debug!("resolved getifaddrs and freeifaddrs at runtime");
    Some(IfAddrsSymbols {
        _lib: lib,
        getifaddrs,
        freeifaddrs,
    })
}

/// Looks up the `getifaddrs` pair in the running process. Runs once.
pub(crate) fn ifaddrs_symbols() -> Option<&'static IfAddrsSymbols> {
    static INSTANCE: OnceCell<Option<IfAddrsSymbols>> = OnceCell::new();

    INSTANCE.get_or_init(load).as_ref()
}
