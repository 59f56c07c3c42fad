use std::io;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced while parsing addresses or enumerating interfaces.
///
/// A lookup that finds nothing is not an error: the `find_*` operations
/// return `Ok(None)` in that case.
#[derive(Debug, Error)]
pub enum Error {
    /// The textual form is not a valid address for the detected family.
    #[error("invalid address {input:?}: {reason}")]
    InvalidAddress {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Raw address bytes are neither 4 nor 16 bytes long.
    #[error("IP address is out of range: {len} raw bytes")]
    OutOfRange {
        /// Length of the rejected buffer.
        len: usize,
    },

    /// No non-loopback address is bound to any local interface.
    #[error("unknown host: {reason}")]
    UnknownHost {
        /// What went wrong while looking for a local address.
        reason: String,
    },

    /// An OS interface enumeration call failed.
    #[error("{call} failed: {source}")]
    Discovery {
        /// The OS primitive that failed.
        call: &'static str,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn invalid_address(input: &str, reason: impl Into<String>) -> Self {
        Error::InvalidAddress {
            input: input.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn discovery(call: &'static str, source: io::Error) -> Self {
        Error::Discovery { call, source }
    }

    /// Shorthand for a discovery failure reported through `errno`.
    pub(crate) fn last_os_error(call: &'static str) -> Self {
        Error::discovery(call, io::Error::last_os_error())
    }
}
