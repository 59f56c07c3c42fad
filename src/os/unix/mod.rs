pub mod ifaddrs;
pub(crate) mod symbols;
