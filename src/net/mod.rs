pub mod addr;
pub mod endpoint;
pub mod family;
