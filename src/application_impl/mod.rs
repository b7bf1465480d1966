mod access_gate_impl;
mod file_relay_fake;
mod relay_service_impl;
mod resolver_client_fake;

pub use access_gate_impl::*;
pub use file_relay_fake::*;
pub use relay_service_impl::*;
pub use resolver_client_fake::*;
