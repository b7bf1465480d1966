mod access_gate;
mod relay_service;
mod resolver_client;

pub use access_gate::*;
pub use relay_service::*;
pub use resolver_client::*;
