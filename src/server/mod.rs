mod poller;
mod server;
mod update_handler;

pub use poller::*;
pub use server::*;
pub use update_handler::*;
