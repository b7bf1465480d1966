// store

mod token_store;

pub use token_store::*;

// collaborators

mod file_relay;

pub use file_relay::*;
