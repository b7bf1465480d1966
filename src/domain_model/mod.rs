mod link;
mod message;
mod subject;
mod token;

pub use link::*;
pub use message::*;
pub use subject::*;
pub use token::*;
