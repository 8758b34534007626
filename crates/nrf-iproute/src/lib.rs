mod backend;
mod command;
mod parse;

pub use backend::IpRouteBackend;
pub use command::{CommandError, Privilege};
