pub mod addr;
pub mod config;
pub mod error;
pub mod layout;
pub mod net;
pub mod partition;
pub mod sim;
pub mod topo;
pub mod viz;

pub use error::{Error, Result};

#[cfg(test)]
mod test;
