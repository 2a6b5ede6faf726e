#![forbid(unsafe_code)]

mod command;
mod config;
mod entry;
mod owner;
mod store;

pub use config::{QueueFullPolicy, StoreConfig};
pub use entry::Value;
pub use store::Store;
