#![forbid(unsafe_code)]

mod error;

pub use error::*;

use std::time::Duration;

pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);
