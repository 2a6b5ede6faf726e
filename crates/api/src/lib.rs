#![forbid(unsafe_code)]

pub mod handler;
mod request;

pub use handler::{Response, Status, dispatch, handle, try_dispatch};
pub use request::{Method, Request};
