#![forbid(unsafe_code)]

pub mod interview;
pub mod session;
pub mod store;
pub mod stream;
