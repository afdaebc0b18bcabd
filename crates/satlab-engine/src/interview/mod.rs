//! The six-question persona interview.

pub mod clarify;
pub mod machine;
pub mod questions;

pub use machine::{Interview, Stage, Step};
