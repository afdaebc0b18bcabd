#![forbid(unsafe_code)]

pub mod chat;
pub mod config;
pub mod errors;
pub mod list;
pub mod presets;
pub mod prompt;
pub mod router;
pub mod rules;
pub mod saved;
pub mod schema;
pub mod synth;
pub mod traits;
pub mod types;
