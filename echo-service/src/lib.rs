//! Stateless variant of the Skyhigh API: echoes upload sizes and messages
//! without persisting anything.
pub mod config;
pub mod dtos;
pub mod handlers;
pub mod startup;
