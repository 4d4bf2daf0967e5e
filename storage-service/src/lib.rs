//! Persistent variant of the Skyhigh API: uploads go to GridFS, messages to
//! a MongoDB collection.
pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
