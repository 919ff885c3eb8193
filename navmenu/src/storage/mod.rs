//! Configuration storage

pub mod settings;
