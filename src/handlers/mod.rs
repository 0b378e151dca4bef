// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod health;
pub mod intake;
pub mod media;

pub use health::config as health_config;
pub use intake::config as intake_config;
pub use media::config as media_config;
