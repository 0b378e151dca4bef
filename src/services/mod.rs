// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod availability;
pub mod intake_service;
pub mod media_service;
pub mod media_store;

pub use availability::*;
pub use intake_service::*;
pub use media_service::*;
pub use media_store::*;
