// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod booking;
pub mod media;
pub mod payload;
pub mod sheet;

pub use booking::*;
pub use media::*;
pub use payload::*;
pub use sheet::*;
