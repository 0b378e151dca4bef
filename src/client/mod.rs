// src/client/mod.rs
// DOCUMENTATION: Client booking flow
// PURPOSE: Everything the customer-facing side does before and after calling the intake endpoint

pub mod fees;
pub mod flow;
pub mod image_encoder;
pub mod intake_client;
pub mod local_bookings;
pub mod validation;

pub use fees::*;
pub use flow::*;
pub use image_encoder::*;
pub use intake_client::*;
pub use local_bookings::*;
pub use validation::*;
