// src/lib.rs
// DOCUMENTATION: Library root
// PURPOSE: Shared by the intake server and the `book` CLI

pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
