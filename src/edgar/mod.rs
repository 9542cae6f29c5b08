// src/edgar/mod.rs
pub mod client;
pub mod filings;
pub mod models;

pub use client::EdgarClient;
