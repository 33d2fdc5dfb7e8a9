// src/lib.rs

#[macro_use]
pub mod macros;

pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod export;
pub mod params;
pub mod scrape;
