// src/lib.rs

//! Homework review watcher library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;

#[cfg(test)]
mod testing;
