//! Collect YouTube video metadata for a keyword or channel and export it as a
//! dated `.xlsx` workbook.
//!
//! The pipeline runs search → detail lookup → date filter → duration
//! normalisation → export, one request at a time.

pub mod api;
pub mod commands;
pub mod config;
pub mod duration;
pub mod error;
pub mod export;
pub mod fetcher;
pub mod filter;
pub mod models;
pub mod pipeline;
pub mod retry;
pub mod search;

pub use error::{Error, Result};
