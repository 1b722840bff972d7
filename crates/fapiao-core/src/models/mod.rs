//! Data models for invoice records and extraction configuration.

pub mod config;
pub mod invoice;
