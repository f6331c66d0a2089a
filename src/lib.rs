//! Salaty Library
//!
//! This module exposes the application modules for use in integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod display;
pub mod i18n;
pub mod service;
