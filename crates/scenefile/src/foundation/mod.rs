//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the parser:
//! - Math types and unit conversions
//! - Node arena handles
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod logging;
