//! Utility modules
//! 
//! This module contains common utilities used throughout the application,
//! including error handling, logging setup, JSON column handling and helper functions.

pub mod errors;
pub mod logging;
pub mod helpers;
pub mod json_fields;

pub use errors::{SocioError, Result};
