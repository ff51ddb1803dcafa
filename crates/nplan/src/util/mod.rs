//! Utility functions for address handling.

pub mod addr;
