//! IPC handler implementations.
//!
//! Each handler parses its params into a typed command and hands it to the
//! dispatcher.

pub mod health;
pub mod highlights;
pub mod pages;
pub mod subjects;
