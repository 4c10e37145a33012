//! CLI module for the compatdex binary
//!
//! Argument parsing and logger setup. The library never depends on this.

pub mod args;
