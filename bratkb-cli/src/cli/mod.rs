//! CLI modules for the bratkb binary.

pub mod commands;
pub mod output;
pub mod parser;
