pub mod accounting;
pub mod commands;
pub mod config;
pub mod data;
pub mod report;

#[cfg(test)]
mod commands_tests;
