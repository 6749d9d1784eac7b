//! Integration tests for rit-bot.
//!
//! These tests run the real REST client against a local mock exchange:
//! - Request shape and error mapping
//! - End-to-end sessions through the strategy runner

pub mod common;
