//! Core domain types and logic.

pub mod bar;
pub mod correlation;
pub mod signal;
pub mod classify;
pub mod backtest;
pub mod analyzer;
pub mod risk;
pub mod market;
pub mod config_validation;
pub mod error;
