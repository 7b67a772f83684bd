//! Analysis pipeline
//!
//! Spec parsing and validation, the stage runner, the artifacts passed
//! between stages and the observer hooks around them.

pub mod artifacts;
pub mod error_code;
pub mod errors;
pub mod observer;
pub mod runner;
pub mod spec;
pub mod validation;
