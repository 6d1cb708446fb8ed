//! Core entity definitions for the tasklist service.
//!
//! This crate defines the data types shared by the stores and the HTTP
//! layer: the task entity and its three-valued status.

mod task;

pub use task::*;
