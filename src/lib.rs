//! Roomr - hostel room registry and best-fit allocator
//!
//! This library exports the core modules for testing and potential reuse.

pub mod app;
pub mod form;
pub mod logging;
pub mod models;
pub mod storage;
pub mod ui;
