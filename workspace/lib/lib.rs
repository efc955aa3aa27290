//! Support code for the `serve` and `simulate` binaries: environment
//! configuration, HTML views, and the HTTP router.

pub mod config;
pub mod pages;
pub mod app;
