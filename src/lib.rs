//! DiaPredict: collect patient vitals, ask a remote engine for a diabetes risk
//! prediction, and present the result.

pub mod batch;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod form;
pub mod logging;
pub mod render;
pub mod router;
pub mod store;
pub mod vitals;
pub mod web;
