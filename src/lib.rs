pub mod calendar;
pub mod commands;
pub mod completions;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod recipients;
pub mod reconcile;
pub mod reminder;
pub mod store;
pub mod validation;
