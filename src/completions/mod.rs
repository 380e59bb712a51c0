pub mod deals;
pub mod generator;

pub use deals::complete_deal_ids;
pub use generator::{generate_completions, write_completions, Shell};
