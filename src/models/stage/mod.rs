mod methods;
mod transitions;
mod types;

#[cfg(test)]
mod tests;

pub use types::{StageEnvelope, StageId, StageStatus};
