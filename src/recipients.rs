//! Team recipient lookup.
//!
//! Team membership is owned outside the engine. The follow-up email stage only
//! snapshots whoever is active at the moment the email is marked sent.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub name: String,
    pub email: String,
}

impl Recipient {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl std::fmt::Display for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

pub trait RecipientDirectory {
    fn active_recipients(&self) -> Vec<Recipient>;
}

/// A fixed recipient list, typically loaded from `config.toml`.
#[derive(Debug, Clone, Default)]
pub struct StaticRecipients(pub Vec<Recipient>);

impl RecipientDirectory for StaticRecipients {
    fn active_recipients(&self) -> Vec<Recipient> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_recipients() {
        let directory = StaticRecipients(vec![Recipient::new("Dana", "dana@example.com")]);
        let active = directory.active_recipients();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].to_string(), "Dana <dana@example.com>");
    }
}
