//! Input validation for operator-supplied values.
//!
//! Deal identifiers end up in file names under `.work/timelines/`, so they
//! are checked before any path is built from them.

use anyhow::{bail, Result};

/// Maximum allowed length for deal IDs.
pub const MAX_ID_LENGTH: usize = 128;

/// Maximum allowed length for free-text notes.
pub const MAX_NOTES_LENGTH: usize = 2000;

/// Reserved names that cannot be used as IDs (case-insensitive).
const RESERVED_NAMES: &[&str] = &[
    ".", "..", "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7",
    "com8", "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

/// Validates that a deal ID is safe for use in file paths.
///
/// An ID is valid if:
/// - It is not empty
/// - It is no longer than MAX_ID_LENGTH characters
/// - It contains only alphanumeric characters, dashes, and underscores
/// - It does not use reserved system names
///
/// # Examples
///
/// ```
/// use dealflow::validation::validate_id;
///
/// assert!(validate_id("acme-2024").is_ok());
/// assert!(validate_id("deal_17").is_ok());
/// assert!(validate_id("").is_err());
/// assert!(validate_id("../etc/passwd").is_err());
/// ```
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        bail!("Deal ID cannot be empty");
    }

    if id.len() > MAX_ID_LENGTH {
        bail!(
            "Deal ID too long: {} characters (max {})",
            id.len(),
            MAX_ID_LENGTH
        );
    }

    let valid_chars = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid_chars {
        bail!("Deal ID '{id}' contains invalid characters. Use only alphanumeric characters, dashes (-), and underscores (_)");
    }

    let id_lower = id.to_lowercase();
    if RESERVED_NAMES.contains(&id_lower.as_str()) {
        bail!("Deal ID '{id}' uses a reserved name");
    }

    Ok(())
}

pub fn validate_notes(notes: &str) -> Result<()> {
    if notes.len() > MAX_NOTES_LENGTH {
        bail!(
            "Notes too long: {} characters (max {})",
            notes.len(),
            MAX_NOTES_LENGTH
        );
    }

    Ok(())
}

/// Loose sanity check for an email address: one `@` with text on both sides
/// and a dot in the domain.
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@') =>
        {
            Ok(())
        }
        _ => bail!("'{email}' is not a valid email address"),
    }
}

/// Clap value parser for validating deal ID arguments.
///
/// ```ignore
/// #[arg(value_parser = clap_id_validator)]
/// deal: String,
/// ```
pub fn clap_id_validator(s: &str) -> Result<String, String> {
    validate_id(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}

pub fn clap_notes_validator(s: &str) -> Result<String, String> {
    validate_notes(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}

pub fn clap_email_validator(s: &str) -> Result<String, String> {
    validate_email(s).map_err(|e| e.to_string())?;
    Ok(s.trim().to_string())
}
