use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;

/// Parse a type from markdown content with YAML frontmatter
///
/// Generic function that extracts YAML frontmatter and deserializes it into the target type.
///
/// # Example
///
/// ```text
/// let record: TimelineRecord = parse_from_markdown(&content, "TimelineRecord")?;
/// ```
///
/// # Errors
///
/// Returns an error if frontmatter extraction fails or YAML deserialization fails.
pub fn parse_from_markdown<T: DeserializeOwned>(content: &str, type_name: &str) -> Result<T> {
    let frontmatter = extract_yaml_frontmatter(content)?;
    serde_yaml::from_value(frontmatter)
        .with_context(|| format!("Failed to parse {type_name} from frontmatter"))
}

/// Extract YAML frontmatter from markdown content
///
/// Expects frontmatter delimited by `---` at the start and end.
/// Returns the parsed YAML as a `serde_yaml::Value`.
///
/// ```text
/// ---
/// deal_id: acme-001
/// current_stage: demo-call
/// ---
/// # Deal acme-001
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - Content is empty or missing opening `---`
/// - Closing `---` is not found
/// - YAML content cannot be parsed
pub fn extract_yaml_frontmatter(content: &str) -> Result<serde_yaml::Value> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.is_empty() || !lines[0].trim().starts_with("---") {
        bail!("No frontmatter delimiter found at start of content");
    }

    // Only a delimiter at the opening indentation closes the block, so `---`
    // inside an indented block scalar (operator notes) is left alone.
    let opening_indent = lines[0].len() - lines[0].trim_start().len();

    let end_idx = lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| {
            let trimmed = line.trim_start();
            trimmed.starts_with("---") && line.len() - trimmed.len() == opening_indent
        })
        .map(|(idx, _)| idx)
        .ok_or_else(|| anyhow::anyhow!("Frontmatter not properly closed with ---"))?;

    let yaml_content = lines[1..end_idx].join("\n");

    serde_yaml::from_str(&yaml_content).context("Failed to parse YAML frontmatter")
}

/// Render a value as a frontmatter block followed by `body`.
pub fn render_with_frontmatter<T: serde::Serialize>(value: &T, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(value).context("Failed to serialize frontmatter")?;

    let mut content = String::with_capacity(yaml.len() + body.len() + 16);
    content.push_str("---\n");
    content.push_str(&yaml);
    content.push_str("---\n\n");
    content.push_str(body);
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Header {
        deal_id: String,
        current_stage: String,
    }

    #[test]
    fn test_extract_valid_frontmatter() {
        let content = r#"---
deal_id: acme-001
current_stage: sales-intake
---
# Deal acme-001
More content here"#;

        let yaml = extract_yaml_frontmatter(content).unwrap();
        assert_eq!(yaml["deal_id"].as_str(), Some("acme-001"));
        assert_eq!(yaml["current_stage"].as_str(), Some("sales-intake"));
    }

    #[test]
    fn test_extract_missing_opening_delimiter() {
        let content = "No frontmatter here\n# Just markdown";
        let result = extract_yaml_frontmatter(content);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("No frontmatter delimiter"));
    }

    #[test]
    fn test_extract_missing_closing_delimiter() {
        let content = "---\ndeal_id: acme-001\n# No closing delimiter";
        let result = extract_yaml_frontmatter(content);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("not properly closed"));
    }

    #[test]
    fn test_extract_empty_content() {
        assert!(extract_yaml_frontmatter("").is_err());
    }

    #[test]
    fn test_extract_invalid_yaml() {
        let content = "---\ninvalid: yaml: syntax: error\n---\n# Content";
        let result = extract_yaml_frontmatter(content);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse YAML"));
    }

    #[test]
    fn test_extract_with_embedded_delimiter_in_block_scalar() {
        let content = r#"---
deal_id: acme-001
notes: |
  Call summary:

  ---
  follow up next week
  ---
current_stage: demo-call
---
# Deal"#;

        let yaml = extract_yaml_frontmatter(content).unwrap();
        assert_eq!(yaml["current_stage"].as_str(), Some("demo-call"));
        assert!(yaml["notes"].as_str().unwrap().contains("---"));
    }

    #[test]
    fn test_render_then_parse() {
        let header = Header {
            deal_id: "acme-001".to_string(),
            current_stage: "gl-review".to_string(),
        };
        let content = render_with_frontmatter(&header, "# Deal acme-001\n").unwrap();
        assert!(content.starts_with("---\n"));
        assert!(content.ends_with("# Deal acme-001\n"));

        let parsed: Header = parse_from_markdown(&content, "Header").unwrap();
        assert_eq!(parsed, header);
    }
}
