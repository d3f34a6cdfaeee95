//! Doc comment extraction and splitting.

use crate::docs::model::EntryKind;
use thiserror::Error;

pub const RESOURCES_LIST: &str = "Resources List";
pub const EXAMPLE_USAGE: &str = "Example Usage";
pub const IMPORT: &str = "Import";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DocError {
    #[error("doc of {0} has no description")]
    MissingDescription(String),

    #[error("doc of {0} has no \"Example Usage\" section")]
    MissingExample(String),
}

/// Sections of a resource or data source doc comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDoc {
    pub description: String,
    pub example_usage: String,
    pub import: Option<String>,
}

impl ResourceDoc {
    /// Split `doc` at its `Example Usage` line and, for resources, at the
    /// first `Import` line after it.
    pub fn parse(name: &str, doc: &str, kind: EntryKind) -> Result<Self, DocError> {
        let lines: Vec<&str> = doc.lines().collect();

        let example_at = lines
            .iter()
            .position(|l| l.trim() == EXAMPLE_USAGE)
            .ok_or_else(|| DocError::MissingExample(name.to_string()))?;

        let description = lines[..example_at].join("\n").trim().to_string();
        if description.is_empty() {
            return Err(DocError::MissingDescription(name.to_string()));
        }

        let rest = &lines[example_at + 1..];
        let import_at = match kind {
            EntryKind::Resource => rest.iter().position(|l| l.trim() == IMPORT),
            EntryKind::DataSource => None,
        };

        let (example, import) = match import_at {
            Some(at) => {
                let import = rest[at + 1..].join("\n").trim().to_string();
                (&rest[..at], (!import.is_empty()).then_some(import))
            }
            None => (rest, None),
        };

        Ok(Self {
            description,
            example_usage: example.join("\n").trim().to_string(),
            import,
        })
    }

    /// First line of the description, used in page front matter.
    pub fn summary(&self) -> &str {
        self.description.lines().next().unwrap_or("").trim()
    }
}

/// Leading comment of a Go source file: the first `/* ... */` block before
/// the `package` clause, or else the run of `//` lines right above it.
pub fn extract_block_comment(source: &str) -> Option<String> {
    let head = match source.find("\npackage ") {
        Some(at) => &source[..at],
        None if source.starts_with("package ") => "",
        None => source,
    };

    if let Some(start) = head.find("/*") {
        let body = &head[start + 2..];
        let end = body.find("*/")?;
        return Some(body[..end].trim_matches('\n').to_string());
    }

    let lines: Vec<&str> = head
        .lines()
        .rev()
        .skip_while(|l| l.trim().is_empty())
        .take_while(|l| l.trim_start().starts_with("//"))
        .collect();
    if lines.is_empty() {
        return None;
    }

    let text = lines
        .into_iter()
        .rev()
        .map(|l| {
            let l = l.trim_start().trim_start_matches("//");
            l.strip_prefix(' ').unwrap_or(l)
        })
        .collect::<Vec<_>>()
        .join("\n");
    Some(text)
}

/// The part of the provider doc after its `Resources List` line, or all of
/// it when there is no such line.
pub fn resources_list(doc: &str) -> &str {
    let mut offset = 0;
    for line in doc.split_inclusive('\n') {
        offset += line.len();
        if line.trim() == RESOURCES_LIST {
            return &doc[offset..];
        }
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESOURCE_DOC: &str = r#"Provides a resource to create a configuration for an AS (Auto scaling) instance.

~> **NOTE:** It has been deprecated.

Example Usage

```hcl
resource "tencentcloud_as_scaling_config" "launch_configuration" {
  configuration_name = "launch-configuration"
}
```

Import

AutoScaling Configuration can be imported using the id, e.g.

```
$ terraform import tencentcloud_as_scaling_config.scaling_config asc-n32ymck2
```
"#;

    #[test]
    fn test_parse_resource_doc() {
        let doc = ResourceDoc::parse("r", RESOURCE_DOC, EntryKind::Resource).unwrap();
        assert!(doc.description.starts_with("Provides a resource"));
        assert!(doc.description.ends_with("deprecated."));
        assert_eq!(
            doc.summary(),
            "Provides a resource to create a configuration for an AS (Auto scaling) instance."
        );
        assert!(doc.example_usage.starts_with("```hcl"));
        assert!(doc.example_usage.ends_with("```"));
        let import = doc.import.unwrap();
        assert!(import.starts_with("AutoScaling Configuration"));
        assert!(import.contains("terraform import"));
    }

    #[test]
    fn test_data_source_ignores_import() {
        let doc = ResourceDoc::parse("d", RESOURCE_DOC, EntryKind::DataSource).unwrap();
        assert!(doc.import.is_none());
        assert!(doc.example_usage.contains("Import"));
    }

    #[test]
    fn test_missing_sections() {
        assert_eq!(
            ResourceDoc::parse("x", "Just a description.", EntryKind::Resource),
            Err(DocError::MissingExample("x".to_string()))
        );
        assert_eq!(
            ResourceDoc::parse("x", "\nExample Usage\n```hcl\n```", EntryKind::Resource),
            Err(DocError::MissingDescription("x".to_string()))
        );
    }

    #[test]
    fn test_extract_block_comment() {
        let source = "/*\nThe TencentCloud provider.\n\nResources List\n*/\npackage tencentcloud\n\nfunc x() {}\n";
        assert_eq!(
            extract_block_comment(source).unwrap(),
            "The TencentCloud provider.\n\nResources List"
        );
    }

    #[test]
    fn test_extract_line_comments() {
        let source = "// Copyright line\n\n// Provides a thing.\n//\n// Example Usage\npackage x\n";
        assert_eq!(
            extract_block_comment(source).unwrap(),
            "Provides a thing.\n\nExample Usage"
        );
        assert!(extract_block_comment("package x\n").is_none());
    }

    #[test]
    fn test_resources_list() {
        let doc = "Intro text.\n\nResources List\n\nAS\n  Resource\n";
        assert_eq!(resources_list(doc), "\nAS\n  Resource\n");
        assert_eq!(resources_list("AS\n"), "AS\n");
    }
}
