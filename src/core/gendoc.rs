use crate::config::{self, Config, FormatterBackend};
use crate::docs::comment::{extract_block_comment, resources_list, DocError, ResourceDoc};
use crate::docs::hcl::{format_hcl_with, BlockFormatter, CanonicalFormatter};
use crate::docs::index::{get_index, product_of, IndexError, Product};
use crate::docs::model::{Entry, EntryKind, Field, SchemaDocument};
use crate::docs::symbol::{check_description, DescriptionError};
use crate::formatters::markdown::{render_index, render_page, PageContext};
use crate::shared::logging;
use crate::terraform::fmt::TerraformFmt;
use anyhow::Context;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum GenDocError {
    #[error("Terraform binary not found")]
    TerraformNotFound,

    #[error("invalid index: {0}")]
    Index(#[from] IndexError),

    #[error(transparent)]
    Doc(#[from] DocError),

    #[error("{0} description problem(s) found")]
    Lint(usize),

    #[error("entry {name:?} does not start with {prefix:?}")]
    InvalidEntryName { name: String, prefix: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Counts reported after a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerateSummary {
    pub products: usize,
    pub data_sources: usize,
    pub resources: usize,
    pub pages_written: usize,
    pub skipped: Vec<String>,
}

pub struct GenDoc {
    config: Config,
    formatter: Box<dyn BlockFormatter>,
}

impl GenDoc {
    /// Load configuration and set up the example formatter.
    ///
    /// `formatter` overrides the backend chosen by the configuration.
    pub fn new(
        config_path: Option<String>,
        formatter: Option<FormatterBackend>,
    ) -> anyhow::Result<Self> {
        let mut config = match config_path {
            Some(path) => {
                let path_buf = PathBuf::from(&path);
                if path_buf.is_absolute() {
                    logging::info(&format!("Using absolute config path: {}", path));
                    config::init_from_path(&path)?
                } else {
                    let abs_path = std::env::current_dir()?.join(&path);
                    logging::info(&format!(
                        "Converting relative config path to absolute: {}",
                        abs_path.display()
                    ));
                    config::init_from_path(abs_path.to_str().unwrap_or(&path))?
                }
            }
            None => {
                logging::debug("No config path provided, using default configuration");
                config::init_default()?
            }
        };

        if let Some(backend) = formatter {
            config.formatter.backend = backend;
        }

        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let formatter: Box<dyn BlockFormatter> = match config.formatter.backend {
            FormatterBackend::Builtin => Box::new(CanonicalFormatter),
            FormatterBackend::Terraform => {
                match TerraformFmt::locate(config.formatter.executable_path.as_deref()) {
                    Ok(fmt) => Box::new(fmt),
                    Err(e) => {
                        logging::error(&e.to_string());
                        return Err(GenDocError::TerraformNotFound.into());
                    }
                }
            }
        };

        logging::debug(&format!(
            "GenDoc initialized for provider {} with {:?} formatter",
            config.provider.name, config.formatter.backend
        ));
        Ok(Self { config, formatter })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn page_context(&self) -> PageContext<'_> {
        PageContext {
            provider: &self.config.provider.name,
            display_name: &self.config.provider.display_name,
        }
    }

    /// Build the product index from a provider doc: plain text, or a Go
    /// source whose leading comment holds the "Resources List".
    pub fn build_index(&self, source: &str) -> Result<Vec<Product>, GenDocError> {
        let doc = extract_block_comment(source).unwrap_or_else(|| source.to_string());
        let products = get_index(resources_list(&doc), &self.config.index_config())?;
        logging::debug(&format!("Parsed {} products from index", products.len()));
        Ok(products)
    }

    /// Read a schema document and check that every entry carries the
    /// provider prefix.
    pub fn load_schema(&self, path: &Path) -> Result<SchemaDocument, GenDocError> {
        let schema = read_schema(path)?;
        self.check_entry_names(&schema)?;
        Ok(schema)
    }

    fn check_entry_names(&self, schema: &SchemaDocument) -> Result<(), GenDocError> {
        let prefix = self.config.entry_prefix();
        match schema.entries.iter().find(|e| !e.name.starts_with(&prefix)) {
            Some(entry) => Err(GenDocError::InvalidEntryName {
                name: entry.name.clone(),
                prefix,
            }),
            None => Ok(()),
        }
    }

    /// Format the fenced examples of an "Example Usage" section.
    pub fn format_example(&self, example: &str) -> String {
        format_hcl_with(example, self.formatter.as_ref())
    }

    /// Check every field description of every entry.
    pub fn lint(&self, schema: &SchemaDocument) -> Vec<DescriptionError> {
        let mut problems = Vec::new();
        for entry in &schema.entries {
            lint_fields(&entry.name, &entry.fields, &mut problems);
        }
        problems
    }

    /// Render the page of a single entry.
    pub fn render_entry(&self, entry: &Entry, subcategory: &str) -> Result<String, GenDocError> {
        let doc = ResourceDoc::parse(&entry.name, &entry.doc, entry.kind)?;
        let example = self.format_example(&doc.example_usage);
        if example.is_empty() {
            logging::warn(&format!("{} has no fenced example", entry.name));
        }
        Ok(render_page(
            &self.page_context(),
            subcategory,
            entry,
            &doc,
            &example,
        ))
    }

    /// Read the index source and schema document, then write every page
    /// and the index page below `output_dir` (or the configured directory).
    pub fn generate(
        &self,
        schema_path: &Path,
        index_path: &Path,
        output_dir: Option<&Path>,
    ) -> Result<GenerateSummary, GenDocError> {
        let output_dir = output_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&self.config.output.directory));

        let source = fs::read_to_string(index_path)
            .with_context(|| format!("failed to read index {}", index_path.display()))?;
        let products = self.build_index(&source)?;

        let schema = self.load_schema(schema_path)?;
        if schema.provider != self.config.provider.name {
            logging::warn(&format!(
                "Schema provider '{}' differs from configured provider '{}'",
                schema.provider, self.config.provider.name
            ));
        }

        let problems = self.lint(&schema);
        if !problems.is_empty() {
            for problem in &problems {
                logging::error(&problem.to_string());
            }
            return Err(GenDocError::Lint(problems.len()));
        }

        for product in &products {
            for name in product.data_sources.iter().chain(&product.resources) {
                if schema.entry(name).is_none() {
                    logging::warn(&format!("{} is listed in the index but has no schema", name));
                }
            }
        }

        let mut summary = GenerateSummary {
            products: products.len(),
            ..Default::default()
        };
        let ctx = self.page_context();

        for entry in &schema.entries {
            let Some(product) = product_of(&products, &entry.name) else {
                logging::warn(&format!(
                    "{} {} is not listed in any product, skipping",
                    entry.kind, entry.name
                ));
                summary.skipped.push(entry.name.clone());
                continue;
            };

            let page = self.render_entry(entry, &product.name)?;
            let path = output_dir.join(ctx.page_path(entry.kind, &entry.name));
            write_file(&path, &page)?;
            logging::debug(&format!("Wrote {}", path.display()));

            match entry.kind {
                EntryKind::DataSource => summary.data_sources += 1,
                EntryKind::Resource => summary.resources += 1,
            }
            summary.pages_written += 1;
        }

        let index_path = output_dir.join(format!("{}.md", self.config.provider.name));
        write_file(&index_path, &render_index(&ctx, &products))?;
        summary.pages_written += 1;

        logging::info(&format!(
            "Generated {} pages ({} data sources, {} resources) in {}",
            summary.pages_written,
            summary.data_sources,
            summary.resources,
            output_dir.display()
        ));
        Ok(summary)
    }
}

/// Read a schema document from a JSON file.
pub fn read_schema(path: &Path) -> anyhow::Result<SchemaDocument> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read schema {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse schema {}", path.display()))
}

fn lint_fields(prefix: &str, fields: &[Field], problems: &mut Vec<DescriptionError>) {
    for field in fields.iter().filter(|f| f.removed.is_none()) {
        let key = format!("{}.{}", prefix, field.name);
        if field.description.is_empty() {
            problems.push(DescriptionError::Missing { key: key.clone() });
        } else if let Err(e) = check_description(&key, &field.description) {
            problems.push(e);
        }
        lint_fields(&key, &field.fields, problems);
    }
}

fn write_file(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::model::FieldType;

    fn gendoc() -> GenDoc {
        GenDoc::from_config(Config::default()).unwrap()
    }

    fn field(name: &str, description: &str) -> Field {
        Field {
            name: name.to_string(),
            type_: FieldType::String,
            required: true,
            optional: false,
            computed: false,
            force_new: false,
            deprecated: None,
            removed: None,
            description: description.to_string(),
            elem_type: None,
            fields: Vec::new(),
        }
    }

    #[test]
    fn test_build_index_from_go_source() {
        let source = "/*\nThe TencentCloud provider.\n\nResources List\n\nAS\n  Resource\n    tencentcloud_as_scaling_config\n*/\npackage tencentcloud\n";
        let products = gendoc().build_index(source).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].resources, vec!["tencentcloud_as_scaling_config"]);
    }

    #[test]
    fn test_build_index_with_configured_marker() {
        let mut config = Config::default();
        config.index.marker = "acme".to_string();
        let products = GenDoc::from_config(config)
            .unwrap()
            .build_index("Things\n  Resource\n    acme_widget\n")
            .unwrap();
        assert_eq!(products[0].name, "Things");
        assert_eq!(products[0].resources, vec!["acme_widget"]);
    }

    #[test]
    fn test_new_applies_formatter_override() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"formatter": {"backend": "terraform", "executable_path": "/nonexistent/terraform"}}"#,
        )
        .unwrap();
        let path = path.to_str().unwrap().to_string();

        assert!(GenDoc::new(Some(path.clone()), None).is_err());
        let gendoc = GenDoc::new(Some(path), Some(FormatterBackend::Builtin)).unwrap();
        assert_eq!(gendoc.config().formatter.backend, FormatterBackend::Builtin);
    }

    #[test]
    fn test_entry_names_need_provider_prefix() {
        let schema = SchemaDocument {
            provider: "tencentcloud".to_string(),
            entries: vec![Entry {
                name: "foo_bar".to_string(),
                kind: EntryKind::Resource,
                doc: String::new(),
                fields: Vec::new(),
            }],
        };
        match gendoc().check_entry_names(&schema) {
            Err(GenDocError::InvalidEntryName { name, prefix }) => {
                assert_eq!(name, "foo_bar");
                assert_eq!(prefix, "tencentcloud_");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_build_index_error() {
        let err = gendoc().build_index("").unwrap_err();
        assert!(matches!(err, GenDocError::Index(IndexError::NoProduct)));
    }

    #[test]
    fn test_lint_walks_nested_fields() {
        let mut block = field("data_disk", "Data disk.");
        block.fields = vec![field("disk_type", ""), field("disk_size", "Size ,in GB.")];
        let mut removed = field("old", "bad");
        removed.removed = Some("gone".to_string());

        let schema = SchemaDocument {
            provider: "tencentcloud".to_string(),
            entries: vec![Entry {
                name: "tencentcloud_x".to_string(),
                kind: EntryKind::Resource,
                doc: String::new(),
                fields: vec![block, field("name", "Name"), removed],
            }],
        };

        let keys: Vec<String> = gendoc()
            .lint(&schema)
            .iter()
            .map(|e| e.key().to_string())
            .collect();
        assert_eq!(
            keys,
            vec![
                "tencentcloud_x.data_disk.disk_type",
                "tencentcloud_x.data_disk.disk_size",
                "tencentcloud_x.name",
            ]
        );
    }

    #[test]
    fn test_render_entry_requires_example() {
        let entry = Entry {
            name: "tencentcloud_x".to_string(),
            kind: EntryKind::Resource,
            doc: "Provides x.".to_string(),
            fields: Vec::new(),
        };
        assert!(matches!(
            gendoc().render_entry(&entry, "X"),
            Err(GenDocError::Doc(DocError::MissingExample(_)))
        ));
    }
}
