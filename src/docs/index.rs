//! Parsing of the provider's "Resources List" block into the product index.
//!
//! The block is line oriented:
//!
//! ```text
//! Provider Data Sources
//!   tencentcloud_availability_zones
//!
//! Auto Scaling(AS)
//!   Data Source
//!     tencentcloud_as_scaling_configs
//!   Resource
//!     tencentcloud_as_scaling_config
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

/// Marker prefix of every data source and resource identifier.
pub const DEFAULT_MARKER: &str = "tencentcloud";
pub const DATA_SOURCE_HEADER: &str = "Data Source";
pub const RESOURCE_HEADER: &str = "Resource";
/// Product that lists data sources without section headers and always sorts first.
pub const PROVIDER_DATA_SOURCES: &str = "Provider Data Sources";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IndexError {
    #[error("duplicate section {section:?} in product {product:?}")]
    DuplicateSection { section: String, product: String },

    #[error("no Data Source or Resource before {line:?} in product {product:?}")]
    NoSection { line: String, product: String },

    #[error("no product found")]
    NoProduct,

    #[error("product {0:?} has no data source and resource")]
    EmptyProduct(String),
}

/// A named group of documentation entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub data_sources: Vec<String>,
    pub resources: Vec<String>,
}

impl Product {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn sorted(mut self) -> Self {
        self.data_sources.sort();
        self.resources.sort();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.data_sources.is_empty() && self.resources.is_empty()
    }

    /// Returns true if `name` is listed as a data source or a resource.
    pub fn contains(&self, name: &str) -> bool {
        self.data_sources.iter().any(|n| n == name) || self.resources.iter().any(|n| n == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    DataSource,
    Resource,
}

/// Literals recognised by the index parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub marker: String,
    pub data_source_header: String,
    pub resource_header: String,
    pub sentinel_product: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            data_source_header: DATA_SOURCE_HEADER.to_string(),
            resource_header: RESOURCE_HEADER.to_string(),
            sentinel_product: PROVIDER_DATA_SOURCES.to_string(),
        }
    }
}

impl IndexConfig {
    /// Default literals with a different marker prefix.
    pub fn with_marker(marker: &str) -> Self {
        Self {
            marker: marker.to_string(),
            ..Default::default()
        }
    }

    fn section(&self, line: &str) -> Option<SectionKind> {
        if line == self.data_source_header {
            Some(SectionKind::DataSource)
        } else if line == self.resource_header {
            Some(SectionKind::Resource)
        } else {
            None
        }
    }

    fn header(&self, kind: SectionKind) -> &str {
        match kind {
            SectionKind::DataSource => &self.data_source_header,
            SectionKind::Resource => &self.resource_header,
        }
    }
}

/// Parse the "Resources List" block into products.
///
/// Each product's lists are sorted ascending; products are sorted by name
/// with the sentinel product forced first. Any malformed line aborts the
/// whole parse.
pub fn get_index(doc: &str, config: &IndexConfig) -> Result<Vec<Product>, IndexError> {
    let mut products = Vec::new();
    let mut current = Product::default();
    let mut section: Option<SectionKind> = None;

    for line in doc.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(kind) = config.section(line) {
            if section == Some(kind) {
                return Err(IndexError::DuplicateSection {
                    section: config.header(kind).to_string(),
                    product: current.name,
                });
            }
            section = Some(kind);
        } else if line.starts_with(config.marker.as_str()) {
            match section {
                Some(SectionKind::DataSource) => current.data_sources.push(line.to_string()),
                Some(SectionKind::Resource) => current.resources.push(line.to_string()),
                None if current.name == config.sentinel_product => {
                    current.data_sources.push(line.to_string())
                }
                None => {
                    return Err(IndexError::NoSection {
                        line: line.to_string(),
                        product: current.name,
                    })
                }
            }
        } else {
            let finished = std::mem::replace(&mut current, Product::new(line));
            if !finished.name.is_empty() {
                products.push(finished.sorted());
            }
            section = None;
        }
    }

    if !current.name.is_empty() {
        products.push(current.sorted());
    }

    match products.last() {
        None => return Err(IndexError::NoProduct),
        Some(last) if last.is_empty() => return Err(IndexError::EmptyProduct(last.name.clone())),
        Some(_) => {}
    }

    let sentinel = config.sentinel_product.as_str();
    products.sort_by(|a, b| {
        if a.name == sentinel {
            Ordering::Less
        } else if b.name == sentinel {
            Ordering::Greater
        } else {
            a.name.cmp(&b.name)
        }
    });

    Ok(products)
}

/// Find the product an entry belongs to.
pub fn product_of<'a>(products: &'a [Product], name: &str) -> Option<&'a Product> {
    products.iter().find(|p| p.contains(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(doc: &str) -> Result<Vec<Product>, IndexError> {
        get_index(doc, &IndexConfig::default())
    }

    const SAMPLE: &str = r#"
Provider Data Sources
  tencentcloud_availability_zones
  tencentcloud_availability_regions

Auto Scaling(AS)
  Data Source
    tencentcloud_as_scaling_groups
    tencentcloud_as_scaling_configs
  Resource
    tencentcloud_as_scaling_policy
    tencentcloud_as_scaling_config

Cloud Access Management(CAM)
  Resource
    tencentcloud_cam_role
"#;

    #[test]
    fn test_parse_sample() {
        let products = parse(SAMPLE).unwrap();
        assert_eq!(products.len(), 3);

        assert_eq!(products[0].name, "Provider Data Sources");
        assert_eq!(
            products[0].data_sources,
            vec![
                "tencentcloud_availability_regions",
                "tencentcloud_availability_zones"
            ]
        );
        assert!(products[0].resources.is_empty());

        assert_eq!(products[1].name, "Auto Scaling(AS)");
        assert_eq!(
            products[1].data_sources,
            vec!["tencentcloud_as_scaling_configs", "tencentcloud_as_scaling_groups"]
        );
        assert_eq!(
            products[1].resources,
            vec!["tencentcloud_as_scaling_config", "tencentcloud_as_scaling_policy"]
        );

        assert_eq!(products[2].name, "Cloud Access Management(CAM)");
        assert!(products[2].data_sources.is_empty());
    }

    #[test]
    fn test_sorted_input_is_stable() {
        let first = parse(SAMPLE).unwrap();

        let mut rendered = String::new();
        for product in &first {
            rendered.push_str(&product.name);
            rendered.push('\n');
            if product.name != PROVIDER_DATA_SOURCES && !product.data_sources.is_empty() {
                rendered.push_str("  Data Source\n");
            }
            for name in &product.data_sources {
                rendered.push_str(&format!("    {}\n", name));
            }
            if !product.resources.is_empty() {
                rendered.push_str("  Resource\n");
            }
            for name in &product.resources {
                rendered.push_str(&format!("    {}\n", name));
            }
        }

        assert_eq!(parse(&rendered).unwrap(), first);
    }

    #[test]
    fn test_sentinel_sorted_first() {
        let doc = r#"
B
  Resource
    tencentcloud_b
Provider Data Sources
  tencentcloud_zones
A
  Resource
    tencentcloud_a
"#;
        let names: Vec<String> = parse(doc).unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Provider Data Sources", "A", "B"]);
    }

    #[test]
    fn test_names_sorted_by_bytes() {
        let doc = "b\n Resource\n  tencentcloud_x\nB\n Resource\n  tencentcloud_y\n";
        let names: Vec<String> = parse(doc).unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["B", "b"]);
    }

    #[test]
    fn test_duplicate_section() {
        let doc = r#"
AS
  Data Source
    tencentcloud_as_scaling_configs
  Data Source
    tencentcloud_as_scaling_groups
"#;
        let err = parse(doc).unwrap_err();
        assert_eq!(
            err,
            IndexError::DuplicateSection {
                section: "Data Source".to_string(),
                product: "AS".to_string(),
            }
        );
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_section_switch_back_is_allowed() {
        let doc = r#"
AS
  Data Source
    tencentcloud_as_b
  Resource
    tencentcloud_as_r
  Data Source
    tencentcloud_as_a
"#;
        let products = parse(doc).unwrap();
        assert_eq!(products[0].data_sources, vec!["tencentcloud_as_a", "tencentcloud_as_b"]);
    }

    #[test]
    fn test_marker_without_section() {
        let doc = "AS\n  tencentcloud_as_scaling_config\n";
        let err = parse(doc).unwrap_err();
        assert!(matches!(err, IndexError::NoSection { .. }));
        assert!(err.to_string().contains("no Data Source or Resource"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), Err(IndexError::NoProduct));
        assert_eq!(parse("\n   \n"), Err(IndexError::NoProduct));
        assert_eq!(parse("").unwrap_err().to_string(), "no product found");
    }

    #[test]
    fn test_trailing_empty_product() {
        let doc = "AS\n  Resource\n    tencentcloud_as_scaling_config\nCAM\n  Resource\n";
        assert_eq!(parse(doc), Err(IndexError::EmptyProduct("CAM".to_string())));
    }

    #[test]
    fn test_custom_marker() {
        let config = IndexConfig::with_marker("acme");
        let products = get_index("Things\n  Resource\n    acme_widget\n", &config).unwrap();
        assert_eq!(products[0].resources, vec!["acme_widget"]);
        assert!(product_of(&products, "acme_widget").is_some());
        assert!(product_of(&products, "acme_gadget").is_none());
    }
}
