use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Serialized description of every documented resource and data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub provider: String,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl SchemaDocument {
    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Resource,
    DataSource,
}

impl EntryKind {
    /// Directory of the rendered page, `r` or `d`.
    pub fn directory(&self) -> &'static str {
        match self {
            EntryKind::Resource => "r",
            EntryKind::DataSource => "d",
        }
    }

    /// Segment used in `sidebar_current`.
    pub fn sidebar_segment(&self) -> &'static str {
        match self {
            EntryKind::Resource => "resource",
            EntryKind::DataSource => "datasource",
        }
    }
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Resource => write!(f, "resource"),
            EntryKind::DataSource => write!(f, "data source"),
        }
    }
}

/// A resource or data source with its raw doc comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Entry {
    /// Name without the provider prefix, e.g. `as_scaling_config`.
    pub fn short_name<'a>(&'a self, provider: &str) -> &'a str {
        short_name(&self.name, provider)
    }
}

/// Strip the `<provider>_` prefix from an identifier.
pub fn short_name<'a>(name: &'a str, provider: &str) -> &'a str {
    name.strip_prefix(provider)
        .and_then(|rest| rest.strip_prefix('_'))
        .unwrap_or(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    String,
    Int,
    Float,
    Bool,
    List,
    Set,
    Map,
}

impl Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::String => "String",
            FieldType::Int => "Int",
            FieldType::Float => "Float64",
            FieldType::Bool => "Bool",
            FieldType::List => "List",
            FieldType::Set => "Set",
            FieldType::Map => "Map",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub computed: bool,
    #[serde(default)]
    pub force_new: bool,
    #[serde(default)]
    pub deprecated: Option<String>,
    #[serde(default)]
    pub removed: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Element type of a list or set of scalars.
    #[serde(default)]
    pub elem_type: Option<FieldType>,
    /// Nested block schema.
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Field {
    /// Set by the user, as opposed to exported only.
    pub fn is_argument(&self) -> bool {
        self.required || self.optional
    }

    pub fn is_block(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Type label shown in the argument list, e.g. `Set: [`String`]`.
    pub fn type_label(&self) -> String {
        match (self.type_, self.elem_type) {
            (FieldType::List | FieldType::Set, Some(elem)) => {
                format!("{}: [`{}`]", self.type_, elem)
            }
            (type_, _) => type_.to_string(),
        }
    }
}
