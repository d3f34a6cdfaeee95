//! Markdown rendering of reference pages and the product index.

use crate::docs::comment::ResourceDoc;
use crate::docs::index::Product;
use crate::docs::model::{short_name, Entry, EntryKind, Field};
use std::collections::VecDeque;

/// Provider-level values shared by every page.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub provider: &'a str,
    pub display_name: &'a str,
}

impl PageContext<'_> {
    /// Relative path of the page for `name`, e.g. `r/as_scaling_config.html.markdown`.
    pub fn page_path(&self, kind: EntryKind, name: &str) -> String {
        format!(
            "{}/{}.html.markdown",
            kind.directory(),
            short_name(name, self.provider)
        )
    }
}

/// Render the reference page of one resource or data source.
///
/// `example` is the already formatted "Example Usage" body.
pub fn render_page(
    ctx: &PageContext,
    subcategory: &str,
    entry: &Entry,
    doc: &ResourceDoc,
    example: &str,
) -> String {
    let short = entry.short_name(ctx.provider);
    let mut lines: Vec<String> = Vec::new();

    // Front matter
    lines.push("---".to_string());
    lines.push(format!("subcategory: \"{}\"", subcategory));
    lines.push(format!("layout: \"{}\"", ctx.provider));
    lines.push(format!("page_title: \"{}: {}\"", ctx.display_name, entry.name));
    lines.push(format!(
        "sidebar_current: \"docs-{}-{}-{}\"",
        ctx.provider,
        entry.kind.sidebar_segment(),
        short
    ));
    lines.push("description: |-".to_string());
    lines.push(format!("  {}", doc.summary()));
    lines.push("---".to_string());
    lines.push(String::new());

    lines.push(format!("# {}\n", entry.name));
    lines.push(doc.description.clone());
    lines.push(String::new());

    lines.push("## Example Usage\n".to_string());
    lines.push(example.to_string());
    lines.push(String::new());

    lines.push("## Argument Reference\n".to_string());
    lines.push("The following arguments are supported:\n".to_string());
    lines.extend(render_arguments(&entry.fields));

    let attributes = render_attributes(&entry.fields, 0);
    if entry.kind == EntryKind::Resource || !attributes.is_empty() {
        lines.push("## Attributes Reference\n".to_string());
        lines.push(
            "In addition to all arguments above, the following attributes are exported:\n"
                .to_string(),
        );
        if entry.kind == EntryKind::Resource {
            lines.push("* `id` - ID of the resource.".to_string());
        }
        lines.extend(attributes);
        lines.push(String::new());
    }

    if let Some(ref import) = doc.import {
        lines.push("## Import\n".to_string());
        lines.push(import.clone());
        lines.push(String::new());
    }

    let mut output = lines.join("\n");
    output.truncate(output.trim_end().len());
    output.push('\n');
    output
}

fn visible(fields: &[Field]) -> impl Iterator<Item = &Field> {
    fields.iter().filter(|f| f.removed.is_none())
}

/// Arguments ordered required first, then optional, each by name.
fn ordered_arguments(fields: &[Field]) -> Vec<&Field> {
    let mut args: Vec<&Field> = visible(fields).filter(|f| f.is_argument()).collect();
    args.sort_by(|a, b| b.required.cmp(&a.required).then_with(|| a.name.cmp(&b.name)));
    args
}

/// The top-level argument list followed by one list per nested block.
fn render_arguments(fields: &[Field]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut blocks: VecDeque<&Field> = VecDeque::new();

    for field in ordered_arguments(fields) {
        lines.push(argument_row(field));
        if field.is_block() {
            blocks.push_back(field);
        }
    }
    lines.push(String::new());

    while let Some(block) = blocks.pop_front() {
        let args = ordered_arguments(&block.fields);
        if args.is_empty() {
            continue;
        }
        lines.push(format!(
            "The `{}` object supports the following:\n",
            block.name
        ));
        for field in args {
            lines.push(argument_row(field));
            if field.is_block() {
                blocks.push_back(field);
            }
        }
        lines.push(String::new());
    }

    lines
}

fn argument_row(field: &Field) -> String {
    let mut tags = vec![
        if field.required { "Required" } else { "Optional" }.to_string(),
        field.type_label(),
    ];
    if field.force_new {
        tags.push("ForceNew".to_string());
    }

    let mut text = Vec::new();
    if let Some(ref message) = field.deprecated {
        tags.push("**Deprecated**".to_string());
        if !message.is_empty() {
            text.push(message.as_str());
        }
    }
    if !field.description.is_empty() {
        text.push(field.description.as_str());
    }

    format!("* `{}` - ({}) {}", field.name, tags.join(", "), text.join(" "))
        .trim_end()
        .to_string()
}

/// Exported-only fields; nested attributes are indented under their parent.
fn render_attributes(fields: &[Field], depth: usize) -> Vec<String> {
    let indent = "  ".repeat(depth);
    let mut lines = Vec::new();

    let mut attrs: Vec<&Field> = visible(fields)
        .filter(|f| f.computed && !f.is_argument())
        .collect();
    attrs.sort_by(|a, b| a.name.cmp(&b.name));

    for field in attrs {
        let row = format!("{}* `{}` - {}", indent, field.name, field.description);
        lines.push(row.trim_end().to_string());
        if field.is_block() {
            let nested: Vec<Field> = field
                .fields
                .iter()
                .cloned()
                .map(|mut f| {
                    // Everything below an exported block is exported.
                    f.computed = true;
                    f.required = false;
                    f.optional = false;
                    f
                })
                .collect();
            lines.extend(render_attributes(&nested, depth + 1));
        }
    }

    lines
}

/// Render the index page listing every product.
pub fn render_index(ctx: &PageContext, products: &[Product]) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("---".to_string());
    lines.push(format!("layout: \"{}\"", ctx.provider));
    lines.push(format!("page_title: \"Provider: {}\"", ctx.display_name));
    lines.push(format!("sidebar_current: \"docs-{}-index\"", ctx.provider));
    lines.push("---".to_string());
    lines.push(String::new());
    lines.push(format!("# {} Provider\n", ctx.display_name));

    for product in products {
        lines.push(format!("## {}\n", product.name));
        for (title, kind, names) in [
            ("Data Sources", EntryKind::DataSource, &product.data_sources),
            ("Resources", EntryKind::Resource, &product.resources),
        ] {
            if names.is_empty() {
                continue;
            }
            lines.push(format!("### {}\n", title));
            for name in names {
                lines.push(format!("* [{}]({})", name, ctx.page_path(kind, name)));
            }
            lines.push(String::new());
        }
    }

    let mut output = lines.join("\n");
    output.truncate(output.trim_end().len());
    output.push('\n');
    output
}
