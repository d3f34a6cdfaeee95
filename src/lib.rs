// Re-export modules for testing and external use
pub mod docs {
    pub mod comment;
    pub mod hcl;
    pub mod index;
    pub mod model;
    pub mod symbol;

    // Re-export commonly used items
    pub use comment::{DocError, ResourceDoc};
    pub use hcl::{format_hcl, format_hcl_with, BlockFormatter, CanonicalFormatter};
    pub use index::{get_index, IndexConfig, IndexError, Product, SectionKind};
    pub use model::{Entry, EntryKind, Field, FieldType, SchemaDocument};
    pub use symbol::{check_description, contains_big_symbol, DescriptionError};
}

pub mod formatters {
    pub mod markdown;

    pub use markdown::{render_index, render_page, PageContext};
}

pub mod shared {
    pub mod logging;
}

pub mod terraform {
    pub mod fmt;
}

pub mod core {
    pub mod gendoc;
}

pub mod config;

// Re-export commonly used types for easier testing and external use
pub use core::gendoc::{GenDoc, GenDocError, GenerateSummary};
pub use docs::{format_hcl, get_index, Product};
