//! Content module - collections, front-matter, and the post schema

mod collection;
mod frontmatter;
pub mod loader;
mod markdown;
mod pattern;
mod schema;

pub use collection::{Collection, ContentStore, PostEntry};
pub use frontmatter::{FieldMap, FieldValue, Format, FrontMatter, ParseError};
pub use markdown::MarkdownRenderer;
pub use pattern::FilePattern;
pub use schema::{PostRecord, PublishDate};
