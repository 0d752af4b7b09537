//! Validated content collections for content-driven sites.
//!
//! sitecontent declares the schemas of a site's content collections (blog
//! posts, services, projects, landing pages, authors, categories,
//! testimonials, contact submissions) and validates parsed front matter and
//! data files against them.
//!
//! # Crate Structure
//!
//! - [`schema`]: Schema registry and record validator
//! - [`content`]: Built-in catalog, typed entries, discovery (behind `content` feature)

/// Re-export schema types.
pub mod schema {
    pub use sitecontent_schema::*;
}

/// Re-export content types (requires `content` feature).
#[cfg(feature = "content")]
pub mod content {
    pub use sitecontent_content::*;
}
