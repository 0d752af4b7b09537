//! The site's fixed set of content collections.
//!
//! Sub-shapes (social links, feature cards, testimonials, price cards) are
//! declared once and shared by reference between the collections that embed
//! them. Soft references (`author`, `category`) are plain strings here; see
//! [`crate::references`] for the integrity report.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use sitecontent_schema::{
    CollectionSchema, FieldKind, FieldSpec, RegistryConfig, SchemaRegistry, Shape, SourceType,
};

use crate::error::Result;

/// Names of the built-in collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Blog,
    Services,
    Projects,
    Landing,
    Authors,
    Categories,
    Testimonials,
    Contacts,
}

impl Collection {
    pub const ALL: [Collection; 8] = [
        Collection::Blog,
        Collection::Services,
        Collection::Projects,
        Collection::Landing,
        Collection::Authors,
        Collection::Categories,
        Collection::Testimonials,
        Collection::Contacts,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Blog => "blog",
            Collection::Services => "services",
            Collection::Projects => "projects",
            Collection::Landing => "landing",
            Collection::Authors => "authors",
            Collection::Categories => "categories",
            Collection::Testimonials => "testimonials",
            Collection::Contacts => "contacts",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|collection| collection.as_str() == s)
            .ok_or_else(|| format!("unknown collection: {s}"))
    }
}

/// Shapes embedded by more than one collection.
#[derive(Debug, Clone)]
pub struct Shapes {
    pub social_link: Arc<Shape>,
    pub feature_card: Arc<Shape>,
    pub testimonial: Arc<Shape>,
    pub price_card: Arc<Shape>,
    pub author: Arc<Shape>,
    pub category: Arc<Shape>,
}

impl Shapes {
    pub fn new() -> Self {
        let social_link = Shape::shared(
            "SocialLink",
            vec![
                FieldSpec::string("platform"),
                FieldSpec::url("href"),
                FieldSpec::string("icon"),
            ],
        );
        let feature_card = Shape::shared(
            "FeatureCard",
            vec![
                FieldSpec::string("title"),
                FieldSpec::string("description"),
                FieldSpec::string("icon").optional(),
            ],
        );
        let testimonial = Shape::shared(
            "Testimonial",
            vec![
                FieldSpec::string("quote"),
                FieldSpec::string("name"),
                FieldSpec::string("role").optional(),
                FieldSpec::string("company").optional(),
                FieldSpec::string("avatar").optional(),
            ],
        );
        let price_card = Shape::shared(
            "PriceCard",
            vec![
                FieldSpec::string("title"),
                FieldSpec::array("features", FieldKind::String),
                FieldSpec::string("price"),
                FieldSpec::string("badge").optional(),
                FieldSpec::string("ctaText"),
                FieldSpec::string("ctaUrl").optional(),
            ],
        );
        let author = Shape::shared(
            "Author",
            vec![
                FieldSpec::string("name"),
                FieldSpec::string("position"),
                FieldSpec::string("avatar"),
                FieldSpec::string("bio"),
                FieldSpec::url("website").optional(),
                FieldSpec::array_of("social", &social_link).optional(),
            ],
        );
        let category = Shape::shared(
            "Category",
            vec![
                FieldSpec::string("title"),
                FieldSpec::string("icon"),
                FieldSpec::string("slug"),
            ],
        );

        Self {
            social_link,
            feature_card,
            testimonial,
            price_card,
            author,
            category,
        }
    }
}

impl Default for Shapes {
    fn default() -> Self {
        Self::new()
    }
}

/// Schema of one built-in collection, using the given shared shapes.
pub fn schema(collection: Collection, shapes: &Shapes) -> CollectionSchema {
    let name = collection.as_str();
    match collection {
        Collection::Blog => CollectionSchema::new(
            name,
            SourceType::Page,
            "blog/**/*.md",
            vec![
                FieldSpec::string("title"),
                FieldSpec::string("description"),
                FieldSpec::string("slug"),
                FieldSpec::string("intro").optional(),
                FieldSpec::string("image"),
                FieldSpec::date("publishedAt"),
                FieldSpec::string("author"),
                FieldSpec::array("tags", FieldKind::String),
                FieldSpec::string("category").optional(),
                FieldSpec::boolean("draft").with_default(false),
            ],
        ),
        Collection::Services => CollectionSchema::new(
            name,
            SourceType::Page,
            "services/**/*.md",
            vec![
                FieldSpec::string("title"),
                FieldSpec::string("description"),
                FieldSpec::string("slug"),
                FieldSpec::string("intro"),
                FieldSpec::string("image"),
                FieldSpec::array_of("features", &shapes.feature_card).optional(),
                FieldSpec::string("category"),
                FieldSpec::array_of("testimonials", &shapes.testimonial).optional(),
                FieldSpec::object("priceCard", &shapes.price_card).optional(),
                FieldSpec::boolean("featured").with_default(false),
                FieldSpec::boolean("draft").with_default(false),
            ],
        ),
        Collection::Projects => CollectionSchema::new(
            name,
            SourceType::Page,
            "projects/**/*.md",
            vec![
                FieldSpec::string("title"),
                FieldSpec::string("description"),
                FieldSpec::string("slug"),
                FieldSpec::string("intro"),
                FieldSpec::string("image"),
                FieldSpec::array_of("features", &shapes.feature_card).optional(),
                FieldSpec::string("category"),
                FieldSpec::array_of("testimonials", &shapes.testimonial).optional(),
                FieldSpec::boolean("featured").with_default(false),
                FieldSpec::boolean("draft").with_default(false),
            ],
        ),
        Collection::Landing => CollectionSchema::new(
            name,
            SourceType::Page,
            "landing/*.md",
            vec![
                FieldSpec::string("title"),
                FieldSpec::string("description"),
                FieldSpec::string("intro"),
                FieldSpec::string("image"),
                FieldSpec::array_of("features", &shapes.feature_card).optional(),
                FieldSpec::array_of("testimonials", &shapes.testimonial).optional(),
                FieldSpec::date("date"),
            ],
        ),
        Collection::Authors => CollectionSchema::new(
            name,
            SourceType::Data,
            "data/authors.yml",
            shapes.author.fields.clone(),
        ),
        Collection::Categories => CollectionSchema::new(
            name,
            SourceType::Data,
            "data/categories.yml",
            shapes.category.fields.clone(),
        ),
        Collection::Testimonials => CollectionSchema::new(
            name,
            SourceType::Data,
            "data/testimonials.yml",
            shapes.testimonial.fields.clone(),
        ),
        Collection::Contacts => CollectionSchema::new(
            name,
            SourceType::Data,
            "data/contacts.yml",
            vec![
                FieldSpec::string("name"),
                FieldSpec::email("email"),
                FieldSpec::string("message"),
                FieldSpec::string("subject").optional(),
                FieldSpec::date("timestamp"),
            ],
        ),
    }
}

/// All built-in collection schemas sharing one set of shapes.
pub fn schemas() -> Vec<CollectionSchema> {
    let shapes = Shapes::new();
    Collection::ALL
        .into_iter()
        .map(|collection| schema(collection, &shapes))
        .collect()
}

/// Registry holding every built-in collection, default config.
pub fn registry() -> Result<SchemaRegistry> {
    registry_with_config(RegistryConfig::default())
}

/// Registry holding every built-in collection.
pub fn registry_with_config(config: RegistryConfig) -> Result<SchemaRegistry> {
    let mut registry = SchemaRegistry::with_config(config);
    for schema in schemas() {
        registry.register(schema)?;
    }
    Ok(registry)
}
