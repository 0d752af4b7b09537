//! Typed mirrors of validated records.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sitecontent_schema::Record;

use crate::catalog::Collection;
use crate::error::{ContentError, Result};

/// A typed entry bound to one built-in collection.
pub trait ContentEntry: DeserializeOwned {
    const COLLECTION: Collection;
}

/// Decode a validated record into its typed entry.
pub fn decode<T: ContentEntry>(record: &Record) -> Result<T> {
    let expected = T::COLLECTION.as_str();
    if record.collection() != expected {
        return Err(ContentError::CollectionMismatch {
            expected,
            found: record.collection().to_string(),
        });
    }
    Ok(serde_json::from_value(record.to_value())?)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub href: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureCard {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub quote: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCard {
    pub title: String,
    pub features: Vec<String>,
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub cta_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub position: String,
    pub avatar: String,
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<Vec<SocialLink>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub title: String,
    pub icon: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub title: String,
    pub description: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    pub image: String,
    pub published_at: DateTime<Utc>,
    /// Name of an [`Author`].
    pub author: String,
    pub tags: Vec<String>,
    /// Slug of a [`Category`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub draft: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub intro: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<FeatureCard>>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testimonials: Option<Vec<Testimonial>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_card: Option<PriceCard>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub draft: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub intro: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<FeatureCard>>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testimonials: Option<Vec<Testimonial>>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub draft: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Landing {
    pub title: String,
    pub description: String,
    pub intro: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<FeatureCard>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testimonials: Option<Vec<Testimonial>>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ContentEntry for BlogPost {
    const COLLECTION: Collection = Collection::Blog;
}

impl ContentEntry for Service {
    const COLLECTION: Collection = Collection::Services;
}

impl ContentEntry for Project {
    const COLLECTION: Collection = Collection::Projects;
}

impl ContentEntry for Landing {
    const COLLECTION: Collection = Collection::Landing;
}

impl ContentEntry for Author {
    const COLLECTION: Collection = Collection::Authors;
}

impl ContentEntry for Category {
    const COLLECTION: Collection = Collection::Categories;
}

impl ContentEntry for Testimonial {
    const COLLECTION: Collection = Collection::Testimonials;
}

impl ContentEntry for ContactSubmission {
    const COLLECTION: Collection = Collection::Contacts;
}
