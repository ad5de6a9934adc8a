//! Editorial content: FAQs and blog posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Slug;

/// Single question and answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub id: uuid::Uuid,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub sort_order: i32,
}

/// FAQs sharing a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FaqGroup {
    pub category: String,
    pub entries: Vec<Faq>,
}

/// Group FAQs by category.
///
/// Entries are ordered by `sort_order`; groups appear in the order their
/// category is first met in that sequence.
#[must_use]
pub fn group_faqs(mut faqs: Vec<Faq>) -> Vec<FaqGroup> {
    faqs.sort_by_key(|faq| faq.sort_order);
    let mut groups: Vec<FaqGroup> = Vec::new();
    for faq in faqs {
        match groups.iter_mut().find(|group| group.category == faq.category) {
            Some(group) => group.entries.push(faq),
            None => groups.push(FaqGroup {
                category: faq.category.clone(),
                entries: vec![faq],
            }),
        }
    }
    groups
}

/// Blog listing card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostSummary {
    #[schema(value_type = String)]
    pub slug: Slug,
    pub title: String,
    pub excerpt: String,
    pub cover_image_url: Option<String>,
    pub published_at: DateTime<Utc>,
}

impl BlogPostSummary {
    /// Whether the post is visible at `now`.
    #[must_use]
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.published_at <= now
    }
}

/// Full blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(flatten)]
    pub summary: BlogPostSummary,
    /// Markdown body.
    pub body: String,
    pub author: Option<String>,
}
