//! Domain models for the site database.
//!
//! These models are storage-agnostic and represent the core entities
//! used throughout the application.

use serde::{Deserialize, Serialize};

// =============================================================================
// Query Types for Pagination and Sorting
// =============================================================================

/// Sort order for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Base pagination and sorting options - composed into entity-specific queries.
#[derive(Debug, Clone, Default)]
pub struct PageSort {
    /// Maximum number of items to return.
    pub limit: Option<usize>,
    /// Number of items to skip.
    pub offset: Option<usize>,
    /// Field to sort by (validated per entity type).
    pub sort_by: Option<String>,
    /// Sort order; newest first when unset.
    pub sort_order: Option<SortOrder>,
}

/// Query for blog posts.
#[derive(Debug, Clone, Default)]
pub struct BlogPostQuery {
    pub page: PageSort,
    /// `Some(true)` restricts to published posts, `Some(false)` to drafts.
    pub published: Option<bool>,
    pub category: Option<BlogCategory>,
}

/// Query for leads and schools - pagination + status filter.
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    pub page: PageSort,
    pub status: Option<String>,
}

/// Result of a paginated list query.
#[derive(Debug, Clone)]
pub struct ListResult<T> {
    /// The items in this page.
    pub items: Vec<T>,
    /// Total count of all matching items (before pagination).
    pub total: usize,
    /// Limit that was applied.
    pub limit: Option<usize>,
    /// Offset that was applied.
    pub offset: usize,
}

/// 8-character hex ID type used for all entities.
pub type Id = String;

// =============================================================================
// Blog
// =============================================================================

/// Fixed set of categories offered by the authoring form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BlogCategory {
    Education,
    Career,
    Technology,
    #[serde(rename = "Study Tips")]
    StudyTips,
    Success,
    Mentorship,
    #[default]
    General,
}

impl BlogCategory {
    pub const ALL: [BlogCategory; 7] = [
        BlogCategory::Education,
        BlogCategory::Career,
        BlogCategory::Technology,
        BlogCategory::StudyTips,
        BlogCategory::Success,
        BlogCategory::Mentorship,
        BlogCategory::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlogCategory::Education => "Education",
            BlogCategory::Career => "Career",
            BlogCategory::Technology => "Technology",
            BlogCategory::StudyTips => "Study Tips",
            BlogCategory::Success => "Success",
            BlogCategory::Mentorship => "Mentorship",
            BlogCategory::General => "General",
        }
    }
}

impl std::fmt::Display for BlogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BlogCategory {
    type Err = String;

    /// Accepts the display form ("Study Tips") as well as slug forms
    /// ("study-tips", "study_tips"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        BlogCategory::ALL
            .into_iter()
            .find(|c| c.as_str().replace(' ', "").to_lowercase() == normalized)
            .ok_or_else(|| format!("Unknown blog category: {}", s))
    }
}

/// An article with publish/draft visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Id,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub category: BlogCategory,
    pub published: bool,
    /// Reference to an uploaded image, e.g. `/api/v1/images/<file>`.
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Author used when a post is created without one.
pub const DEFAULT_AUTHOR: &str = "Gyan Rich";

// =============================================================================
// Intake records
// =============================================================================

/// A contact-form submission from a prospective client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub school_name: String,
    pub message: String,
    pub status: String,
    pub created_at: String,
}

/// Status assigned to every freshly submitted lead.
pub const LEAD_STATUS_NEW: &str = "new";

/// A school registered through the intake form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub website: String,
    pub status: String,
    pub created_at: String,
}

/// Status assigned to every freshly registered school.
pub const SCHOOL_STATUS_ACTIVE: &str = "active";

// =============================================================================
// Images and sessions
// =============================================================================

/// An uploaded image blob, addressed by its generated file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub file_name: String,
    pub mime_type: String,
    pub size: usize,
    pub data: Vec<u8>,
    pub created_at: String,
}

/// A server-side admin session. Only the token digest is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub token_digest: String,
    pub created_at: String,
    pub expires_at: String,
}
