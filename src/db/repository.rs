//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing different
//! storage backends to be swapped without changing business logic.
//! Every future is `Send` so handlers generic over [`Database`] can be
//! served by axum.

use std::future::Future;

use crate::db::{
    DbResult,
    models::{
        AdminSession, BlogPost, BlogPostQuery, Image, Lead, ListResult, RecordQuery, School,
    },
};

/// Repository for BlogPost operations.
pub trait BlogPostRepository: Send + Sync {
    /// Create a new post. Generates the ID and timestamps.
    fn create(&self, post: &BlogPost) -> impl Future<Output = DbResult<BlogPost>> + Send;

    /// Get a post by ID.
    fn get(&self, id: &str) -> impl Future<Output = DbResult<BlogPost>> + Send;

    /// List posts matching the query.
    fn list(
        &self,
        query: Option<&BlogPostQuery>,
    ) -> impl Future<Output = DbResult<ListResult<BlogPost>>> + Send;

    /// Replace an existing post's editable fields. Refreshes `updated_at`.
    fn update(&self, post: &BlogPost) -> impl Future<Output = DbResult<BlogPost>> + Send;

    /// Delete a post by ID.
    fn delete(&self, id: &str) -> impl Future<Output = DbResult<()>> + Send;
}

/// Repository for Lead operations.
pub trait LeadRepository: Send + Sync {
    fn create(&self, lead: &Lead) -> impl Future<Output = DbResult<Lead>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = DbResult<Lead>> + Send;

    fn list(
        &self,
        query: Option<&RecordQuery>,
    ) -> impl Future<Output = DbResult<ListResult<Lead>>> + Send;

    fn update(&self, lead: &Lead) -> impl Future<Output = DbResult<Lead>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = DbResult<()>> + Send;
}

/// Repository for School operations.
pub trait SchoolRepository: Send + Sync {
    fn create(&self, school: &School) -> impl Future<Output = DbResult<School>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = DbResult<School>> + Send;

    fn list(
        &self,
        query: Option<&RecordQuery>,
    ) -> impl Future<Output = DbResult<ListResult<School>>> + Send;

    fn update(&self, school: &School) -> impl Future<Output = DbResult<School>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = DbResult<()>> + Send;
}

/// Blob store for uploaded images.
pub trait ImageRepository: Send + Sync {
    /// Store an image under its (already generated) file name.
    fn store(&self, image: &Image) -> impl Future<Output = DbResult<()>> + Send;

    /// Fetch an image by file name.
    fn get(&self, file_name: &str) -> impl Future<Output = DbResult<Image>> + Send;
}

/// Store for admin sessions.
pub trait SessionRepository: Send + Sync {
    fn create(&self, session: &AdminSession) -> impl Future<Output = DbResult<()>> + Send;

    /// Find a session by token digest that has not expired at `now`.
    fn find_valid(
        &self,
        token_digest: &str,
        now: &str,
    ) -> impl Future<Output = DbResult<Option<AdminSession>>> + Send;

    /// Revoke a session. Revoking an unknown session is not an error.
    fn delete(&self, token_digest: &str) -> impl Future<Output = DbResult<()>> + Send;

    /// Drop every session that expired before `now`. Returns how many were removed.
    fn purge_expired(&self, now: &str) -> impl Future<Output = DbResult<u64>> + Send;
}

/// Combined database interface.
pub trait Database: Send + Sync + 'static {
    type BlogPosts<'a>: BlogPostRepository
    where
        Self: 'a;
    type Leads<'a>: LeadRepository
    where
        Self: 'a;
    type Schools<'a>: SchoolRepository
    where
        Self: 'a;
    type Images<'a>: ImageRepository
    where
        Self: 'a;
    type Sessions<'a>: SessionRepository
    where
        Self: 'a;

    /// Run pending migrations.
    fn migrate(&self) -> impl Future<Output = DbResult<()>> + Send;

    fn blog_posts(&self) -> Self::BlogPosts<'_>;

    fn leads(&self) -> Self::Leads<'_>;

    fn schools(&self) -> Self::Schools<'_>;

    fn images(&self) -> Self::Images<'_>;

    fn sessions(&self) -> Self::Sessions<'_>;
}
