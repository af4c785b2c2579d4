//! SQLite implementation of the database traits.
//!
//! This module provides a SQLite-backed implementation of the repository
//! traits defined in the parent module.

mod blog_post;
mod connection;
mod helpers;
mod image;
mod lead;
mod school;
mod session;

#[cfg(test)]
mod blog_post_test;
#[cfg(test)]
mod connection_test;
#[cfg(test)]
mod image_test;
#[cfg(test)]
mod session_test;

pub use blog_post::SqliteBlogPostRepository;
pub use connection::SqliteDatabase;
pub use helpers::RetryPolicy;
pub use image::SqliteImageRepository;
pub use lead::SqliteLeadRepository;
pub use school::SqliteSchoolRepository;
pub use session::SqliteSessionRepository;
