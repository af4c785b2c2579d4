//! Backend for the Gyan Rich education site: blog, intake forms, image
//! store, admin sessions and the voice agent.

pub mod api;
pub mod auth;
pub mod cli;
pub mod db;
pub mod paths;
pub mod voice;
