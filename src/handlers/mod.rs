//! HTTP handlers for the blogging hypermedia API.

pub mod articles;
pub mod blogs;
pub mod comments;
pub mod document;
pub mod home;
pub mod people;
