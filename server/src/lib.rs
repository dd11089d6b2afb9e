//! Gallery backend: image store access, the shared gallery query and the
//! JSON API router.

pub mod api;
pub mod gallery;
pub mod store;
