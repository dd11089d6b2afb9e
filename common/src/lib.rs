//! Types shared between the gallery server, the JSON API and the hydrated
//! client bundle.

pub mod config;
pub mod model;
pub mod paging;
pub mod viewer;
