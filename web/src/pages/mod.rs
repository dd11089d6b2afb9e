pub mod about;
pub mod gallery;
