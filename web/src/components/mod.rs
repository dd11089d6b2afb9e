pub mod image_table;
pub mod nav;
pub mod pager;
pub mod viewer;
