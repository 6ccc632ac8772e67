pub mod backend;
pub mod images;
