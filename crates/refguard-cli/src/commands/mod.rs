pub mod govern;
pub mod timeline;
pub mod tuning;
