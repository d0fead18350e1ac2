pub mod common;
pub mod download;
pub mod fs;
