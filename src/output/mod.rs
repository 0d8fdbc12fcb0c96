//! Output file naming and writing

mod files;

pub use files::{sanitize_filename, unique_path, write_page_file};
