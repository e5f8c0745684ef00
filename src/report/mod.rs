//! Report generator
//!
//! Markdown listing of every image in the output directory.

mod listing;

pub use listing::{collect_images, render_listing, write_listing, Listing};
