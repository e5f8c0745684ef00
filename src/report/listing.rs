//! Listing document
//!
//! One table row per PNG in the output directory, linking to where the
//! image is published. Rows are sorted by file name so the document only
//! changes when the set of images does.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::{Result, ShotError};

const IMAGE_EXTENSION: &str = "png";

/// A written listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub path: PathBuf,
    /// Image file names, one per row, in row order
    pub images: Vec<String>,
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(IMAGE_EXTENSION))
}

/// Sorted file names of the images directly inside `dir`
pub async fn collect_images(dir: &Path) -> Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
        ShotError::with_context(format!("Failed to list {}", dir.display()), e)
    })?;

    let mut images = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file() && is_image(&path) {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                images.push(name.to_string());
            }
        }
    }

    images.sort();
    Ok(images)
}

/// Markdown table for `images`; `{file}` in `link_template` is replaced by
/// each file name
pub fn render_listing(images: &[String], link_template: &str) -> String {
    let mut output = String::from("| Name | Screenshot |\n| --- | --- |\n");

    for file in images {
        let name = Path::new(file)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file);
        let link = link_template.replace("{file}", file);
        output.push_str(&format!("| {} | ![{}]({}) |\n", name, name, link));
    }

    output
}

/// List `dir` and write the listing as `dir/listing_file`
pub async fn write_listing(dir: &Path, listing_file: &str, link_template: &str) -> Result<Listing> {
    let images = collect_images(dir).await?;
    let path = dir.join(listing_file);

    tokio::fs::write(&path, render_listing(&images, link_template))
        .await
        .map_err(|e| ShotError::with_context(format!("Failed to write {}", path.display()), e))?;

    info!("Listed {} screenshots in {}", images.len(), path.display());
    Ok(Listing { path, images })
}
