//! Local copies of generated posts.
//!
//! Each post is written twice under `{output_dir}/posts/`: the full content
//! record as `{slug}.json` and the HTML body alone as `{slug}.html` for
//! previewing in a browser.

use crate::models::Post;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Write `post` as JSON and HTML. Returns the JSON path.
#[instrument(level = "info", skip_all, fields(%output_dir, slug = %post.slug))]
pub async fn write_post(output_dir: &str, post: &Post) -> Result<PathBuf, Box<dyn Error>> {
    let dir = Path::new(output_dir).join("posts");
    fs::create_dir_all(&dir).await?;

    let json_path = dir.join(format!("{}.json", post.slug));
    fs::write(&json_path, serde_json::to_string_pretty(post)?).await?;

    let html_path = dir.join(format!("{}.html", post.slug));
    fs::write(&html_path, &post.content).await?;

    info!(json = %json_path.display(), html = %html_path.display(), "Wrote post locally");
    Ok(json_path)
}
