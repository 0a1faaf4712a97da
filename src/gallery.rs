//! Gallery page generation
//!
//! Emits a throwaway timestamped HTML page listing every discovered image, so
//! the hosting site always has a browsable index of the current batch.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Local};

use crate::error::Result;

/// Filename-friendly stamp for one batch, e.g. `2026_aug_26_04:15pm`.
pub fn timestamp_slug(now: DateTime<Local>) -> String {
    format!(
        "{}_{}_{}",
        now.year(),
        now.format("%b").to_string().to_lowercase(),
        now.format("%d_%I:%M%P"),
    )
}

/// Write `index_<slug>.html` into `repo_root` and return its path.
pub fn create_gallery_html(repo_root: &Path, images: &[PathBuf]) -> Result<PathBuf> {
    let stamp = timestamp_slug(Local::now());
    let html_path = repo_root.join(format!("index_{stamp}.html"));

    let mut lines = vec![
        "<!DOCTYPE html>".to_string(),
        "<html>".to_string(),
        "<head>".to_string(),
        "  <meta charset=\"utf-8\">".to_string(),
        format!("  <title>Images {stamp}</title>"),
        "</head>".to_string(),
        "<body>".to_string(),
    ];
    for image in images {
        let name = image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let alt = image
            .file_stem()
            .map(|s| s.to_string_lossy().replace('-', " "))
            .unwrap_or_default();
        lines.push(format!("  <img src=\"images/{name}\" alt=\"{alt}\">"));
        lines.push("  <br>".to_string());
    }
    lines.push("</body>".to_string());
    lines.push("</html>".to_string());

    std::fs::write(&html_path, lines.join("\n") + "\n")?;
    Ok(html_path)
}
