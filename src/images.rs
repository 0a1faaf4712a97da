//! Image discovery
//!
//! Lists the jpg files that will become gallery entries and CSV rows. The
//! listing is non-recursive and sorted so that repeated runs see the images
//! in the same order.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Extensions that count as images for row generation.
const IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "jpeg"];

/// Return the sorted regular files in `dir` whose extension is in the
/// allow-list (case-insensitive).
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut images: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_image(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    images.sort();

    if images.is_empty() {
        return Err(Error::NoImagesFound(dir.to_path_buf()));
    }
    Ok(images)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pin-studio-images-{tag}-{}", std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn lists_only_jpgs_sorted_by_name() {
        let dir = fixture_dir("sorted");
        for name in ["b.jpg", "a.JPG", "c.jpeg", "notes.txt", "d.png"] {
            std::fs::write(dir.join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.join("nested")).unwrap();
        std::fs::write(dir.join("nested").join("e.jpg"), b"x").unwrap();

        let images = discover_images(&dir).unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.JPG", "b.jpg", "c.jpeg"]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = std::env::temp_dir().join("pin-studio-images-does-not-exist");
        let err = discover_images(&dir).unwrap_err();
        assert!(matches!(err, Error::DirectoryNotFound(_)));
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = fixture_dir("empty");
        std::fs::write(dir.join("readme.md"), b"no images").unwrap();

        let err = discover_images(&dir).unwrap_err();
        assert!(matches!(err, Error::NoImagesFound(_)));

        std::fs::remove_dir_all(&dir).ok();
    }
}
