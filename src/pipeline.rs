//! Pipeline orchestration
//!
//! Runs the whole publishing flow for one selected repository: load boards,
//! parse pins, discover images, publish the gallery, rebuild the schedule
//! CSV, and push everything. Any failing step aborts the run; nothing is
//! retried and no partial CSV is written once validation fails.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::{Error, Result};
use crate::pins::PinRecord;
use crate::{boards, gallery, git, images, pins, rows};

/// Board list CSV expected at the repo root.
pub const BOARD_LIST_FILE: &str = "board_list.csv";
/// Pin description text expected at the repo root.
pub const PIN_DESCRIPTIONS_FILE: &str = "pin_descriptions.txt";
/// Image directory expected at the repo root.
pub const IMAGES_DIR: &str = "images";
/// Schedule CSV written at the repo root.
pub const SCHEDULE_FILE: &str = "pin_schedule.csv";

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub rows_written: usize,
    pub gallery_path: PathBuf,
    pub schedule_path: PathBuf,
}

/// Truncate `pins` to the image count, or fail when there are too few.
/// Discarded pins are reported, never dropped silently.
fn align_pins(
    mut pins: Vec<PinRecord>,
    image_count: usize,
    log: &mut dyn FnMut(String),
) -> Result<Vec<PinRecord>> {
    if pins.len() < image_count {
        return Err(Error::CountMismatch {
            needed: image_count,
            found: pins.len(),
        });
    }
    if pins.len() > image_count {
        tracing::warn!(
            pins = pins.len(),
            images = image_count,
            "more pins than images; discarding the excess"
        );
        log(format!(
            "More pins than images; using the first {image_count} pins to match image count."
        ));
        pins.truncate(image_count);
    }
    Ok(pins)
}

/// Run the full publishing pipeline against `repo_root`, reporting progress
/// through `log`.
pub fn run_pipeline(repo_root: &Path, log: &mut dyn FnMut(String)) -> Result<RunReport> {
    let repo_root = repo_root.canonicalize()?;
    log(format!("Using repository at {}", repo_root.display()));

    let board_csv = repo_root.join(BOARD_LIST_FILE);
    if !board_csv.is_file() {
        return Err(Error::FileNotFound(board_csv));
    }
    let boards = boards::load_boards(&board_csv)?;
    log(format!("Loaded {} boards from {BOARD_LIST_FILE}", boards.len()));

    let pin_file = repo_root.join(PIN_DESCRIPTIONS_FILE);
    if !pin_file.is_file() {
        return Err(Error::FileNotFound(pin_file));
    }
    // Tolerate stray bytes in hand-edited text files.
    let text = String::from_utf8_lossy(&std::fs::read(&pin_file)?).into_owned();
    let pins = pins::parse_pin_text(&text)?;
    log(format!("Parsed {} pin descriptions.", pins.len()));

    let images = images::discover_images(&repo_root.join(IMAGES_DIR))?;
    log(format!(
        "Found {} jpg images; CSV will have {} rows.",
        images.len(),
        images.len()
    ));

    let pins = align_pins(pins, images.len(), log)?;

    let gallery_path = gallery::create_gallery_html(&repo_root, &images)?;
    let gallery_name = gallery_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let gallery_stem = gallery_path
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    log(format!("Created gallery {gallery_name}"));
    git::commit_and_push(
        &repo_root,
        &[gallery_path.clone()],
        &format!("Add gallery {gallery_stem}"),
        log,
    )?;

    let remote = git::remote_url(&repo_root)?;
    let media_base = git::pages_base_from_remote(&remote)?;
    log(format!("Pages base resolved to {media_base}"));

    let built = rows::build_rows(&pins, &boards, &images, &media_base, log);

    let schedule_path = repo_root.join(SCHEDULE_FILE);
    rows::write_rows(&schedule_path, &built)?;
    log(format!("Wrote {SCHEDULE_FILE} with {} rows.", built.len()));

    git::commit_and_push(
        &repo_root,
        &[schedule_path.clone(), gallery_path.clone()],
        &format!("Update pin schedule {}", Local::now().format("%Y-%m-%d %H:%M")),
        log,
    )?;
    log("Schedule update complete.".to_string());

    Ok(RunReport {
        rows_written: built.len(),
        gallery_path,
        schedule_path,
    })
}
