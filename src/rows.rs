//! Row building
//!
//! The one piece of real logic in the pipeline: pair pins with images one to
//! one, pick a board for each row, and serialize the result into the fixed
//! six-column schedule schema.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::boards::{self, Board};
use crate::error::Result;
use crate::pins::PinRecord;

/// Column order of the schedule CSV. The header is written even when there
/// are no rows.
pub const CSV_HEADER: [&str; 6] = [
    "Pin_title",
    "Pin_description",
    "Website_link",
    "Media_url",
    "Board_id",
    "Alt_text",
];

/// One data row of the schedule CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    #[serde(rename = "Pin_title")]
    pub pin_title: String,
    #[serde(rename = "Pin_description")]
    pub pin_description: String,
    #[serde(rename = "Website_link")]
    pub website_link: String,
    #[serde(rename = "Media_url")]
    pub media_url: String,
    #[serde(rename = "Board_id")]
    pub board_id: String,
    #[serde(rename = "Alt_text")]
    pub alt_text: String,
}

/// Chooses a board for each row.
///
/// Explicit pin assignments are resolved through a normalized name lookup and
/// do NOT advance the round-robin cursor; only rows that fall through to the
/// cycle consume it. Keeping those two paths separate is what balances board
/// load across repeated runs.
pub struct BoardAssigner<'a> {
    boards: &'a [Board],
    by_name: HashMap<String, &'a Board>,
    cursor: usize,
}

impl<'a> BoardAssigner<'a> {
    /// `boards` must be non-empty; the loader guarantees that.
    pub fn new(boards: &'a [Board]) -> Self {
        Self {
            boards,
            by_name: boards::name_lookup(boards),
            cursor: 0,
        }
    }

    /// Resolve `requested` against the name lookup, falling back to the next
    /// board in the cycle. A lookup miss is a warning, not an error.
    pub fn assign(&mut self, requested: Option<&str>) -> &'a Board {
        if let Some(name) = requested {
            if let Some(board) = self.by_name.get(&boards::normalize_board_name(name)) {
                return board;
            }
            tracing::warn!(board = name, "board not found; cycling board ids");
        }
        let board = &self.boards[self.cursor % self.boards.len()];
        self.cursor += 1;
        board
    }
}

/// Join the hosting base URL with the fixed image path convention. Exactly
/// one trailing slash is stripped from the base.
pub fn media_url(base: &str, file_name: &str) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    format!("{base}/images/{file_name}")
}

/// Build one row per image, pairing pin i with image i.
///
/// The caller has already validated and truncated `pins` to the image count.
/// Every assignment is reported through `log` (and tracing) so that cycled
/// fallbacks stay observable.
pub fn build_rows(
    pins: &[PinRecord],
    boards: &[Board],
    images: &[PathBuf],
    media_base: &str,
    log: &mut dyn FnMut(String),
) -> Vec<OutputRow> {
    debug_assert_eq!(pins.len(), images.len());

    let mut assigner = BoardAssigner::new(boards);
    let mut rows = Vec::with_capacity(images.len());

    for (idx, (pin, image)) in pins.iter().zip(images).enumerate() {
        let board = assigner.assign(pin.board_name.as_deref());
        let file_name = image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        rows.push(OutputRow {
            pin_title: pin.title.clone(),
            pin_description: pin.description.clone(),
            website_link: pin.website_url.clone(),
            media_url: media_url(media_base, &file_name),
            board_id: board.board_id.clone(),
            alt_text: pin.alt_text.clone(),
        });

        let board_label = board.name.as_deref().unwrap_or("Unnamed");
        tracing::info!(
            row = idx + 1,
            title = %pin.title,
            board_id = %board.board_id,
            board = board_label,
            "assigned row"
        );
        log(format!(
            "Row {}: '{}' -> board {} ({})",
            idx + 1,
            pin.title,
            board.board_id,
            board_label
        ));
    }

    rows
}

/// Write the schedule CSV, header first, one record per row.
pub fn write_rows(path: &Path, rows: &[OutputRow]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(id: &str, name: Option<&str>) -> Board {
        Board {
            board_id: id.into(),
            name: name.map(str::to_string),
        }
    }

    fn pin(title: &str, board_name: Option<&str>) -> PinRecord {
        PinRecord {
            title: title.into(),
            description: format!("{title} description"),
            alt_text: format!("{title} alt"),
            website_url: "https://example.com/p".into(),
            board_name: board_name.map(str::to_string),
        }
    }

    fn no_log() -> impl FnMut(String) {
        |_| {}
    }

    #[test]
    fn unnamed_pins_cycle_through_boards_in_order() {
        let boards = vec![board("b1", None), board("b2", None), board("b3", None)];
        let mut assigner = BoardAssigner::new(&boards);
        let picked: Vec<_> = (0..7)
            .map(|_| assigner.assign(None).board_id.clone())
            .collect();
        assert_eq!(picked, vec!["b1", "b2", "b3", "b1", "b2", "b3", "b1"]);
    }

    #[test]
    fn explicit_match_does_not_advance_the_cycle() {
        let boards = vec![
            board("b1", Some("Alpha")),
            board("b2", Some("Beta")),
            board("b3", None),
        ];
        let mut assigner = BoardAssigner::new(&boards);
        assert_eq!(assigner.assign(None).board_id, "b1");
        // Two explicit hits in a row leave the cursor where it was.
        assert_eq!(assigner.assign(Some("Beta")).board_id, "b2");
        assert_eq!(assigner.assign(Some("Alpha")).board_id, "b1");
        assert_eq!(assigner.assign(None).board_id, "b2");
    }

    #[test]
    fn lookup_miss_falls_back_to_the_cycle() {
        let boards = vec![board("b1", Some("Alpha")), board("b2", None)];
        let mut assigner = BoardAssigner::new(&boards);
        assert_eq!(assigner.assign(Some("No Such Board")).board_id, "b1");
        assert_eq!(assigner.assign(Some("No Such Board")).board_id, "b2");
    }

    #[test]
    fn name_matching_ignores_case_and_spacing() {
        let boards = vec![board("b1", Some("My  Board")), board("b2", None)];
        let mut assigner = BoardAssigner::new(&boards);
        assert_eq!(assigner.assign(Some("my board")).board_id, "b1");
        assert_eq!(assigner.assign(Some("  MY   BOARD ")).board_id, "b1");
    }

    #[test]
    fn media_url_strips_one_trailing_slash() {
        assert_eq!(
            media_url("https://x.github.io/r/", "a.jpg"),
            "https://x.github.io/r/images/a.jpg"
        );
        assert_eq!(
            media_url("https://x.github.io/r", "a.jpg"),
            "https://x.github.io/r/images/a.jpg"
        );
        // Only a single slash is stripped.
        assert_eq!(
            media_url("https://x.github.io/r//", "a.jpg"),
            "https://x.github.io/r//images/a.jpg"
        );
    }

    #[test]
    fn builds_one_row_per_image_in_index_order() {
        let boards = vec![board("b1", None), board("b2", None)];
        let pins = vec![pin("one", None), pin("two", None), pin("three", None)];
        let images = vec![
            PathBuf::from("images/a.jpg"),
            PathBuf::from("images/b.jpg"),
            PathBuf::from("images/c.jpg"),
        ];

        let mut lines = Vec::new();
        let rows = build_rows(&pins, &boards, &images, "https://o.github.io/repo", &mut |l| {
            lines.push(l)
        });

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].media_url, "https://o.github.io/repo/images/a.jpg");
        assert_eq!(rows[0].board_id, "b1");
        assert_eq!(rows[1].board_id, "b2");
        assert_eq!(rows[2].board_id, "b1");
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("'one' -> board b1"));
    }

    #[test]
    fn mixed_named_and_unnamed_pins_share_one_cursor() {
        let boards = vec![
            board("b1", Some("Alpha")),
            board("b2", Some("Beta")),
            board("b3", Some("Gamma")),
        ];
        let pins = vec![
            pin("p1", None),          // cycle -> b1
            pin("p2", Some("Gamma")), // explicit -> b3, cursor untouched
            pin("p3", None),          // cycle -> b2
            pin("p4", None),          // cycle -> b3
        ];
        let images: Vec<PathBuf> = (0..4).map(|i| PathBuf::from(format!("{i}.jpg"))).collect();

        let rows = build_rows(&pins, &boards, &images, "https://b.example", &mut no_log());
        let ids: Vec<_> = rows.iter().map(|r| r.board_id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b3", "b2", "b3"]);
    }

    #[test]
    fn writes_header_even_with_zero_rows() {
        let dir = std::env::temp_dir().join(format!("pin-studio-rows-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("pin_schedule.csv");

        write_rows(&path, &[]).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.trim_end(), CSV_HEADER.join(","));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn serialized_rows_follow_the_header_order() {
        let dir = std::env::temp_dir().join(format!("pin-studio-rows-full-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("pin_schedule.csv");

        let rows = vec![OutputRow {
            pin_title: "T".into(),
            pin_description: "D".into(),
            website_link: "https://e.com".into(),
            media_url: "https://o.github.io/r/images/a.jpg".into(),
            board_id: "b1".into(),
            alt_text: "A".into(),
        }];
        write_rows(&path, &rows).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(lines.next().unwrap(), CSV_HEADER.join(","));
        assert_eq!(
            lines.next().unwrap(),
            "T,D,https://e.com,https://o.github.io/r/images/a.jpg,b1,A"
        );

        std::fs::remove_dir_all(&dir).ok();
    }
}
