//! Board directory loading
//!
//! Boards come from a small CSV file exported by hand, so the loader accepts
//! both header spellings for each column and tolerates a UTF byte-order
//! marker at the start of the file.

use std::collections::HashMap;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{Error, Result};

/// A named bucket that pins can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub board_id: String,
    /// Display name; `None` when the column is missing or blank.
    pub name: Option<String>,
}

const ID_HEADERS: [&str; 2] = ["board_id", "BoardId"];
const NAME_HEADERS: [&str; 2] = ["name", "Name"];

/// Produce the lookup key used for case- and spacing-insensitive board name
/// matching: whitespace runs collapsed to a single space, trimmed, lowercased.
pub fn normalize_board_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Load boards from `path`, preserving file order and skipping rows whose id
/// is empty after trimming. Fails with [`Error::NoBoardsFound`] when nothing
/// usable remains.
pub fn load_boards(path: &Path) -> Result<Vec<Board>> {
    let bytes = std::fs::read(path)?;
    // Decoding through encoding_rs strips a leading BOM if one is present.
    let (content, _, _) = encoding_rs::UTF_8.decode(&bytes);
    let boards = parse_boards(&content)?;
    if boards.is_empty() {
        return Err(Error::NoBoardsFound(path.to_path_buf()));
    }
    Ok(boards)
}

fn parse_boards(content: &str) -> Result<Vec<Board>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let id_idx = find_column(&headers, &ID_HEADERS);
    let name_idx = find_column(&headers, &NAME_HEADERS);

    let mut boards = Vec::new();
    for record in reader.records() {
        let record = record?;
        let board_id = field(&record, id_idx);
        if board_id.is_empty() {
            continue;
        }
        let name = field(&record, name_idx);
        boards.push(Board {
            board_id: board_id.to_string(),
            name: (!name.is_empty()).then(|| name.to_string()),
        });
    }
    Ok(boards)
}

fn find_column(headers: &StringRecord, accepted: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| accepted.contains(&h.trim()))
}

fn field<'a>(record: &'a StringRecord, idx: Option<usize>) -> &'a str {
    idx.and_then(|i| record.get(i)).unwrap_or("").trim()
}

/// First-match-wins map from normalized display name to board, for explicit
/// pin assignments.
pub fn name_lookup(boards: &[Board]) -> HashMap<String, &Board> {
    let mut lookup = HashMap::new();
    for board in boards {
        if let Some(name) = board.name.as_deref() {
            lookup.entry(normalize_board_name(name)).or_insert(board);
        }
    }
    lookup
}
