//! Pin description parsing
//!
//! Extracts structured pin records from the semi-free-form description text.
//! A record is one `Pin <n>:` block with labelled Title / Description /
//! Alt Text / Website URL fields and an optional Board name.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

/// One parsed pin block, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinRecord {
    pub title: String,
    pub description: String,
    pub alt_text: String,
    pub website_url: String,
    /// Explicit board assignment; `None` when the label is absent or empty.
    pub board_name: Option<String>,
}

/// Start of a pin block. Blocks run from one label to the next (or the end
/// of the text), which stands in for the lookahead the field pattern would
/// otherwise need.
static PIN_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Pin\s*\d+\s*:").unwrap());

/// Field layout within a single block. The URL token is mandatory; a block
/// without one does not count as a match.
static PIN_FIELDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)^Pin\s*\d+\s*:\s*Title:\s*(?P<title>.*?)\s*Description:\s*(?P<description>.*?)\s*Alt\s*Text:\s*(?P<alt>.*?)\s*Website\s*URL:\s*(?P<url>https?://\S+)(?:\s*Board(?:\s*Name)?\s*:\s*(?P<board>.*?))?\s*$",
    )
    .unwrap()
});

/// Parse every pin block out of `text`, in order of appearance.
///
/// Line endings are normalized before matching, so `\r\n`/`\r` sources parse
/// the same as `\n` ones. Fails with [`Error::NoPinsFound`] when nothing
/// matches.
pub fn parse_pin_text(text: &str) -> Result<Vec<PinRecord>> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let starts: Vec<usize> = PIN_LABEL.find_iter(&text).map(|m| m.start()).collect();

    let mut pins = Vec::new();
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        let block = &text[start..end];

        if let Some(caps) = PIN_FIELDS.captures(block) {
            pins.push(PinRecord {
                title: caps["title"].trim().to_string(),
                description: caps["description"].trim().to_string(),
                alt_text: caps["alt"].trim().to_string(),
                website_url: caps["url"].trim().to_string(),
                board_name: caps
                    .name("board")
                    .map(|m| m.as_str().trim())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            });
        } else {
            tracing::debug!(block_index = i, "skipping pin block without required fields");
        }
    }

    if pins.is_empty() {
        return Err(Error::NoPinsFound);
    }
    Ok(pins)
}
