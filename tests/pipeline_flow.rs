//! End-to-end flow over a scratch repository layout, short of the git and
//! tunnel steps: board list in, pin text in, images in, schedule CSV and
//! gallery HTML out.

use std::fs;
use std::path::PathBuf;

use pin_studio::rows::CSV_HEADER;
use pin_studio::{boards, gallery, images, pins, rows};

struct ScratchRepo {
    root: PathBuf,
}

impl ScratchRepo {
    fn new(tag: &str) -> Self {
        let root = std::env::temp_dir().join(format!("pin-studio-{tag}-{}", std::process::id()));
        fs::create_dir_all(root.join("images")).unwrap();
        Self { root }
    }
}

impl Drop for ScratchRepo {
    fn drop(&mut self) {
        fs::remove_dir_all(&self.root).ok();
    }
}

const BOARD_CSV: &str = "\u{feff}board_id,name\n111,Nature\n222,Travel\n333,\n";

const PIN_TEXT: &str = "Pin 1:\r\n\
Title: Sunrise over the lake\r\n\
Description: A calm morning.\r\n\
Alt Text: Lake at sunrise\r\n\
Website URL: https://example.com/one\r\n\
\r\n\
Pin 2:\r\n\
Title: Old town streets\r\n\
Description: Cobblestones and cafes.\r\n\
Alt Text: Narrow street\r\n\
Website URL: https://example.com/two\r\n\
Board Name: travel\r\n\
\r\n\
Pin 3:\r\n\
Title: Forest path\r\n\
Description: Deep green woods.\r\n\
Alt Text: Trail in a forest\r\n\
Website URL: https://example.com/three\r\n";

#[test]
fn schedule_and_gallery_come_out_of_a_full_repo() {
    let repo = ScratchRepo::new("flow");

    fs::write(repo.root.join("board_list.csv"), BOARD_CSV).unwrap();
    fs::write(repo.root.join("pin_descriptions.txt"), PIN_TEXT).unwrap();
    for name in ["b-second.jpg", "a-first.jpg", "c-third.JPG", "notes.txt"] {
        fs::write(repo.root.join("images").join(name), b"jpegdata").unwrap();
    }

    let boards = boards::load_boards(&repo.root.join("board_list.csv")).unwrap();
    assert_eq!(boards.len(), 3);
    assert_eq!(boards[0].board_id, "111");

    let text = fs::read_to_string(repo.root.join("pin_descriptions.txt")).unwrap();
    let pins = pins::parse_pin_text(&text).unwrap();
    assert_eq!(pins.len(), 3);
    assert_eq!(pins[1].board_name.as_deref(), Some("travel"));

    let found = images::discover_images(&repo.root.join("images")).unwrap();
    let names: Vec<_> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a-first.jpg", "b-second.jpg", "c-third.JPG"]);

    let mut lines = Vec::new();
    let built = rows::build_rows(
        &pins,
        &boards,
        &found,
        "https://owner.github.io/repo/",
        &mut |l| lines.push(l),
    );

    assert_eq!(built.len(), 3);
    // Pin 1 cycles to the first board, pin 2 names Travel explicitly, pin 3
    // cycles to the second board because the explicit hit left the cursor
    // alone.
    assert_eq!(built[0].board_id, "111");
    assert_eq!(built[1].board_id, "222");
    assert_eq!(built[2].board_id, "222");
    assert_eq!(
        built[0].media_url,
        "https://owner.github.io/repo/images/a-first.jpg"
    );
    assert_eq!(built[1].pin_title, "Old town streets");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("'Old town streets' -> board 222"));

    let schedule = repo.root.join("pin_schedule.csv");
    rows::write_rows(&schedule, &built).unwrap();
    let written = fs::read_to_string(&schedule).unwrap();
    let mut csv_lines = written.lines();
    assert_eq!(csv_lines.next().unwrap(), CSV_HEADER.join(","));
    assert_eq!(csv_lines.count(), 3);

    let gallery_path = gallery::create_gallery_html(&repo.root, &found).unwrap();
    let html = fs::read_to_string(&gallery_path).unwrap();
    assert!(html.contains(r#"src="images/a-first.jpg""#));
    assert!(html.contains(r#"alt="a first""#));
    assert!(gallery_path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("index_"));
}

#[test]
fn missing_pieces_fail_loudly() {
    let repo = ScratchRepo::new("missing");

    // Empty images dir.
    let err = images::discover_images(&repo.root.join("images")).unwrap_err();
    assert!(matches!(err, pin_studio::Error::NoImagesFound(_)));

    // Header-only board list.
    fs::write(repo.root.join("board_list.csv"), "board_id,name\n").unwrap();
    let err = boards::load_boards(&repo.root.join("board_list.csv")).unwrap_err();
    assert!(matches!(err, pin_studio::Error::NoBoardsFound(_)));

    // Text without a single pin block.
    let err = pins::parse_pin_text("just some notes").unwrap_err();
    assert!(matches!(err, pin_studio::Error::NoPinsFound));
}
