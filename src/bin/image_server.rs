use iced::widget::{button, column, container, row, scrollable, text, Column};
use iced::{Alignment, Element, Length, Task, Theme};
use std::path::Path;

use pin_studio::server::config::{ServerConfig, CONFIG_FILE};
use pin_studio::server::http;
use pin_studio::server::tunnel::NgrokTunnel;

/// One served file and its public URL.
#[derive(Debug, Clone)]
struct UrlEntry {
    file_name: String,
    url: String,
}

impl UrlEntry {
    /// Percent-encode the file name so URLs with spaces or non-ASCII names
    /// stay clickable as shown.
    fn new(public_url: &str, file_name: String) -> Self {
        Self {
            url: format!("{public_url}/{}", urlencoding::encode(&file_name)),
            file_name,
        }
    }
}

/// Main application state
struct ImageServerApp {
    local_url: String,
    public_url: String,
    entries: Vec<UrlEntry>,
    status: String,
}

#[derive(Debug, Clone)]
enum Message {
    /// User clicked Copy next to an entry
    CopyUrl(usize),
    /// User clicked Open next to an entry
    OpenUrl(usize),
}

impl ImageServerApp {
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::CopyUrl(index) => {
                let Some(entry) = self.entries.get(index) else {
                    return Task::none();
                };
                self.status = format!("Copied {}", entry.url);
                iced::clipboard::write(entry.url.clone())
            }
            Message::OpenUrl(index) => {
                let Some(entry) = self.entries.get(index) else {
                    return Task::none();
                };
                match open::that_detached(&entry.url) {
                    Ok(()) => self.status = format!("Opened {}", entry.url),
                    Err(e) => {
                        tracing::warn!(url = %entry.url, error = %e, "failed to open browser");
                        self.status = format!("Could not open browser: {e}");
                    }
                }
                Task::none()
            }
        }
    }

    fn view(&self) -> Element<Message> {
        let list = self
            .entries
            .iter()
            .enumerate()
            .fold(Column::new().spacing(4), |col, (index, entry)| {
                col.push(
                    row![
                        text(format!("{} -> {}", entry.file_name, entry.url)).size(14),
                        button("Copy").on_press(Message::CopyUrl(index)),
                        button("Open").on_press(Message::OpenUrl(index)),
                    ]
                    .spacing(10)
                    .align_y(Alignment::Center),
                )
            });

        let content = column![
            text("Image Server").size(32),
            text(format!("Local server: {}", self.local_url)).size(14),
            text(format!("Public HTTPS URL: {}", self.public_url)).size(14),
            scrollable(list).width(Length::Fill).height(Length::Fill),
            text(&self.status).size(14),
        ]
        .spacing(12)
        .padding(20);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// All regular files in the served directory, sorted by name.
fn list_served_files(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(names)
}

fn main() -> iced::Result {
    pin_studio::init_tracing();

    // Startup is all-or-nothing: without the directory, the listener and the
    // tunnel there is nothing to display.
    let config = ServerConfig::load(Path::new(CONFIG_FILE))
        .expect("Failed to read the image server config.");
    if !config.images_dir.is_dir() {
        panic!("Images directory not found: {}", config.images_dir.display());
    }

    let files =
        list_served_files(&config.images_dir).expect("Failed to list the images directory.");

    let server = http::start_server(config.images_dir.clone(), &config.bind_host, config.port)
        .expect("Failed to bind the local HTTP listener.");
    let server_handle = server.handle();
    std::thread::spawn(move || {
        let _ = actix_web::rt::System::new().block_on(server);
    });

    let mut tunnel = NgrokTunnel::open(config.port).expect("Failed to open the public tunnel.");
    let local_url = config.local_url();
    let public_url = tunnel.public_url.clone();
    tracing::info!(local = %local_url, public = %public_url, "image server ready");

    let entries: Vec<UrlEntry> = files
        .into_iter()
        .map(|file_name| UrlEntry::new(&public_url, file_name))
        .collect();

    let app = ImageServerApp {
        local_url,
        public_url,
        entries,
        status: String::new(),
    };

    let result = iced::application("Image Server", ImageServerApp::update, ImageServerApp::view)
        .theme(ImageServerApp::theme)
        .centered()
        .run_with(move || (app, Task::none()));

    // Window closed: tear the tunnel down and stop the listener so the
    // process can exit.
    tunnel.close();
    actix_web::rt::System::new().block_on(server_handle.stop(true));

    result
}
