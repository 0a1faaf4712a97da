use iced::widget::{button, column, container, scrollable, text, Column};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use tokio::task;

use pin_studio::pipeline;

/// Result of one background pipeline run, delivered as a single message.
#[derive(Debug, Clone)]
struct RunOutcome {
    log: Vec<String>,
    error: Option<String>,
}

/// Main application state
struct PinStudio {
    /// Repository folder picked by the user
    repo_root: Option<PathBuf>,
    /// Timestamped log lines shown in the window
    log_lines: Vec<String>,
    running: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the "Select Folder" button
    ChooseFolder,
    /// User clicked RUN
    Run,
    /// Background pipeline run completed or failed
    RunFinished(RunOutcome),
}

impl PinStudio {
    fn new() -> (Self, Task<Message>) {
        (
            PinStudio {
                repo_root: None,
                log_lines: Vec::new(),
                running: false,
            },
            Task::none(),
        )
    }

    fn append_log(&mut self, message: &str) {
        let stamp = chrono::Local::now().format("%H:%M:%S");
        self.log_lines.push(format!("[{stamp}] {message}"));
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ChooseFolder => {
                let folder = FileDialog::new()
                    .set_title("Select the repository folder")
                    .pick_folder();

                if let Some(path) = folder {
                    self.append_log(&format!("Selected {}", path.display()));
                    self.repo_root = Some(path);
                }
                Task::none()
            }
            Message::Run => {
                let Some(root) = self.repo_root.clone() else {
                    self.append_log("Please select a repository folder first.");
                    return Task::none();
                };
                self.running = true;
                self.append_log("Started...");
                Task::perform(run_pipeline_async(root), Message::RunFinished)
            }
            Message::RunFinished(outcome) => {
                self.running = false;
                for line in outcome.log {
                    self.append_log(&line);
                }
                match outcome.error {
                    None => self.append_log("Completed successfully."),
                    Some(error) => {
                        // The window stays open and RUN stays usable; the
                        // failure only ends this run.
                        tracing::error!(%error, "pipeline run failed");
                        self.append_log(&format!("ERROR: {error}"));
                    }
                }
                Task::none()
            }
        }
    }

    fn view(&self) -> Element<Message> {
        let folder_label = match &self.repo_root {
            Some(path) => path.display().to_string(),
            None => "No folder selected".to_string(),
        };

        let log_view: Column<Message> = self
            .log_lines
            .iter()
            .fold(Column::new().spacing(2), |col, line| {
                col.push(text(line.clone()).size(14))
            });

        let can_run = self.repo_root.is_some() && !self.running;
        let run_label = if self.running { "Running..." } else { "RUN" };

        let content = column![
            text("Pin Studio").size(32),
            text(folder_label).size(14),
            button("Select Folder")
                .on_press(Message::ChooseFolder)
                .padding(10),
            scrollable(log_view)
                .width(Length::Fill)
                .height(Length::Fill),
            button(run_label)
                .on_press_maybe(can_run.then_some(Message::Run))
                .padding(10),
        ]
        .spacing(12)
        .padding(20)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    pin_studio::init_tracing();

    iced::application("Pin Studio", PinStudio::update, PinStudio::view)
        .theme(PinStudio::theme)
        .centered()
        .run_with(PinStudio::new)
}

/// Run the pipeline on a blocking worker so git and file IO never stall the
/// UI thread. The run is fire-and-forget: no cancellation once started.
async fn run_pipeline_async(repo_root: PathBuf) -> RunOutcome {
    task::spawn_blocking(move || {
        let mut log = Vec::new();
        let result = pipeline::run_pipeline(&repo_root, &mut |line| log.push(line));
        match result {
            Ok(report) => {
                log.push(format!(
                    "Run finished: {} rows in {}",
                    report.rows_written,
                    report.schedule_path.display()
                ));
                RunOutcome { log, error: None }
            }
            Err(e) => RunOutcome {
                log,
                error: Some(e.to_string()),
            },
        }
    })
    .await
    .unwrap_or_else(|e| RunOutcome {
        log: Vec::new(),
        error: Some(format!("background task failed: {e}")),
    })
}
