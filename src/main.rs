use cgmath::Vector2;
use chrono::Local;
use iced::widget::image::Handle;
use iced::widget::{row, stack};
use iced::{Element, Task, Theme};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::path::PathBuf;

// Declare the application modules
mod download;
mod gemini;
mod state;
mod ui;

use gemini::{AttachedReference, GenerateRequest, GeneratedPayload};
use state::batch;
use state::data::{
    self, AspectRatio, Character, CharacterReference, GeneratedImage, ReadyImage,
};
use ui::viewer::ViewerState;

/// Main application state
struct App {
    /// The fixed character slots
    characters: Vec<Character>,
    /// Selected aspect-ratio preset
    aspect_ratio: AspectRatio,
    /// Free-text ratio, only meaningful when the preset is Custom
    custom_ratio: String,
    /// Story prompts, one entry per scene
    prompts: Vec<String>,
    /// The current batch of results (replaced wholesale per submission)
    results: Vec<GeneratedImage>,
    /// Token of the active batch; completions from older batches are dropped
    batch_token: u64,
    /// Next generation-local result id
    next_result_id: u64,
    /// Whether any call of the active batch is still in flight
    is_generating: bool,
    /// Open lightbox, if any
    viewer: Option<ViewerState>,
    /// Whether the help overlay is shown
    show_help: bool,
    /// API credential, passed through to the adapter unmodified
    api_key: String,
    /// Shared HTTP client for all generation calls
    http: reqwest::Client,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User toggled a slot's inclusion checkbox
    CharacterToggled(usize, bool),
    /// User edited a slot's display name
    CharacterRenamed(usize, String),
    /// User clicked a slot's upload button
    CharacterPickFile(usize),
    /// Background file read finished for a slot
    CharacterLoaded(usize, Result<CharacterReference, String>),
    AspectRatioPicked(AspectRatio),
    CustomRatioChanged(String),
    PromptAdded,
    PromptChanged(usize, String),
    PromptRemoved(usize),
    /// User clicked "Generate All Images"
    GenerateAll,
    /// One generation call resolved
    GenerationFinished {
        batch: u64,
        id: u64,
        outcome: Result<GeneratedPayload, String>,
    },
    ViewerOpened(u64),
    ViewerClosed,
    ViewerZoomed(f32),
    ViewerPanned(Vector2<f32>),
    ViewerReset,
    HelpOpened,
    HelpClosed,
    DownloadOne(u64),
    DownloadAll,
}

impl App {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();

        let status = if api_key.trim().is_empty() {
            "⚠️ GEMINI_API_KEY is not set. Generation will be refused.".to_string()
        } else {
            "Ready. Set up characters and prompts, then hit Generate.".to_string()
        };

        println!(
            "🎬 Story Studio initialized with {} character slots",
            data::CHARACTER_SLOTS
        );

        (
            App {
                characters: Character::slots(),
                aspect_ratio: AspectRatio::Landscape,
                custom_ratio: String::new(),
                prompts: vec![String::new()],
                results: Vec::new(),
                batch_token: 0,
                next_result_id: 1,
                is_generating: false,
                viewer: None,
                show_help: false,
                api_key,
                http: reqwest::Client::new(),
                status,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::CharacterToggled(slot, selected) => {
                if let Some(character) = self.characters.get_mut(slot) {
                    character.selected = selected;
                }
                Task::none()
            }

            Message::CharacterRenamed(slot, name) => {
                if let Some(character) = self.characters.get_mut(slot) {
                    character.name = name;
                }
                Task::none()
            }

            Message::CharacterPickFile(slot) => {
                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title("Select Character Reference Image")
                    .add_filter("Images", &["png", "jpg", "jpeg", "webp", "gif"])
                    .pick_file();

                if let Some(path) = file {
                    return Task::perform(load_reference(path), move |result| {
                        Message::CharacterLoaded(slot, result)
                    });
                }

                Task::none()
            }

            Message::CharacterLoaded(slot, Ok(reference)) => {
                self.status = format!(
                    "📎 Attached {} to Character {}",
                    reference.file_name,
                    slot + 1
                );
                if let Some(character) = self.characters.get_mut(slot) {
                    character.attach(reference);
                }
                Task::none()
            }

            Message::CharacterLoaded(_, Err(error)) => {
                eprintln!("⚠️  {}", error);
                self.status = error;
                Task::none()
            }

            Message::AspectRatioPicked(ratio) => {
                self.aspect_ratio = ratio;
                Task::none()
            }

            Message::CustomRatioChanged(value) => {
                self.custom_ratio = value;
                Task::none()
            }

            Message::PromptAdded => {
                data::add_prompt(&mut self.prompts);
                Task::none()
            }

            Message::PromptChanged(index, value) => {
                if let Some(prompt) = self.prompts.get_mut(index) {
                    *prompt = value;
                }
                Task::none()
            }

            Message::PromptRemoved(index) => {
                data::remove_prompt(&mut self.prompts, index);
                Task::none()
            }

            Message::GenerateAll => self.generate_all(),

            Message::GenerationFinished { batch, id, outcome } => {
                let outcome = outcome.map(|payload| {
                    let preview = Handle::from_bytes(payload.bytes.clone());
                    ReadyImage {
                        bytes: payload.bytes,
                        mime_type: payload.mime_type,
                        width: payload.width,
                        height: payload.height,
                        preview,
                    }
                });

                if batch::apply_outcome(&mut self.results, self.batch_token, batch, id, outcome) {
                    self.report_batch_progress();
                }

                Task::none()
            }

            Message::ViewerOpened(id) => {
                let ready = self
                    .results
                    .iter()
                    .find(|result| result.id == id)
                    .and_then(|result| result.ready())
                    .map(|image| (image.preview.clone(), image.width, image.height));

                if let Some((handle, width, height)) = ready {
                    // Opening always resets zoom and pan
                    self.viewer = Some(ViewerState::open(handle, width, height));
                }
                Task::none()
            }

            Message::ViewerClosed => {
                self.viewer = None;
                Task::none()
            }

            Message::ViewerZoomed(delta) => {
                if let Some(viewer) = &mut self.viewer {
                    viewer.zoom(delta);
                }
                Task::none()
            }

            Message::ViewerPanned(delta) => {
                if let Some(viewer) = &mut self.viewer {
                    viewer.pan(delta);
                }
                Task::none()
            }

            Message::ViewerReset => {
                if let Some(viewer) = &mut self.viewer {
                    viewer.reset();
                }
                Task::none()
            }

            Message::HelpOpened => {
                self.show_help = true;
                Task::none()
            }

            Message::HelpClosed => {
                self.show_help = false;
                Task::none()
            }

            Message::DownloadOne(id) => {
                self.download_one(id);
                Task::none()
            }

            Message::DownloadAll => {
                self.download_all();
                Task::none()
            }
        }
    }

    /// Validate the form and fan out one generation call per prompt
    fn generate_all(&mut self) -> Task<Message> {
        if batch::valid_prompts(&self.prompts).is_empty() {
            self.status = "Please enter at least one prompt.".to_string();
            return Task::none();
        }

        if self.api_key.trim().is_empty() {
            self.status =
                "⚠️ GEMINI_API_KEY is not set. Cannot reach the image API.".to_string();
            return Task::none();
        }

        let references = attached_references(&self.characters);

        let confirmed = !references.is_empty() || {
            let answer = MessageDialog::new()
                .set_level(MessageLevel::Warning)
                .set_title("No Character References")
                .set_description("No character reference images selected. Generate generic images?")
                .set_buttons(MessageButtons::YesNo)
                .show();
            matches!(answer, MessageDialogResult::Yes)
        };

        // The token bump keeps stragglers from the previous submission
        // out of the replacement list; a decline changes nothing
        if !batch::begin(
            confirmed,
            &self.prompts,
            &mut self.batch_token,
            &mut self.next_result_id,
            &mut self.results,
        ) {
            return Task::none();
        }

        let token = self.batch_token;
        self.is_generating = true;
        self.viewer = None;

        let total = self.results.len();
        self.status = format!("🎨 Generating {} images...", total);
        println!("🎨 Batch {}: dispatching {} generation calls", token, total);

        let ratio = self.aspect_ratio.resolve(&self.custom_ratio).to_string();

        let calls: Vec<Task<Message>> = self
            .results
            .iter()
            .map(|placeholder| {
                let request = GenerateRequest {
                    prompt: placeholder.prompt.clone(),
                    characters: references.clone(),
                    aspect_ratio: ratio.clone(),
                    api_key: self.api_key.clone(),
                };
                let client = self.http.clone();
                let id = placeholder.id;

                Task::perform(
                    async move {
                        gemini::generate_image(client, request)
                            .await
                            .map_err(|error| error.to_string())
                    },
                    move |outcome| Message::GenerationFinished {
                        batch: token,
                        id,
                        outcome,
                    },
                )
            })
            .collect();

        Task::batch(calls)
    }

    /// Refresh the status line after a completion lands
    fn report_batch_progress(&mut self) {
        let total = self.results.len();
        let finished = self
            .results
            .iter()
            .filter(|result| !result.is_pending())
            .count();

        if batch::in_flight(&self.results) {
            self.status = format!("⏳ {} of {} scenes finished...", finished, total);
        } else {
            self.is_generating = false;
            let succeeded = self
                .results
                .iter()
                .filter(|result| result.ready().is_some())
                .count();
            self.status = format!(
                "✅ Batch complete: {} of {} images generated.",
                succeeded, total
            );
            println!(
                "📊 Batch {} summary: {} succeeded, {} failed",
                self.batch_token,
                succeeded,
                total - succeeded
            );
        }
    }

    /// Save one ready result through a native save dialog
    fn download_one(&mut self, id: u64) {
        let Some((index, bytes)) = self
            .results
            .iter()
            .find(|result| result.id == id)
            .and_then(|result| result.ready().map(|image| (result.index, image.bytes.clone())))
        else {
            return;
        };

        let filename = download::result_filename(index, Local::now().date_naive());

        let target = FileDialog::new()
            .set_title("Save Image")
            .set_directory(download::default_download_dir())
            .set_file_name(filename.as_str())
            .save_file();

        if let Some(path) = target {
            match download::save_image(&path, &bytes) {
                Ok(()) => {
                    println!("💾 Saved {}", path.display());
                    self.status = format!("💾 Saved {}", path.display());
                }
                Err(error) => {
                    eprintln!("⚠️  {}", error);
                    self.status = error;
                }
            }
        }
    }

    /// Save every ready result of the batch into a picked folder
    fn download_all(&mut self) {
        let folder = FileDialog::new()
            .set_title("Select Download Folder")
            .set_directory(download::default_download_dir())
            .pick_folder();

        let Some(folder) = folder else {
            return;
        };

        match download::save_batch(&folder, &self.results, Local::now().date_naive()) {
            Ok(written) => {
                println!("💾 Saved {} images to {}", written, folder.display());
                self.status = format!("💾 Saved {} images to {}", written, folder.display());
            }
            Err(error) => {
                eprintln!("⚠️  {}", error);
                self.status = error;
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let base = row![ui::panel::view(self), ui::gallery::view(self)];

        let mut layers: Vec<Element<'_, Message>> = vec![base.into()];

        if let Some(viewer) = &self.viewer {
            layers.push(ui::viewer::view(viewer));
        }

        if self.show_help {
            layers.push(ui::help::view());
        }

        stack(layers).into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Selected slots with an attached image, in slot order, shaped for
/// the API adapter
fn attached_references(characters: &[Character]) -> Vec<AttachedReference> {
    characters
        .iter()
        .filter(|character| character.is_usable())
        .filter_map(|character| {
            character.reference.as_ref().map(|reference| AttachedReference {
                name: character.name.clone(),
                mime_type: reference.mime_type.clone(),
                bytes: reference.bytes.clone(),
            })
        })
        .collect()
}

/// Read a picked reference image from disk off the UI thread
async fn load_reference(path: PathBuf) -> Result<CharacterReference, String> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|error| format!("Failed to read {}: {}", path.display(), error))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    let mime_type = data::mime_for_path(&path).to_string();
    let preview = Handle::from_bytes(bytes.clone());

    Ok(CharacterReference {
        path,
        file_name,
        mime_type,
        bytes,
        preview,
    })
}

fn main() -> iced::Result {
    iced::application("Story Studio", App::update, App::view)
        .theme(App::theme)
        .centered()
        .run_with(App::new)
}
