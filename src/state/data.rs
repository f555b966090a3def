/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the batch dispatcher, the API adapter and the UI layer.

use chrono::{DateTime, Local};
use iced::widget::image::Handle;
use std::path::{Path, PathBuf};

/// Number of fixed character slots
pub const CHARACTER_SLOTS: usize = 4;

/// Maximum number of story prompts per batch
pub const MAX_PROMPTS: usize = 10;

/// A reference image attached to a character slot
///
/// The raw bytes are kept in memory so each generation call can
/// inline them without re-reading the file from disk.
#[derive(Debug, Clone)]
pub struct CharacterReference {
    /// Where the image was loaded from
    pub path: PathBuf,
    /// Filename only, for display under the slot
    pub file_name: String,
    /// MIME type sent to the API (guessed from the extension)
    pub mime_type: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
    /// Decoded preview for the slot thumbnail
    pub preview: Handle,
}

/// A fixed character slot in the control panel
///
/// Slots are created once at startup and never deleted; the user
/// renames them, toggles inclusion, or swaps the attached image.
#[derive(Debug, Clone)]
pub struct Character {
    /// Stable slot index (0-based)
    pub slot: usize,
    /// Display name, referenced in prompts for consistency
    pub name: String,
    /// Attached reference image, if any
    pub reference: Option<CharacterReference>,
    /// Whether this slot is included in the next batch
    pub selected: bool,
}

impl Character {
    /// Create the fixed set of slots. The first slot starts selected.
    pub fn slots() -> Vec<Character> {
        (0..CHARACTER_SLOTS)
            .map(|slot| Character {
                slot,
                name: format!("Character {}", slot + 1),
                reference: None,
                selected: slot == 0,
            })
            .collect()
    }

    /// Attach a new reference image, replacing any previous one.
    /// Attaching also selects the slot.
    pub fn attach(&mut self, reference: CharacterReference) {
        self.reference = Some(reference);
        self.selected = true;
    }

    /// A slot only contributes to a batch when it is both selected
    /// and actually carries an image.
    pub fn is_usable(&self) -> bool {
        self.selected && self.reference.is_some()
    }
}

/// Guess the MIME type for an attached image from its extension
pub fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        // The picker filters to images, so default to PNG
        _ => "image/png",
    }
}

/// Aspect-ratio selection: a preset or a free-text custom value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    Landscape,
    Portrait,
    Square,
    Standard,
    Custom,
}

impl AspectRatio {
    /// All selectable options, in menu order
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Landscape,
        AspectRatio::Portrait,
        AspectRatio::Square,
        AspectRatio::Standard,
        AspectRatio::Custom,
    ];

    /// Ratio strings the API accepts
    pub const SUPPORTED: [&'static str; 5] = ["1:1", "3:4", "4:3", "9:16", "16:9"];

    /// The ratio string a preset maps to (empty for Custom)
    fn preset_value(self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Square => "1:1",
            AspectRatio::Standard => "4:3",
            AspectRatio::Custom => "",
        }
    }

    /// Resolve the ratio string to send to the API.
    ///
    /// The custom text only matters when the preset is Custom, and
    /// anything outside the supported set falls back to "1:1".
    pub fn resolve(self, custom: &str) -> &'static str {
        let requested = match self {
            AspectRatio::Custom => custom.trim(),
            preset => preset.preset_value(),
        };

        Self::SUPPORTED
            .iter()
            .copied()
            .find(|supported| *supported == requested)
            .unwrap_or("1:1")
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AspectRatio::Landscape => "16:9 (Landscape)",
            AspectRatio::Portrait => "9:16 (Portrait)",
            AspectRatio::Square => "1:1 (Square)",
            AspectRatio::Standard => "4:3 (Standard)",
            AspectRatio::Custom => "Custom",
        };
        write!(f, "{}", label)
    }
}

/// A successfully generated image, ready to view and download
#[derive(Debug, Clone)]
pub struct ReadyImage {
    /// Encoded image bytes as returned by the API (typically PNG)
    pub bytes: Vec<u8>,
    /// MIME type reported by the API
    pub mime_type: String,
    /// Pixel dimensions read from the decoded payload
    pub width: u32,
    pub height: u32,
    /// Decoded handle for the gallery card and the viewer
    pub preview: Handle,
}

/// Per-item generation status
#[derive(Debug, Clone)]
pub enum GenerationStatus {
    /// The network call has not resolved yet
    Pending,
    /// The call succeeded with an image
    Ready(ReadyImage),
    /// The call failed; the message is shown inline on the card
    Failed(String),
}

/// One result card in the gallery
///
/// A full batch of these is created (all Pending) when a submission
/// begins; each transitions exactly once as its call resolves. The
/// whole batch is replaced on the next submission.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// Generation-local id, unique across batches
    pub id: u64,
    /// Token of the batch this result belongs to
    pub batch: u64,
    /// The prompt that produced it
    pub prompt: String,
    /// 1-based position within the batch, used for filenames
    pub index: usize,
    /// Current status
    pub status: GenerationStatus,
    /// When the placeholder was created
    pub created_at: DateTime<Local>,
}

impl GeneratedImage {
    pub fn is_pending(&self) -> bool {
        matches!(self.status, GenerationStatus::Pending)
    }

    pub fn ready(&self) -> Option<&ReadyImage> {
        match &self.status {
            GenerationStatus::Ready(image) => Some(image),
            _ => None,
        }
    }
}

/// Append an empty prompt entry, bounded by MAX_PROMPTS.
/// Returns false when the list is already full.
pub fn add_prompt(prompts: &mut Vec<String>) -> bool {
    if prompts.len() >= MAX_PROMPTS {
        return false;
    }
    prompts.push(String::new());
    true
}

/// Remove the prompt at `index`, keeping at least one entry.
/// Returns false when the removal was refused.
pub fn remove_prompt(prompts: &mut Vec<String>, index: usize) -> bool {
    if prompts.len() <= 1 || index >= prompts.len() {
        return false;
    }
    prompts.remove(index);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_start_with_first_selected() {
        let slots = Character::slots();
        assert_eq!(slots.len(), CHARACTER_SLOTS);
        assert!(slots[0].selected);
        assert!(slots[1..].iter().all(|c| !c.selected));
        assert_eq!(slots[1].name, "Character 2");
    }

    #[test]
    fn test_attach_replaces_reference_and_selects_slot() {
        let reference = |name: &str| CharacterReference {
            path: PathBuf::from(name),
            file_name: name.to_string(),
            mime_type: "image/png".to_string(),
            bytes: vec![1],
            preview: Handle::from_bytes(vec![1]),
        };

        let mut slot = Character::slots().remove(1);
        assert!(!slot.selected);
        assert!(!slot.is_usable());

        slot.attach(reference("hero.png"));
        assert!(slot.selected);
        assert!(slot.is_usable());

        slot.attach(reference("hero-v2.png"));
        assert_eq!(slot.reference.as_ref().unwrap().file_name, "hero-v2.png");

        // Deselecting keeps the image but pulls the slot from batches
        slot.selected = false;
        assert!(!slot.is_usable());
    }

    #[test]
    fn test_preset_ratios_resolve_directly() {
        assert_eq!(AspectRatio::Landscape.resolve(""), "16:9");
        assert_eq!(AspectRatio::Portrait.resolve("ignored"), "9:16");
        assert_eq!(AspectRatio::Square.resolve(""), "1:1");
        assert_eq!(AspectRatio::Standard.resolve(""), "4:3");
    }

    #[test]
    fn test_custom_ratio_must_be_supported() {
        assert_eq!(AspectRatio::Custom.resolve("3:4"), "3:4");
        assert_eq!(AspectRatio::Custom.resolve(" 16:9 "), "16:9");
        // Unsupported or malformed values fall back to square
        assert_eq!(AspectRatio::Custom.resolve("21:9"), "1:1");
        assert_eq!(AspectRatio::Custom.resolve("banana"), "1:1");
        assert_eq!(AspectRatio::Custom.resolve(""), "1:1");
    }

    #[test]
    fn test_prompt_list_bounds() {
        let mut prompts = vec![String::new()];

        for _ in 0..MAX_PROMPTS * 2 {
            add_prompt(&mut prompts);
        }
        assert_eq!(prompts.len(), MAX_PROMPTS);
        assert!(!add_prompt(&mut prompts));

        while remove_prompt(&mut prompts, 0) {}
        assert_eq!(prompts.len(), 1);
        assert!(!remove_prompt(&mut prompts, 0));
    }

    #[test]
    fn test_remove_prompt_out_of_range() {
        let mut prompts = vec!["a".to_string(), "b".to_string()];
        assert!(!remove_prompt(&mut prompts, 5));
        assert_eq!(prompts.len(), 2);
    }

    #[test]
    fn test_mime_guessing() {
        assert_eq!(mime_for_path(Path::new("hero.jpg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("hero.JPEG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("hero.webp")), "image/webp");
        assert_eq!(mime_for_path(Path::new("hero.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("hero")), "image/png");
    }
}
