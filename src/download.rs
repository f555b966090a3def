/// File download helpers
///
/// Results are written under deterministic names derived from their
/// batch index and the current date, so a downloaded storyboard sorts
/// in story order: 001_05Jun2024.png, 002_05Jun2024.png, ...

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::data::GeneratedImage;

/// Filename for a result: 3-digit zero-padded index plus DDMonYYYY
pub fn result_filename(index: usize, date: NaiveDate) -> String {
    format!("{:03}_{}.png", index, date.format("%d%b%Y"))
}

/// Where batch downloads land by default
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Write one image to disk
pub fn save_image(path: &Path, bytes: &[u8]) -> Result<(), String> {
    fs::write(path, bytes).map_err(|err| format!("Failed to write {}: {}", path.display(), err))
}

/// Write every ready result of the batch into `dir`.
/// Pending and failed results are skipped. Returns the number written.
pub fn save_batch(
    dir: &Path,
    results: &[GeneratedImage],
    date: NaiveDate,
) -> Result<usize, String> {
    let mut written = 0;

    for result in results {
        if let Some(image) = result.ready() {
            let path = dir.join(result_filename(result.index, date));
            save_image(&path, &image.bytes)?;
            written += 1;
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{GenerationStatus, ReadyImage};
    use chrono::Local;
    use iced::widget::image::Handle;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn result(index: usize, status: GenerationStatus) -> GeneratedImage {
        GeneratedImage {
            id: index as u64,
            batch: 1,
            prompt: format!("scene {}", index),
            index,
            status,
            created_at: Local::now(),
        }
    }

    fn ready(bytes: &[u8]) -> GenerationStatus {
        GenerationStatus::Ready(ReadyImage {
            bytes: bytes.to_vec(),
            mime_type: "image/png".to_string(),
            width: 1,
            height: 1,
            preview: Handle::from_bytes(bytes.to_vec()),
        })
    }

    #[test]
    fn test_filenames_are_deterministic() {
        assert_eq!(result_filename(7, date(2024, 6, 5)), "007_05Jun2024.png");
        assert_eq!(result_filename(1, date(2024, 6, 5)), "001_05Jun2024.png");
        assert_eq!(result_filename(12, date(2025, 1, 31)), "012_31Jan2025.png");
        assert_eq!(result_filename(100, date(2024, 12, 1)), "100_01Dec2024.png");
    }

    #[test]
    fn test_save_batch_skips_unfinished_results() {
        let dir = std::env::temp_dir().join(format!(
            "story-studio-test-{}-{}",
            std::process::id(),
            Local::now().timestamp_nanos_opt().unwrap_or_default(),
        ));
        fs::create_dir_all(&dir).unwrap();

        let results = vec![
            result(1, ready(b"one")),
            result(2, GenerationStatus::Pending),
            result(3, GenerationStatus::Failed("nope".to_string())),
            result(4, ready(b"four")),
        ];

        let day = date(2024, 6, 5);
        let written = save_batch(&dir, &results, day).unwrap();
        assert_eq!(written, 2);

        assert_eq!(fs::read(dir.join("001_05Jun2024.png")).unwrap(), b"one");
        assert_eq!(fs::read(dir.join("004_05Jun2024.png")).unwrap(), b"four");
        assert!(!dir.join("002_05Jun2024.png").exists());
        assert!(!dir.join("003_05Jun2024.png").exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
