// src/quiz/presenter.rs

use std::path::{Path, PathBuf};

use serde::Serialize;
use url::Url;

use crate::{config::IMAGE_EXTENSIONS, error::AppError, models::submission::PredictionResult};

const LINKEDIN_SHARE_URL: &str = "https://www.linkedin.com/sharing/share-offsite/";

const FALLBACK_DESCRIPTION: &str = "A truly unique magical being!";

const DESCRIPTIONS: [(&str, &str); 5] = [
    (
        "Harry Potter",
        "With unshakable courage and a heart that leaps to protect, Harry faces danger head-on, leading the way into every adventure, always guided by the unwavering light of doing what's right.",
    ),
    (
        "Hermione Granger",
        "With brilliance in her mind and honesty in her heart, Hermione finds answers in books and logic, creating thoughtful plans that transform curiosity into power.",
    ),
    (
        "Ron Weasley",
        "With loyalty as his compass and humor as his shield, Ron may stumble in panic, but he always stands by those he loves, offering the warmth of friendship above all.",
    ),
    (
        "Draco Malfoy",
        "Driven by ambition and influence, Draco plays life like a chessboard, crafting strategies to turn every challenge into an opportunity for power and success.",
    ),
    (
        "Neville Longbottom",
        "Gentle yet steadfast, Neville grows stronger with every struggle, turning kindness and perseverance into quiet acts of bravery that prove doubters wrong.",
    ),
];

/// What the result page shows.
#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub name: String,
    pub character: String,
    pub description: String,
    /// `None` when no image exists; the description is shown on its own.
    pub image_url: Option<String>,
    pub share_url: String,
}

pub fn describe(character: &str) -> &'static str {
    DESCRIPTIONS
        .iter()
        .find(|(name, _)| *name == character)
        .map(|(_, description)| *description)
        .unwrap_or(FALLBACK_DESCRIPTION)
}

/// First existing `{character}.{ext}` in `dir`, trying extensions in priority order.
pub fn find_image(dir: &Path, character: &str) -> Option<PathBuf> {
    let found = IMAGE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", character, ext)))
        .find(|path| path.is_file());

    if found.is_none() {
        tracing::warn!(
            "Image not found for '{}' in '{}'. Tried: {}",
            character,
            dir.display(),
            IMAGE_EXTENSIONS
                .iter()
                .map(|ext| format!("{}.{}", character, ext))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    found
}

/// LinkedIn share link carrying the quiz URL and a summary of the result.
pub fn share_link(app_url: &str, character: &str) -> Result<String, AppError> {
    let summary = format!(
        "I just found out I'm a {} in the Harry Potter universe with this fun quiz! Check it out and see who you are! #HarryPotter #Quiz #CharacterQuiz",
        character
    );

    Url::parse_with_params(LINKEDIN_SHARE_URL, &[("url", app_url), ("summary", summary.as_str())])
        .map(String::from)
        .map_err(|e| AppError::InternalServerError(format!("Invalid share link: {}", e)))
}

/// Public path of an image file served under `/images/`.
fn image_path(file: &Path) -> Option<String> {
    let file_name = file.file_name()?.to_str()?;
    let mut url = Url::parse("http://localhost/images/").ok()?;
    url.path_segments_mut().ok()?.pop_if_empty().push(file_name);
    Some(url.path().to_string())
}

pub fn present(
    result: &PredictionResult,
    image_dir: &Path,
    app_url: &str,
) -> Result<ResultView, AppError> {
    let character = &result.character_label;

    Ok(ResultView {
        name: result.source_name.clone(),
        character: character.clone(),
        description: describe(character).to_string(),
        image_url: find_image(image_dir, character).and_then(|path| image_path(&path)),
        share_url: share_link(app_url, character)?,
    })
}
