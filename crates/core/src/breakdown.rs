//! Story breakdown: split a short story into ordered scene descriptions.
//!
//! Paragraph boundaries (blank lines) win; a single-paragraph story falls
//! back to grouping sentences. The result is deterministic so regenerating
//! scenes from an unchanged story yields the same breakdown.

use crate::error::CoreError;

/// Hard ceiling on scenes produced by one breakdown.
pub const MAX_SCENES_PER_PROJECT: usize = 50;

/// Sentences grouped per scene in the single-paragraph fallback.
const SENTENCES_PER_SCENE: usize = 2;

/// Maximum allowed length for a scene description.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Validate a scene description: non-empty after trimming, within length.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.trim().is_empty() {
        return Err(CoreError::Validation(
            "Scene description must not be empty".to_string(),
        ));
    }
    if description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Scene description must not exceed {MAX_DESCRIPTION_LENGTH} characters, got {}",
            description.len()
        )));
    }
    Ok(())
}

/// Split a story into at most `max_scenes` ordered scene descriptions.
///
/// Splits on blank lines first; if that yields a single block, falls back
/// to grouping sentences ([`SENTENCES_PER_SCENE`] per scene). An empty or
/// whitespace-only story is a validation error.
pub fn split_story(story: &str, max_scenes: usize) -> Result<Vec<String>, CoreError> {
    if story.trim().is_empty() {
        return Err(CoreError::Validation("Story must not be empty".to_string()));
    }
    let cap = max_scenes.clamp(1, MAX_SCENES_PER_PROJECT);

    let paragraphs: Vec<String> = story
        .split("\n\n")
        .map(|p| p.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|p| !p.is_empty())
        .collect();

    let scenes = if paragraphs.len() > 1 {
        paragraphs
    } else {
        group_sentences(&paragraphs[0])
    };

    Ok(scenes.into_iter().take(cap).collect())
}

/// Group the sentences of `text` into chunks of [`SENTENCES_PER_SCENE`].
fn group_sentences(text: &str) -> Vec<String> {
    let mut sentences: Vec<String> = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        }
    }
    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    if sentences.is_empty() {
        return vec![text.to_string()];
    }

    sentences
        .chunks(SENTENCES_PER_SCENE)
        .map(|chunk| chunk.join(" "))
        .collect()
}
