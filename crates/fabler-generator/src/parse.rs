//! Parsing and validation of raw model output.

use fabler_core::blueprint::StoryBlueprint;
use fabler_core::error::EngineError;

/// Parses the model's response text into a validated blueprint.
///
/// Models frequently wrap JSON in markdown fences despite instructions not
/// to; fences are stripped before parsing.
///
/// # Errors
///
/// `EngineError::Validation` when the text is not parseable JSON, does not
/// match the blueprint schema, or violates the ending/option structure.
pub fn parse_blueprint(text: &str) -> Result<StoryBlueprint, EngineError> {
    let json = strip_fences(text);
    let blueprint: StoryBlueprint = serde_json::from_str(json)
        .map_err(|e| EngineError::Validation(format!("malformed model output: {e}")))?;
    blueprint.validate()?;
    Ok(blueprint)
}

/// Removes a surrounding ```json ... ``` (or bare ```) fence, if present.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}
