//! Terminal stand-ins for the browser capabilities the session relies on:
//! opening share links, the clipboard, and device location.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use dialoguer::{Confirm, Input};
use guardian_crime_models::Coordinate;
use guardian_session::ReportDraft;
use guardian_social::geolocation::GeolocationOptions;
use guardian_social::{GeolocationError, LocationProvider, Position, ShareError, ShareSink, SharePlatform};

/// Prints share links instead of opening a browser popup.
pub struct TerminalShareSink;

impl ShareSink for TerminalShareSink {
    fn open_url(&self, platform: SharePlatform, url: &str) -> Result<(), ShareError> {
        println!("Open this link to share on {}:", platform.label());
        println!("  {url}");
        Ok(())
    }

    fn copy_to_clipboard(
        &self,
        platform: SharePlatform,
        text: &str,
        _notice: &str,
    ) -> Result<(), ShareError> {
        // No clipboard access from a plain terminal.
        println!(
            "{} has no share link. Copy this message and paste it in {}:",
            platform.label(),
            platform.label()
        );
        println!("  {text}");
        Ok(())
    }
}

/// Asks the user for permission, then for their coordinates.
///
/// The prompts run on a blocking thread so the check-in deadline still
/// applies. An answer that arrives after it is discarded.
pub struct PromptLocationProvider;

#[async_trait]
impl LocationProvider for PromptLocationProvider {
    async fn locate(&self, _options: &GeolocationOptions) -> Result<Position, GeolocationError> {
        off_the_runtime(prompt_position).await
    }
}

/// Runs `prompt` via `spawn_blocking`. A prompt that panics counts as no
/// location source.
async fn off_the_runtime<F>(prompt: F) -> Result<Position, GeolocationError>
where
    F: FnOnce() -> Result<Position, GeolocationError> + Send + 'static,
{
    tokio::task::spawn_blocking(prompt)
        .await
        .map_err(|e| GeolocationError::Unavailable {
            message: e.to_string(),
        })?
}

fn prompt_position() -> Result<Position, GeolocationError> {
    let unavailable = |e: dialoguer::Error| GeolocationError::Unavailable {
        message: e.to_string(),
    };

    let allowed = Confirm::new()
        .with_prompt("Share your current location?")
        .default(true)
        .interact()
        .map_err(unavailable)?;
    if !allowed {
        return Err(GeolocationError::Denied);
    }

    let latitude: f64 = Input::new()
        .with_prompt("Latitude")
        .validate_with(|v: &f64| in_range(*v, 90.0))
        .interact_text()
        .map_err(unavailable)?;
    let longitude: f64 = Input::new()
        .with_prompt("Longitude")
        .validate_with(|v: &f64| in_range(*v, 180.0))
        .interact_text()
        .map_err(unavailable)?;

    Ok(Position {
        coordinate: Coordinate::new(latitude, longitude),
        accuracy_m: None,
        timestamp: Utc::now(),
    })
}

fn in_range(value: f64, limit: f64) -> Result<(), String> {
    if value.is_finite() && value.abs() <= limit {
        Ok(())
    } else {
        Err(format!("Must be between -{limit} and {limit}"))
    }
}

/// MIME type guessed from a file extension.
#[must_use]
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}

/// Attaches the file at `path` to `draft`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the draft rejects it.
pub fn attach_file(draft: &mut ReportDraft, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let size = std::fs::metadata(path)?.len();
    let file_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let attachment = draft.attach(file_name, content_type_for(path), size)?;
    log::debug!(
        "Attached {} ({} bytes)",
        attachment.file_name,
        attachment.size_bytes
    );
    Ok(())
}
