//! URL validation and file-name helpers.

use log::warn;

use crate::config::MAX_URL_LENGTH;

/// Validates and normalizes a pointer target URL.
///
/// Trims whitespace, adds an `https://` prefix if the scheme is missing, then
/// checks that the URL parses and uses http/https. Rejects URLs longer than
/// `MAX_URL_LENGTH`. Logs a warning and returns `None` for anything unusable.
///
/// Returns the parser's serialization: embedded tabs and newlines are removed
/// and non-ASCII characters are percent-encoded, so the result is always a
/// valid header value.
pub fn validate_and_normalize_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    let normalized = if !url.starts_with("http://") && !url.starts_with("https://") {
        format!("https://{url}")
    } else {
        url.to_string()
    };

    if normalized.len() > MAX_URL_LENGTH {
        warn!(
            "Rejecting URL exceeding maximum length ({} > {}): {}...",
            normalized.len(),
            MAX_URL_LENGTH,
            normalized.chars().take(50).collect::<String>()
        );
        return None;
    }

    match url::Url::parse(&normalized) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => {
            Some(parsed.into())
        }
        Ok(_) => {
            warn!("Rejecting unsupported URL: {url}");
            None
        }
        Err(e) => {
            warn!("Rejecting invalid URL {url}: {e}");
            None
        }
    }
}

/// Derives a local file name from an image URL.
///
/// Uses the last path segment with query and fragment dropped and any
/// backslashes removed. Returns `None` when there is no usable segment.
pub fn file_name_from_url(image_url: &str) -> Option<String> {
    let unescaped = image_url.replace('\\', "");
    let segment = match url::Url::parse(&unescaped) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_string)?,
        Err(_) => {
            let path = unescaped.split(['?', '#']).next().unwrap_or_default();
            path.rsplit('/').next().unwrap_or_default().to_string()
        }
    };

    let segment = segment.trim();
    if segment.is_empty() || segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}
