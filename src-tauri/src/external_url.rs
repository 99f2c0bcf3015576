use studio_shell::window_guards::is_external_scheme;
use url::Url;

pub(crate) fn parse_openable_url(raw_url: &str) -> Result<Url, String> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return Err("Missing external URL.".to_string());
    }

    let parsed = Url::parse(trimmed).map_err(|error| format!("Invalid URL: {error}"))?;
    if is_external_scheme(&parsed) {
        Ok(parsed)
    } else {
        Err(format!(
            "Unsupported URL scheme '{}', only http/https/mailto are allowed.",
            parsed.scheme()
        ))
    }
}

/// Hands the URL to the OS default handler without waiting on it.
pub(crate) fn open_url_with_system_browser(url: &str) -> Result<(), String> {
    open::that_detached(url).map_err(|error| format!("Failed to open '{url}': {error}"))
}
