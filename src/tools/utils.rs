/// Turn what an agent typed into a URL Chrome will load.
///
/// Complete URLs and relative paths pass through; `localhost` gets `http://`,
/// anything with a dot gets `https://`, and a bare word is taken as a `.com`.
pub fn normalize_url(url: &str) -> String {
    const SCHEMES: &[&str] = &["http://", "https://", "file://", "data:", "about:", "chrome://", "chrome-extension://"];

    let trimmed = url.trim();

    if SCHEMES.iter().any(|scheme| trimmed.starts_with(scheme)) {
        return trimmed.to_string();
    }

    if trimmed.starts_with('/') || trimmed.starts_with("./") || trimmed.starts_with("../") {
        return trimmed.to_string();
    }

    if trimmed.starts_with("localhost") || trimmed.starts_with("127.0.0.1") {
        return format!("http://{}", trimmed);
    }

    if trimmed.contains('.') {
        return format!("https://{}", trimmed);
    }

    format!("https://www.{}.com", trimmed)
}
