use std::path::PathBuf;

/// Options for launching a new Chrome/Chromium instance
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Run without a visible window
    pub headless: bool,

    pub window_width: u32,
    pub window_height: u32,

    /// Custom browser executable
    pub chrome_path: Option<PathBuf>,

    /// Persistent profile directory
    pub user_data_dir: Option<PathBuf>,

    pub sandbox: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1280,
            window_height: 800,
            chrome_path: None,
            user_data_dir: None,
            sandbox: true,
        }
    }
}

impl LaunchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    pub fn chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    pub fn user_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_data_dir = Some(dir.into());
        self
    }

    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }
}

/// Options for attaching to an already running browser
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    /// DevTools WebSocket URL, e.g. `ws://127.0.0.1:9222/devtools/browser/<id>`
    pub ws_url: String,

    /// Connection timeout in milliseconds
    pub timeout: u64,
}

impl ConnectionOptions {
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            timeout: 30_000,
        }
    }

    pub fn timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = timeout_ms;
        self
    }
}

/// Default folder for the per-cycle JSON artifacts
pub const DEFAULT_LOG_DIR: &str = "log_files";

/// Knobs for one accessibility-tree extraction cycle
#[derive(Debug, Clone)]
pub struct ExtractionOptions {
    /// Keep only input-like nodes (inputs, buttons, textareas) under the root
    pub only_input_fields: bool,

    /// Where `json_accessibility_dom*.json` are written; `None` skips them
    pub log_dir: Option<PathBuf>,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            only_input_fields: false,
            log_dir: Some(PathBuf::from(DEFAULT_LOG_DIR)),
        }
    }
}

impl ExtractionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn only_input_fields(mut self, only_input_fields: bool) -> Self {
        self.only_input_fields = only_input_fields;
        self
    }

    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Don't write any artifacts
    pub fn without_artifacts(mut self) -> Self {
        self.log_dir = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_defaults() {
        let opts = ExtractionOptions::default();
        assert!(!opts.only_input_fields);
        assert_eq!(opts.log_dir, Some(PathBuf::from("log_files")));
    }

    #[test]
    fn test_extraction_builder() {
        let opts = ExtractionOptions::new().only_input_fields(true).without_artifacts();
        assert!(opts.only_input_fields);
        assert!(opts.log_dir.is_none());

        let opts = ExtractionOptions::new().log_dir("/tmp/a11y");
        assert_eq!(opts.log_dir, Some(PathBuf::from("/tmp/a11y")));
    }
}
