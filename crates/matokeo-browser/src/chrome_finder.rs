use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Locates the Chrome or Chromium binary used for scraping
pub struct ChromeFinder {
    custom_path: Option<PathBuf>,
}

impl ChromeFinder {
    pub fn new(custom_path: Option<PathBuf>) -> Self {
        Self { custom_path }
    }

    /// Resolve the binary, preferring an explicit path over platform defaults
    ///
    /// An explicit path that is unusable is an error even when a default
    /// install exists.
    pub fn find(&self) -> Result<PathBuf> {
        if let Some(path) = &self.custom_path {
            return Self::check(path);
        }

        let candidates = Self::candidates();
        candidates
            .iter()
            .find_map(|path| Self::check(path).ok())
            .ok_or_else(|| {
                Error::Browser(format!(
                    "Chrome not found. Checked: {}. Use --chrome-path to specify location.",
                    candidates
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }

    fn candidates() -> Vec<PathBuf> {
        #[cfg(target_os = "macos")]
        return vec![
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
            PathBuf::from("/Applications/Chromium.app/Contents/MacOS/Chromium"),
        ];

        #[cfg(target_os = "linux")]
        return vec![
            PathBuf::from("/usr/bin/google-chrome"),
            PathBuf::from("/usr/bin/google-chrome-stable"),
            PathBuf::from("/usr/bin/chromium"),
            PathBuf::from("/usr/bin/chromium-browser"),
            PathBuf::from("/snap/bin/chromium"),
        ];

        #[cfg(target_os = "windows")]
        return vec![
            PathBuf::from(r"C:\Program Files\Google\Chrome\Application\chrome.exe"),
            PathBuf::from(r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe"),
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        return vec![];
    }

    fn check(path: &Path) -> Result<PathBuf> {
        if !path.is_file() {
            return Err(Error::Browser(format!(
                "Chrome not found at: {}",
                path.display()
            )));
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(path)?.permissions().mode();
            if mode & 0o111 == 0 {
                return Err(Error::Browser(format!(
                    "Chrome binary not executable: {}",
                    path.display()
                )));
            }
        }

        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_path_is_used() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let path = temp.path();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let found = ChromeFinder::new(Some(path.to_path_buf())).find().unwrap();

        assert_eq!(found, path);
    }

    #[test]
    fn test_missing_custom_path_fails() {
        let result = ChromeFinder::new(Some(PathBuf::from("/nonexistent/chrome"))).find();

        assert!(result.unwrap_err().to_string().contains("Chrome not found"));
    }

    #[test]
    fn test_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();

        let result = ChromeFinder::new(Some(dir.path().to_path_buf())).find();

        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_is_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(0o644)).unwrap();

        let result = ChromeFinder::new(Some(temp.path().to_path_buf())).find();

        assert!(result.unwrap_err().to_string().contains("not executable"));
    }
}
