//! File discovery for finding images in directories.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ProcessingConfig;

/// Discovers image files in directories.
pub struct FileDiscovery {
    config: ProcessingConfig,
}

/// Information about a discovered file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl DiscoveredFile {
    /// Base file name, used as the output file name.
    pub fn file_name(&self) -> Option<&std::ffi::OsStr> {
        self.path.file_name()
    }
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    /// Recursively find all supported image files under a directory.
    ///
    /// Anything other than a directory yields no files.
    pub fn discover(&self, path: &Path) -> Vec<DiscoveredFile> {
        if !path.is_dir() {
            return vec![];
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let entry_path = entry.path();
            if entry.file_type().is_file() && self.is_supported(entry_path) {
                if let Ok(meta) = entry.metadata() {
                    files.push(DiscoveredFile {
                        path: entry_path.to_path_buf(),
                        size: meta.len(),
                    });
                }
            }
        }

        // Sort by path for deterministic ordering
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files
    }

    /// Check if a file has a supported extension.
    pub fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.config
                    .supported_formats
                    .iter()
                    .any(|fmt| fmt.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }

    /// Human-readable allow-list, e.g. `".jpg", ".jpeg", ".png"`.
    pub fn formats_label(&self) -> String {
        self.config
            .supported_formats
            .iter()
            .map(|f| format!("\".{f}\""))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Get total size of all discovered files.
    pub fn total_size(files: &[DiscoveredFile]) -> u64 {
        files.iter().map(|f| f.size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discovery() -> FileDiscovery {
        FileDiscovery::new(ProcessingConfig::default())
    }

    #[test]
    fn test_is_supported() {
        let discovery = discovery();

        assert!(discovery.is_supported(Path::new("test.jpg")));
        assert!(discovery.is_supported(Path::new("test.JPG")));
        assert!(discovery.is_supported(Path::new("test.jpeg")));
        assert!(discovery.is_supported(Path::new("test.JpEg")));
        assert!(discovery.is_supported(Path::new("test.png")));
        assert!(!discovery.is_supported(Path::new("test.webp")));
        assert!(!discovery.is_supported(Path::new("test.bmp")));
        assert!(!discovery.is_supported(Path::new("png")));
    }

    #[test]
    fn test_discover_recursive_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("b").join("deep");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("c.PNG"), b"x").unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"xy").unwrap();
        std::fs::write(nested.join("z.jpeg"), b"xyz").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"skip").unwrap();
        std::fs::write(dir.path().join("old.bmp"), b"skip").unwrap();

        let files = discovery().discover(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.jpg"),
                PathBuf::from("b/deep/z.jpeg"),
                PathBuf::from("c.PNG"),
            ]
        );
        assert_eq!(FileDiscovery::total_size(&files), 6);
    }

    #[test]
    fn test_discover_empty_and_disallowed() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discovery().discover(dir.path()).is_empty());

        std::fs::write(dir.path().join("only.bmp"), b"BM").unwrap();
        std::fs::create_dir(dir.path().join("sub.png")).unwrap();
        assert!(discovery().discover(dir.path()).is_empty());
    }

    #[test]
    fn test_discover_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discovery().discover(&dir.path().join("nope")).is_empty());
    }

    #[test]
    fn test_discover_single_file_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("one.jpg");
        std::fs::write(&file, b"x").unwrap();
        assert!(discovery().discover(&file).is_empty());
    }

    #[test]
    fn test_formats_label() {
        assert_eq!(discovery().formats_label(), "\".jpg\", \".jpeg\", \".png\"");
    }
}
