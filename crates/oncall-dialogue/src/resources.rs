use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use tracing::error;

const FALLBACK_EXCLAMATION: &str = "Wow";
const FALLBACK_JOKE: &str = "Why did the developer go broke? Because he used up all his cache!";

/// Loader for the exclamation and joke text resources.
///
/// Exclamations come one per line from `exclamation.txt`; jokes are whole
/// files matching `joke*.txt`. Any read failure falls back to a literal
/// default so the dialogue never breaks on a missing file. The RNG is
/// injected so tests can seed it and assert on exact output.
pub struct TextResources {
    dir: PathBuf,
    locations_url: String,
    rng: Mutex<StdRng>,
}

impl TextResources {
    pub fn new(dir: impl Into<PathBuf>, locations_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            locations_url: locations_url.into(),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic variant for tests.
    pub fn with_seed(dir: impl Into<PathBuf>, locations_url: impl Into<String>, seed: u64) -> Self {
        Self {
            dir: dir.into(),
            locations_url: locations_url.into(),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Base URL of the customer-locations dashboard.
    pub fn locations_url(&self) -> &str {
        &self.locations_url
    }

    /// One random line from `exclamation.txt`, or `"Wow"` on any failure.
    pub fn random_exclamation(&self) -> String {
        match self.read_exclamations() {
            Ok(lines) if !lines.is_empty() => {
                let mut rng = match self.rng.lock() {
                    Ok(guard) => guard,
                    Err(_) => return FALLBACK_EXCLAMATION.to_string(),
                };
                lines
                    .choose(&mut *rng)
                    .cloned()
                    .unwrap_or_else(|| FALLBACK_EXCLAMATION.to_string())
            }
            Ok(_) => FALLBACK_EXCLAMATION.to_string(),
            Err(e) => {
                error!("Error loading exclamations: {}", e);
                FALLBACK_EXCLAMATION.to_string()
            }
        }
    }

    /// The content of one random `joke*.txt` file, or the literal fallback.
    pub fn random_joke(&self) -> String {
        match self.read_joke_files() {
            Ok(files) if !files.is_empty() => {
                let selected = {
                    let mut rng = match self.rng.lock() {
                        Ok(guard) => guard,
                        Err(_) => return FALLBACK_JOKE.to_string(),
                    };
                    files.choose(&mut *rng).cloned()
                };
                match selected {
                    Some(path) => match std::fs::read_to_string(&path) {
                        Ok(content) => content.trim().to_string(),
                        Err(e) => {
                            error!("Error loading jokes: {}", e);
                            FALLBACK_JOKE.to_string()
                        }
                    },
                    None => FALLBACK_JOKE.to_string(),
                }
            }
            Ok(_) => FALLBACK_JOKE.to_string(),
            Err(e) => {
                error!("Error loading jokes: {}", e);
                FALLBACK_JOKE.to_string()
            }
        }
    }

    fn read_exclamations(&self) -> std::io::Result<Vec<String>> {
        let content = std::fs::read_to_string(self.dir.join("exclamation.txt"))?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    // Sorted so a seeded RNG picks the same file on every platform.
    fn read_joke_files(&self) -> std::io::Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| is_joke_file(path))
            .collect();
        files.sort();
        Ok(files)
    }
}

fn is_joke_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with("joke") && name.ends_with(".txt"))
        .unwrap_or(false)
}

impl std::fmt::Debug for TextResources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextResources")
            .field("dir", &self.dir)
            .field("locations_url", &self.locations_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_resource_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("exclamation.txt"), "Yowza\nZoinks\n\nHoly cow\n")
            .unwrap();
        std::fs::write(dir.path().join("joke1.txt"), "Joke one.\n").unwrap();
        std::fs::write(dir.path().join("joke2.txt"), "  Joke two.  \n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a joke").unwrap();
        dir
    }

    #[test]
    fn test_exclamation_from_file() {
        let dir = make_resource_dir();
        let resources = TextResources::with_seed(dir.path(), "http://example.test", 7);
        let exclamation = resources.random_exclamation();
        assert!(["Yowza", "Zoinks", "Holy cow"].contains(&exclamation.as_str()));
    }

    #[test]
    fn test_exclamation_missing_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let resources = TextResources::with_seed(dir.path(), "http://example.test", 7);
        assert_eq!(resources.random_exclamation(), "Wow");
    }

    #[test]
    fn test_exclamation_empty_file_falls_back() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("exclamation.txt"), "\n\n").unwrap();
        let resources = TextResources::with_seed(dir.path(), "http://example.test", 7);
        assert_eq!(resources.random_exclamation(), "Wow");
    }

    #[test]
    fn test_joke_from_file_is_trimmed() {
        let dir = make_resource_dir();
        let resources = TextResources::with_seed(dir.path(), "http://example.test", 7);
        let joke = resources.random_joke();
        assert!(joke == "Joke one." || joke == "Joke two.");
    }

    #[test]
    fn test_joke_no_files_falls_back() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("other.txt"), "irrelevant").unwrap();
        let resources = TextResources::with_seed(dir.path(), "http://example.test", 7);
        assert_eq!(
            resources.random_joke(),
            "Why did the developer go broke? Because he used up all his cache!"
        );
    }

    #[test]
    fn test_joke_missing_dir_falls_back() {
        let resources =
            TextResources::with_seed("/nonexistent/resource/dir", "http://example.test", 7);
        assert_eq!(
            resources.random_joke(),
            "Why did the developer go broke? Because he used up all his cache!"
        );
        assert_eq!(resources.random_exclamation(), "Wow");
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let dir = make_resource_dir();
        let a = TextResources::with_seed(dir.path(), "http://example.test", 42);
        let b = TextResources::with_seed(dir.path(), "http://example.test", 42);
        assert_eq!(a.random_exclamation(), b.random_exclamation());
        assert_eq!(a.random_joke(), b.random_joke());
    }
}
