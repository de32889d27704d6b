use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const SCRIPT_EXTENSION: &str = "cx";

/// Supplies the source text of scripts pulled in by `use`.
pub trait ImportResolver {
    fn resolve(&self, path: &str) -> io::Result<String>;
}

/// Reads imports from disk, relative to a base directory.
#[derive(Debug, Clone)]
pub struct FsResolver {
    base_dir: PathBuf,
}

impl FsResolver {
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        FsResolver {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl Default for FsResolver {
    fn default() -> Self {
        FsResolver::new(".")
    }
}

impl ImportResolver for FsResolver {
    fn resolve(&self, path: &str) -> io::Result<String> {
        let full_path = self.base_dir.join(path);
        match fs::read_to_string(&full_path) {
            Ok(source) => Ok(source),
            Err(e) if full_path.extension().is_none() => {
                fs::read_to_string(full_path.with_extension(SCRIPT_EXTENSION)).map_err(|_| e)
            }
            Err(e) => Err(e),
        }
    }
}

/// Import sources held in memory, keyed by the exact `use` path.
#[derive(Debug, Default, Clone)]
pub struct MemoryResolver {
    scripts: HashMap<String, String>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_script(mut self, path: &str, source: &str) -> Self {
        self.insert(path, source);
        self
    }

    pub fn insert(&mut self, path: &str, source: &str) {
        self.scripts.insert(path.to_owned(), source.to_owned());
    }
}

impl ImportResolver for MemoryResolver {
    fn resolve(&self, path: &str) -> io::Result<String> {
        self.scripts.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no script at {}", path))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_resolver() {
        let resolver = MemoryResolver::new().with_script("lib.cx", "var a;");
        assert_eq!(resolver.resolve("lib.cx").unwrap(), "var a;");

        let err = resolver.resolve("lib").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_fs_resolver_adds_extension() {
        let dir = std::env::temp_dir().join(format!("crossover-import-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("shapes.cx"), "var sides = 4;").unwrap();

        let resolver = FsResolver::new(dir.clone());
        assert_eq!(resolver.resolve("shapes.cx").unwrap(), "var sides = 4;");
        assert_eq!(resolver.resolve("shapes").unwrap(), "var sides = 4;");
        assert!(resolver.resolve("shapes.txt").is_err());
        assert!(resolver.resolve("circles").is_err());

        fs::remove_dir_all(&dir).unwrap();
    }
}
