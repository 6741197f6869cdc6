use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;
use tempfile::NamedTempFile;

use crate::error::CompareError;

/// Write `contents` to `path` via a temporary file in the same directory and
/// a rename, so `path` is either the old file or the complete new one.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), CompareError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| CompareError::Io(e.error))?;
    Ok(())
}

/// Writes named artifacts into one output directory, remembering what it wrote.
#[derive(Debug)]
pub struct ArtifactWriter {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl ArtifactWriter {
    /// Create the output directory if needed.
    pub fn create(dir: &Path) -> Result<Self, CompareError> {
        std::fs::create_dir_all(dir)?;
        Ok(ArtifactWriter {
            dir: dir.to_path_buf(),
            written: Vec::new(),
        })
    }

    pub fn write(&mut self, name: &str, contents: &[u8]) -> Result<PathBuf, CompareError> {
        let path = self.dir.join(name);
        write_atomic(&path, contents)?;
        info!("Saved: {}", path.display());
        self.written.push(path.clone());
        Ok(path)
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn into_written(self) -> Vec<PathBuf> {
        self.written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn replaces_existing_file_whole() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.txt");
        std::fs::write(&path, "old contents that are longer than the new ones").unwrap();
        write_atomic(&path, b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn leaves_no_temporaries_behind() {
        let dir = TempDir::new().unwrap();
        let mut w = ArtifactWriter::create(&dir.path().join("figures")).unwrap();
        w.write("a.txt", b"a").unwrap();
        w.write("b.svg", b"<svg/>").unwrap();
        assert_eq!(w.written().len(), 2);
        let mut names: Vec<String> = std::fs::read_dir(dir.path().join("figures"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.txt", "b.svg"]);
    }

    #[test]
    fn missing_parent_fails_without_writing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent").join("table.txt");
        assert!(matches!(write_atomic(&path, b"x"), Err(CompareError::Io(_))));
        assert!(!path.exists());
    }
}
