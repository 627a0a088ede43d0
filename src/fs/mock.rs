// src/fs/mock.rs

use std::collections::{BTreeSet, HashMap};
use std::io::{self, Cursor, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::FileSystem;
use crate::errors::{GlobtaskError, Result};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { contents: Vec<u8>, modified: SystemTime },
    Dir(BTreeSet<String>), // child names
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    /// Logical clock in seconds; every write advances it by one.
    clock: u64,
}

/// In-memory filesystem with a logical clock for modification times.
///
/// Paths are normalised by dropping `.` components, so `./src/a.txt` and
/// `src/a.txt` refer to the same entry. The root is `.`.
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert(PathBuf::from("."), MockEntry::Dir(BTreeSet::new()));

        Self {
            state: Arc::new(Mutex::new(MockState {
                entries,
                clock: 1_000,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create or overwrite a file, stamping it with the next clock tick.
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let path = normalize(path.as_ref());
        let mut state = self.state();
        state.clock += 1;
        let modified = UNIX_EPOCH + Duration::from_secs(state.clock);
        ensure_parent(&mut state.entries, &path);
        state.entries.insert(
            path,
            MockEntry::File {
                contents: contents.into(),
                modified,
            },
        );
    }

    /// Override the modification time of an existing file.
    pub fn set_modified(&self, path: impl AsRef<Path>, time: SystemTime) {
        let path = normalize(path.as_ref());
        if let Some(MockEntry::File { modified, .. }) = self.state().entries.get_mut(&path) {
            *modified = time;
        }
    }

    /// Contents of a file, if present.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.state().entries.get(&normalize(path.as_ref())) {
            Some(MockEntry::File { contents, .. }) => Some(contents.clone()),
            _ => None,
        }
    }

    /// All file paths currently stored, sorted.
    pub fn files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self
            .state()
            .entries
            .iter()
            .filter(|(_, e)| matches!(e, MockEntry::File { .. }))
            .map(|(p, _)| p.clone())
            .collect();
        files.sort();
        files
    }
}

fn not_found(op: &'static str, path: &Path) -> GlobtaskError {
    GlobtaskError::fs(op, path, io::Error::new(io::ErrorKind::NotFound, "no such entry"))
}

fn normalize(path: &Path) -> PathBuf {
    let normal: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if normal.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normal
    }
}

fn parent_of(path: &Path) -> Option<PathBuf> {
    if path == Path::new(".") {
        return None;
    }
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => Some(p.to_path_buf()),
        _ => Some(PathBuf::from(".")),
    }
}

/// Make sure every ancestor of `path` is a directory that lists its child.
fn ensure_parent(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    let Some(parent) = parent_of(path) else {
        return;
    };
    if !entries.contains_key(&parent) {
        ensure_parent(entries, &parent);
        entries.insert(parent.clone(), MockEntry::Dir(BTreeSet::new()));
    }
    if let (Some(MockEntry::Dir(children)), Some(name)) =
        (entries.get_mut(&parent), path.file_name().and_then(|n| n.to_str()))
    {
        children.insert(name.to_string());
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.state().entries.contains_key(&normalize(path))
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(
            self.state().entries.get(&normalize(path)),
            Some(MockEntry::File { .. })
        )
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(
            self.state().entries.get(&normalize(path)),
            Some(MockEntry::Dir(_))
        )
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        match self.state().entries.get(&normalize(path)) {
            Some(MockEntry::File { modified, .. }) => Ok(*modified),
            Some(MockEntry::Dir(_)) => Ok(UNIX_EPOCH),
            None => Err(not_found("stat", path)),
        }
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        match self.state().entries.get(&normalize(path)) {
            Some(MockEntry::File { contents, .. }) => Ok(Box::new(Cursor::new(contents.clone()))),
            Some(MockEntry::Dir(_)) => Err(GlobtaskError::fs(
                "open",
                path,
                io::Error::new(io::ErrorKind::Other, "is a directory"),
            )),
            None => Err(not_found("open", path)),
        }
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        match self.state().entries.get(&normalize(path)) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            Some(MockEntry::File { .. }) => Err(GlobtaskError::fs(
                "read dir",
                path,
                io::Error::new(io::ErrorKind::Other, "not a directory"),
            )),
            None => Err(not_found("read dir", path)),
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let path = normalize(path);
        let mut state = self.state();
        match state.entries.get(&path) {
            Some(MockEntry::Dir(_)) => Ok(()),
            Some(MockEntry::File { .. }) => Err(GlobtaskError::fs(
                "create dir",
                &path,
                io::Error::new(io::ErrorKind::AlreadyExists, "file exists"),
            )),
            None => {
                ensure_parent(&mut state.entries, &path);
                state.entries.insert(path, MockEntry::Dir(BTreeSet::new()));
                Ok(())
            }
        }
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let normal = normalize(path);
        let mut state = self.state();
        match state.entries.get(&normal) {
            Some(MockEntry::File { .. }) => {
                state.entries.remove(&normal);
                if let (Some(parent), Some(name)) = (parent_of(&normal), normal.file_name()) {
                    if let Some(MockEntry::Dir(children)) = state.entries.get_mut(&parent) {
                        children.remove(&*name.to_string_lossy());
                    }
                }
                Ok(())
            }
            Some(MockEntry::Dir(_)) => Err(GlobtaskError::fs(
                "remove",
                path,
                io::Error::new(io::ErrorKind::Other, "is a directory"),
            )),
            None => Err(not_found("remove", path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.add_file(path, contents);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_prefixed_and_plain_paths_are_the_same_entry() {
        let fs = MockFileSystem::new();
        fs.add_file("./src/a.txt", b"a".to_vec());

        assert!(fs.is_file(Path::new("src/a.txt")));
        assert!(fs.is_dir(Path::new("src")));
        assert_eq!(
            fs.read_dir(Path::new("./src")).unwrap(),
            vec![PathBuf::from("./src/a.txt")]
        );
    }

    #[test]
    fn every_write_advances_the_clock() {
        let fs = MockFileSystem::new();
        fs.add_file("a", b"1".to_vec());
        fs.add_file("b", b"2".to_vec());

        let a = fs.modified(Path::new("a")).unwrap();
        let b = fs.modified(Path::new("b")).unwrap();
        assert!(b > a);
    }

    #[test]
    fn remove_file_unlists_child() {
        let fs = MockFileSystem::new();
        fs.add_file("dist/x.css", b"x".to_vec());
        fs.remove_file(Path::new("dist/x.css")).unwrap();

        assert!(!fs.exists(Path::new("dist/x.css")));
        assert!(fs.read_dir(Path::new("dist")).unwrap().is_empty());
    }
}
