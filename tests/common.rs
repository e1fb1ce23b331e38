/// Shared helpers for batch-copy tests.
use std::fs;
use std::path::{Path, PathBuf};

#[allow(unused)]
/// Write a small text file, creating parent directories as needed.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

#[allow(unused)]
/// Sorted names of a directory's immediate entries.
pub fn entry_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap_or_else(|_| panic!("missing directory: {}", dir.display()))
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[allow(unused)]
/// Create a session directory under `root` with one `.ncs` file per channel
/// name. Each file holds its own error name as content, so tests can check
/// which source ended up behind which corrected name.
pub fn session_with_channels(root: &Path, session: &str, names: &[&str]) -> PathBuf {
    let dir = root.join(session);
    fs::create_dir_all(&dir).unwrap();
    for name in names {
        fs::write(dir.join(format!("{name}.ncs")), name.as_bytes()).unwrap();
    }
    dir
}

#[allow(unused)]
/// Read a file to a string, panicking with the path on failure.
pub fn read_text(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|_| panic!("missing file: {}", path.display()))
}
