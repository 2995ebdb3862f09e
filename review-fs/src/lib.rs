//! Capability-based file access for review payloads, built on `cap-std` and
//! `camino`.
#![forbid(unsafe_code)]

use std::io::{self, Read};

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};

/// Open the parent directory of `path` and return it with the file name.
///
/// Paths without a parent resolve against the current directory.
///
/// # Errors
/// Fails when `path` has no file name or the parent cannot be opened.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("path {path} should include a file name")))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Return whether `path` exists and is a regular file.
///
/// # Errors
/// Fails when the parent directory cannot be opened or the file metadata
/// cannot be read for a reason other than absence.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    match dir.metadata(name.as_str()) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Read the whole of `path` as UTF-8 text.
///
/// # Errors
/// Fails when the file cannot be opened or is not valid UTF-8.
pub fn read_utf8_file(path: &Utf8Path) -> io::Result<String> {
    let (dir, name) = open_dir_and_file(path)?;
    let mut file = dir.open(name.as_str())?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::*;

    #[fixture]
    fn workdir() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path");
        (dir, root)
    }

    #[rstest]
    fn reads_existing_file(workdir: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workdir;
        let path = root.join("reviews.json");
        fs::write(&path, "{\"reviews\": []}").expect("write fixture");
        assert_eq!(
            read_utf8_file(&path).expect("read"),
            "{\"reviews\": []}"
        );
        assert!(file_is_file(&path).expect("metadata"));
    }

    #[rstest]
    fn missing_file_is_not_a_file(workdir: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workdir;
        assert!(!file_is_file(&root.join("absent.json")).expect("metadata"));
        assert!(read_utf8_file(&root.join("absent.json")).is_err());
    }

    #[rstest]
    fn directories_are_not_files(workdir: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workdir;
        fs::create_dir(root.join("nested")).expect("create dir");
        assert!(!file_is_file(&root.join("nested")).expect("metadata"));
    }

    #[rstest]
    fn bare_file_name_resolves_against_current_dir() {
        let (_, name) = open_dir_and_file(Utf8Path::new("Cargo.toml")).expect("open cwd");
        assert_eq!(name, "Cargo.toml");
    }
}
