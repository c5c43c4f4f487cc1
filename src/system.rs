//! Contains all code dealing with system access.
use std::io;
use std::os::unix::fs::PermissionsExt;

use nix::errno::Errno;
use nix::unistd::{access, AccessFlags};

use std::{
    env::{split_paths, var_os},
    fs::{read_dir, DirEntry},
    path::{Path, PathBuf},
};

/// Process-wide state that outlives a single command.
///
/// The working directory lives here instead of in the OS so that every spawn
/// site receives it explicitly. Only `cd` changes it.
#[derive(Clone, Debug)]
pub struct Context {
    cwd: PathBuf,
}

impl Context {
    /// Starts from the directory the shell was launched in.
    pub fn from_process() -> io::Result<Context> {
        Ok(Context {
            cwd: std::env::current_dir()?,
        })
    }

    /// Starts from an explicit directory.
    pub fn with_dir(cwd: impl Into<PathBuf>) -> Context {
        Context { cwd: cwd.into() }
    }

    /// The directory children are started in.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Resolves `path` against the working directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.cwd.join(path)
    }

    /// Changes the current directory.
    pub fn change_directory(&mut self, path: impl AsRef<Path>) -> io::Result<()> {
        let target = self.resolve(path).canonicalize()?;
        if !target.is_dir() {
            return Err(io::Error::from_raw_os_error(nix::libc::ENOTDIR));
        }
        access(&target, AccessFlags::X_OK).map_err(io::Error::from)?;
        tracing::debug!(from = %self.cwd.display(), to = %target.display(), "changed directory");
        self.cwd = target;
        Ok(())
    }
}

/// The system's description of an OS error, without the error number.
pub fn describe(err: &io::Error) -> String {
    match err.raw_os_error() {
        Some(code) => Errno::from_raw(code).desc().to_owned(),
        None => err.to_string(),
    }
}

/// Gets a vector of all paths in the PATH environment variable.
pub fn get_path() -> Vec<PathBuf> {
    match var_os("PATH") {
        Some(path) => split_paths(&path).collect(),
        None => {
            tracing::warn!("no PATH environment variable found");
            Vec::new()
        }
    }
}

/// Collects the names of every executable file in a collection of paths.
pub fn executable_names(paths: &[PathBuf]) -> Vec<String> {
    let mut names = Vec::new();
    for path in paths.iter() {
        let read_dir_iter = match read_dir(path) {
            Ok(read_dir_iter) => read_dir_iter,
            Err(e) => {
                tracing::debug!("error reading dir {}: {}", path.display(), e);
                continue;
            }
        };

        for dir_entry in read_dir_iter.flatten() {
            if is_executable(&dir_entry) {
                if let Some(name) = dir_entry.file_name().to_str() {
                    names.push(name.to_owned());
                }
            }
        }
    }
    names
}

/// Determines if a directory entry is a file anyone may execute.
fn is_executable(dir_entry: &DirEntry) -> bool {
    match dir_entry.metadata() {
        Ok(metadata) => metadata.is_file() && metadata.permissions().mode() & 0o111 != 0,
        Err(e) => {
            tracing::debug!("error getting file type: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn cd_follows_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let root = dir.path().canonicalize().unwrap();

        let mut context = Context::with_dir(&root);
        context.change_directory("sub").unwrap();
        assert_eq!(context.cwd(), root.join("sub"));

        context.change_directory("..").unwrap();
        assert_eq!(context.cwd(), root);
    }

    #[test]
    fn cd_to_missing_directory_keeps_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let mut context = Context::with_dir(dir.path());
        assert!(context.change_directory("missing").is_err());
        assert_eq!(context.cwd(), dir.path());
    }

    #[test]
    fn cd_to_a_file_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("plain"), "").unwrap();
        let mut context = Context::with_dir(dir.path());
        assert!(context.change_directory("plain").is_err());
    }

    #[test]
    fn cd_needs_search_permission() {
        // Permission bits do not stop root.
        if nix::unistd::geteuid().is_root() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o666)).unwrap();

        let mut context = Context::with_dir(dir.path());
        let err = context.change_directory("locked").unwrap_err();
        assert_eq!(err.raw_os_error(), Some(nix::libc::EACCES));
        assert_eq!(context.cwd(), dir.path());

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn describe_omits_the_error_number() {
        let err = io::Error::from_raw_os_error(nix::libc::ENOENT);
        assert_eq!(describe(&err), "No such file or directory");
        let custom = io::Error::new(io::ErrorKind::Other, "custom");
        assert_eq!(describe(&custom), "custom");
    }

    #[test]
    fn finds_only_executables() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("tool");
        fs::write(&tool, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(dir.path().join("notes"), "").unwrap();

        let names = executable_names(&[dir.path().to_path_buf(), dir.path().join("gone")]);
        assert_eq!(names, vec![String::from("tool")]);
    }
}
