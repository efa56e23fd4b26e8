use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::dashboard::*;

/// Joins a relative path to the directory of the configuration file.
pub fn resolve_path(root: Option<&Path>, file: &str) -> PathBuf {
    match root {
        Some(r) if Path::new(file).is_relative() => r.join(file),
        _ => PathBuf::from(file),
    }
}

/// Writes to the given path, or to the standard output for `stdout`.
pub fn write_output(out: &str, contents: &str) -> DashResult<()> {
    if out == "stdout" {
        let mut handle = std::io::stdout().lock();
        handle
            .write_all(contents.as_bytes())
            .context(WritingFileSnafu { path: out })?;
        return handle.flush().context(WritingFileSnafu { path: out });
    }
    info!("write_output: writing {} bytes to {:?}", contents.len(), out);
    fs::write(out, contents).context(WritingFileSnafu { path: out })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_follow_root() {
        let root = Path::new("/srv/cena");
        assert_eq!(
            resolve_path(Some(root), "votos.csv"),
            PathBuf::from("/srv/cena/votos.csv")
        );
        assert_eq!(
            resolve_path(Some(root), "/tmp/votos.csv"),
            PathBuf::from("/tmp/votos.csv")
        );
        assert_eq!(resolve_path(None, "votos.csv"), PathBuf::from("votos.csv"));
    }
}
