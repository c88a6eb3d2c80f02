//! Filename Search
//!
//! Recursive search for a filename under a set of root directories, used by
//! the `search-file` intent. Read-only. The name is treated as a glob, so
//! `*.pdf` works the way a shell user expects.

use std::path::PathBuf;

/// Common user directories to search, in order: Desktop, Documents,
/// Downloads, then the home directory itself.
pub fn default_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    for dir in [dirs::desktop_dir(), dirs::document_dir(), dirs::download_dir()]
        .into_iter()
        .flatten()
    {
        roots.push(dir);
    }
    if let Some(home) = dirs::home_dir() {
        roots.push(home);
    }
    roots
}

/// Search `roots` recursively for files matching `name`, returning at most
/// `max` matches. Roots that do not exist or cannot be globbed are skipped.
pub fn search_file(name: &str, roots: &[PathBuf], max: usize) -> Vec<PathBuf> {
    let mut matches = Vec::new();

    for root in roots {
        let pattern = root.join("**").join(name);
        let Some(pattern) = pattern.to_str() else {
            continue;
        };
        let paths = match glob::glob(pattern) {
            Ok(paths) => paths,
            Err(e) => {
                tracing::warn!(pattern, error = %e, "invalid search pattern");
                continue;
            }
        };
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => matches.push(path),
                Ok(_) => {}
                Err(e) => tracing::debug!(error = %e, "unreadable path during search"),
            }
            if matches.len() >= max {
                return matches;
            }
        }
        if matches.len() >= max {
            break;
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_finds_nested_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).expect("mkdir");
        fs::write(nested.join("notes.txt"), "hi").expect("write");
        fs::write(dir.path().join("other.txt"), "hi").expect("write");

        let found = search_file("notes.txt", &[dir.path().to_path_buf()], 10);
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("a/b/notes.txt"));
    }

    #[test]
    fn test_glob_patterns_work() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("one.pdf"), "").expect("write");
        fs::write(dir.path().join("two.pdf"), "").expect("write");
        fs::write(dir.path().join("three.txt"), "").expect("write");

        let found = search_file("*.pdf", &[dir.path().to_path_buf()], 10);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_result_cap() {
        let dir = tempfile::tempdir().expect("tempdir");
        for i in 0..5 {
            fs::write(dir.path().join(format!("f{i}.log")), "").expect("write");
        }

        let found = search_file("*.log", &[dir.path().to_path_buf()], 3);
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_missing_root_is_skipped() {
        let found = search_file("anything", &[PathBuf::from("/no/such/dir")], 10);
        assert!(found.is_empty());
    }
}
