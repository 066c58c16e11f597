use std::path::{Path, PathBuf};
use tracing::{debug, error};
use walkdir::WalkDir;

/// Find Git repositories beneath `root`.
///
/// Every directory whose name ends with `.git` is taken to be a repository: either the `.git`
/// directory of a working tree, or a bare repository such as `project.git`. Repository directories
/// are not descended into. Entries that can't be read are logged and skipped.
pub fn find_git_repos<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let mut git_dirs = Vec::new();

    let mut it = WalkDir::new(root.as_ref()).follow_links(false).into_iter();
    loop {
        let entry = match it.next() {
            None => break,
            Some(Err(e)) => {
                error!("Failed to get entry: {}; skipping", e);
                continue;
            }
            Some(Ok(entry)) => entry,
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        let is_git_dir = entry
            .file_name()
            .to_str()
            .map_or(false, |name| name.ends_with(".git"));
        if is_git_dir {
            debug!("Found Git repository at {}", entry.path().display());
            git_dirs.push(entry.into_path());
            it.skip_current_dir();
        }
    }

    git_dirs
}

// -------------------------------------------------------------------------------------------------
// test
// -------------------------------------------------------------------------------------------------
#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn finds_nested_and_bare_repos() {
        let root = tempfile::tempdir().unwrap();
        let p = root.path();
        fs::create_dir_all(p.join("one/.git/objects")).unwrap();
        fs::create_dir_all(p.join("group/two/.git")).unwrap();
        fs::create_dir_all(p.join("mirrors/three.git/refs")).unwrap();
        fs::create_dir_all(p.join("plain/src")).unwrap();
        fs::write(p.join("plain/not-a-repo.git"), "file, not a directory").unwrap();

        let mut found = find_git_repos(p);
        found.sort();
        assert_eq!(
            found,
            vec![
                p.join("group/two/.git"),
                p.join("mirrors/three.git"),
                p.join("one/.git"),
            ]
        );
    }

    #[test]
    fn does_not_descend_into_repos() {
        let root = tempfile::tempdir().unwrap();
        let p = root.path();
        fs::create_dir_all(p.join("outer/.git/modules/inner.git")).unwrap();

        assert_eq!(find_git_repos(p), vec![p.join("outer/.git")]);
    }

    #[test]
    fn missing_root_finds_nothing() {
        let root = tempfile::tempdir().unwrap();
        assert!(find_git_repos(root.path().join("missing")).is_empty());
    }
}
