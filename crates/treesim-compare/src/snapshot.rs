//! Materialize a git revision as a plain directory tree via git2.
//!
//! Lets two commits or tags be compared with the same directory differ,
//! without touching the repository's working tree.

use std::path::Path;

use git2::{ObjectType, Repository, TreeWalkMode, TreeWalkResult};
use tracing::info;
use treesim_core::TreesimError;

/// Git file mode for symbolic links.
const SYMLINK_MODE: i32 = 0o120000;

/// Write every regular blob of `rev` under `dest`.
///
/// `rev` is any revision git understands (`HEAD~3`, `v1.2.0`, a SHA).
/// Symlinks and submodules are skipped. Returns the number of files written.
///
/// # Errors
///
/// Returns [`TreesimError::Git`] if the repository cannot be opened or the
/// revision does not resolve to a tree, and [`TreesimError::Io`] if writing
/// under `dest` fails.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use treesim_compare::snapshot::export_revision;
///
/// let dest = tempfile::tempdir().unwrap();
/// let count = export_revision(Path::new("."), "HEAD", dest.path()).unwrap();
/// println!("exported {count} files");
/// ```
pub fn export_revision(repo_path: &Path, rev: &str, dest: &Path) -> Result<usize, TreesimError> {
    let repo = Repository::discover(repo_path)
        .map_err(|e| TreesimError::Git(format!("cannot open {}: {e}", repo_path.display())))?;
    let tree = repo
        .revparse_single(rev)
        .and_then(|obj| obj.peel_to_tree())
        .map_err(|e| TreesimError::Git(format!("cannot resolve '{rev}': {e}")))?;

    let mut written = 0usize;
    let mut failure: Option<TreesimError> = None;

    tree.walk(TreeWalkMode::PreOrder, |dir, entry| {
        if entry.kind() != Some(ObjectType::Blob) || entry.filemode() == SYMLINK_MODE {
            return TreeWalkResult::Ok;
        }
        let name = String::from_utf8_lossy(entry.name_bytes()).into_owned();
        let target = dest.join(dir).join(&name);

        let result = entry
            .to_object(&repo)
            .and_then(|obj| obj.peel_to_blob())
            .map_err(|e| TreesimError::Git(format!("cannot read blob {dir}{name}: {e}")))
            .and_then(|blob| {
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&target, blob.content())?;
                Ok(())
            });

        match result {
            Ok(()) => {
                written += 1;
                TreeWalkResult::Ok
            }
            Err(e) => {
                failure = Some(e);
                TreeWalkResult::Abort
            }
        }
    })
    .or_else(|e| {
        // An aborted walk reports a git error; the captured failure is the real cause.
        if failure.is_some() {
            Ok(())
        } else {
            Err(TreesimError::Git(format!("tree walk failed: {e}")))
        }
    })?;

    if let Some(err) = failure {
        return Err(err);
    }

    info!(%rev, files = written, dest = %dest.display(), "exported revision");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;
    use std::fs;

    fn commit_files(repo: &Repository, files: &[(&str, &str)], message: &str) -> git2::Oid {
        let workdir = repo.workdir().unwrap().to_path_buf();
        let mut index = repo.index().unwrap();
        for (rel, content) in files {
            let path = workdir.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, content).unwrap();
            index.add_path(Path::new(rel)).unwrap();
        }
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = Signature::now("treesim", "treesim@example.com").unwrap();
        let parents: Vec<git2::Commit> = repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok())
            .into_iter()
            .collect();
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    #[test]
    fn exports_each_revision_separately() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let first = commit_files(&repo, &[("src/a.py", "x = 1\n")], "first");
        commit_files(&repo, &[("src/a.py", "x = 2\n"), ("b.rs", "fn b() {}\n")], "second");

        let old = tempfile::tempdir().unwrap();
        let count = export_revision(dir.path(), &first.to_string(), old.path()).unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            fs::read_to_string(old.path().join("src/a.py")).unwrap(),
            "x = 1\n"
        );
        assert!(!old.path().join("b.rs").exists());

        let new = tempfile::tempdir().unwrap();
        let count = export_revision(dir.path(), "HEAD", new.path()).unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            fs::read_to_string(new.path().join("src/a.py")).unwrap(),
            "x = 2\n"
        );
    }

    #[test]
    fn unknown_revision_is_git_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit_files(&repo, &[("a.py", "x = 1\n")], "only");

        let dest = tempfile::tempdir().unwrap();
        let err = export_revision(dir.path(), "no-such-branch", dest.path()).unwrap_err();
        assert!(matches!(err, TreesimError::Git(_)));
    }

    #[test]
    fn non_repository_is_git_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let err = export_revision(dir.path(), "HEAD", dest.path()).unwrap_err();
        assert!(matches!(err, TreesimError::Git(_)));
    }
}
