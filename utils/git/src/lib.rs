// Utils - Git
// Git utilities

use std::path::Path;

use anyhow::{Context, Result};
use git2::{DiffFormat, DiffOptions, Repository};
use tracing::debug;

/// Open the repository containing `path`
fn discover(path: &Path) -> Result<Repository> {
    Repository::discover(path)
        .with_context(|| format!("no git repository found at {}", path.display()))
}

/// Get current git branch
///
/// Returns `None` for a detached or unborn HEAD.
pub fn current_branch(path: &Path) -> Result<Option<String>> {
    let repo = discover(path)?;
    let head = match repo.head() {
        Ok(head) => head,
        Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if !head.is_branch() {
        return Ok(None);
    }
    Ok(head.shorthand().map(str::to_string))
}

/// Unified diff of the working tree and index against `HEAD`
///
/// Untracked files are included. An unborn `HEAD` diffs against the empty tree.
pub fn working_tree_diff(path: &Path) -> Result<String> {
    let repo = discover(path)?;
    let head_tree = match repo.head() {
        Ok(head) => Some(head.peel_to_tree()?),
        Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
        Err(e) => return Err(e.into()),
    };

    let mut options = DiffOptions::new();
    options
        .include_untracked(true)
        .recurse_untracked_dirs(true)
        .show_untracked_content(true);
    let diff = repo.diff_tree_to_workdir_with_index(head_tree.as_ref(), Some(&mut options))?;

    let mut patch = Vec::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        if matches!(line.origin(), '+' | '-' | ' ') {
            patch.push(line.origin() as u8);
        }
        patch.extend_from_slice(line.content());
        true
    })?;

    debug!(files = diff.deltas().len(), bytes = patch.len(), "collected working tree diff");
    Ok(String::from_utf8_lossy(&patch).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn commit_all(repo: &Repository, message: &str) {
        let mut index = repo.index().expect("index");
        index
            .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
            .expect("add");
        index.write().expect("write index");
        let tree_id = index.write_tree().expect("tree");
        let tree = repo.find_tree(tree_id).expect("find tree");
        let signature = git2::Signature::now("lazyai", "lazyai@example.com").expect("sig");
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .expect("commit");
    }

    #[test]
    fn diff_shows_modified_and_untracked_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = Repository::init(dir.path()).expect("init");
        fs::write(dir.path().join("a.txt"), "one\n").expect("write");
        commit_all(&repo, "initial");

        fs::write(dir.path().join("a.txt"), "two\n").expect("write");
        fs::write(dir.path().join("b.txt"), "new\n").expect("write");

        let diff = working_tree_diff(dir.path()).expect("diff");
        assert!(diff.contains("-one"));
        assert!(diff.contains("+two"));
        assert!(diff.contains("+new"));
    }

    #[test]
    fn clean_tree_has_empty_diff() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = Repository::init(dir.path()).expect("init");
        fs::write(dir.path().join("a.txt"), "one\n").expect("write");
        commit_all(&repo, "initial");

        assert_eq!(working_tree_diff(dir.path()).expect("diff"), "");
    }

    #[test]
    fn branch_is_reported_after_first_commit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = Repository::init(dir.path()).expect("init");
        assert_eq!(current_branch(dir.path()).expect("unborn"), None);

        fs::write(dir.path().join("a.txt"), "one\n").expect("write");
        commit_all(&repo, "initial");

        let branch = current_branch(dir.path()).expect("branch");
        assert!(branch.is_some());
    }
}
