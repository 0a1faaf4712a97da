//! Source control side effects
//!
//! Thin wrapper over the `git` binary: stage/commit/push the generated files
//! and derive the public hosting base URL from the configured remote.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use url::Url;

use crate::error::{Error, Result};

fn run_git(repo_root: &Path, args: &[&str]) -> Result<Output> {
    Command::new("git")
        .current_dir(repo_root)
        .args(args)
        .output()
        .map_err(|e| Error::ExternalTool {
            command: "git".to_string(),
            detail: e.to_string(),
        })
}

fn tool_error(args: &[&str], output: &Output) -> Error {
    Error::ExternalTool {
        command: format!("git {}", args.join(" ")),
        detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

/// Stage `files`, commit with `message`, and push to the configured remote.
///
/// Files outside the repo are skipped with a log line. A commit that reports
/// "nothing to commit" is informational; add or push failures abort the run.
pub fn commit_and_push(
    repo_root: &Path,
    files: &[PathBuf],
    message: &str,
    log: &mut dyn FnMut(String),
) -> Result<()> {
    let root = repo_root.canonicalize()?;

    let mut rel_paths = Vec::new();
    for file in files {
        let resolved = file.canonicalize().unwrap_or_else(|_| file.clone());
        match resolved.strip_prefix(&root) {
            Ok(rel) => rel_paths.push(rel.to_string_lossy().into_owned()),
            Err(_) => log(format!("Skipping {} (outside repo).", file.display())),
        }
    }
    if rel_paths.is_empty() {
        return Err(Error::ExternalTool {
            command: "git add".to_string(),
            detail: "no files to commit inside the repository".to_string(),
        });
    }

    let mut add_args = vec!["add"];
    add_args.extend(rel_paths.iter().map(String::as_str));
    let add = run_git(&root, &add_args)?;
    if !add.status.success() {
        return Err(tool_error(&add_args, &add));
    }

    let commit_args = ["commit", "-m", message];
    let commit = run_git(&root, &commit_args)?;
    if commit.status.success() {
        log(format!("Committed: {message}"));
    } else {
        let combined = format!(
            "{}{}",
            String::from_utf8_lossy(&commit.stdout),
            String::from_utf8_lossy(&commit.stderr)
        )
        .to_lowercase();
        if combined.contains("nothing to commit") {
            log("No changes to commit.".to_string());
        } else {
            return Err(tool_error(&commit_args, &commit));
        }
    }

    let push_args = ["push"];
    let push = run_git(&root, &push_args)?;
    if !push.status.success() {
        return Err(tool_error(&push_args, &push));
    }
    log("Pushed to origin.".to_string());
    Ok(())
}

/// Ask git for the `origin` remote URL.
pub fn remote_url(repo_root: &Path) -> Result<String> {
    let args = ["remote", "get-url", "origin"];
    let output = run_git(repo_root, &args)?;
    if !output.status.success() {
        return Err(tool_error(&args, &output));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Derive the pages hosting base from a remote URL.
///
/// `git@host:owner/repo(.git)` and `http(s)://host/owner/repo(.git)` both map
/// to `https://<owner>.github.io/<repo>`; anything else fails the run.
pub fn pages_base_from_remote(remote: &str) -> Result<String> {
    let slug = if let Some(rest) = remote.strip_prefix("git@") {
        rest.split_once(':')
            .map(|(_, path)| path.to_string())
            .ok_or_else(|| Error::ParseFormat(remote.to_string()))?
    } else if remote.starts_with("http://") || remote.starts_with("https://") {
        let parsed = Url::parse(remote).map_err(|_| Error::ParseFormat(remote.to_string()))?;
        parsed.path().trim_start_matches('/').to_string()
    } else {
        return Err(Error::ParseFormat(remote.to_string()));
    };

    let slug = slug.trim_end_matches('/');
    let slug = slug.strip_suffix(".git").unwrap_or(slug);
    let (owner, repo) = slug
        .split_once('/')
        .ok_or_else(|| Error::ParseFormat(remote.to_string()))?;
    if owner.is_empty() || repo.is_empty() {
        return Err(Error::ParseFormat(remote.to_string()));
    }
    Ok(format!("https://{owner}.github.io/{repo}"))
}
