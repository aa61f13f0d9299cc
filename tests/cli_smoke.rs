use assert_cmd::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn git(dir: &Path, args: &[&str]) {
    assert!(Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn git_may_fail(dir: &Path, args: &[&str]) {
    let _ = Command::new("git").args(args).current_dir(dir).output().unwrap();
}

fn init_git_repo(dir: &Path) {
    // init and basic identity
    git(dir, &["init"]);
    git(dir, &["config", "core.autocrlf", "false"]);
    git(dir, &["config", "core.safecrlf", "false"]);
    git(dir, &["config", "user.email", "you@example.com"]);
    git(dir, &["config", "user.name", "Your Name"]);
}

fn write_file(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.sync_all().unwrap();
}

fn commit_file(dir: &Path, name: &str, content: &str) {
    write_file(dir, name, content);
    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", &format!("add {name}")]);
}

fn commit_file_as(dir: &Path, author: &str, name: &str, content: &str) {
    write_file(dir, name, content);
    git(dir, &["add", "."]);
    git(
        dir,
        &["commit", "-m", &format!("add {name}"), "--author", &format!("{author} <{author}@example.com>")],
    );
}

fn run_json(dir: &Path, extra: &[&str]) -> serde_json::Value {
    let mut cmd = Command::cargo_bin("gitfame").unwrap();
    cmd.arg("--repository").arg(dir).args(["--format", "json"]).args(extra);
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

#[test]
fn json_report_counts_lines_commits_and_files() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "src/a.rs", "fn a() {}\nfn b() {}\n");
    commit_file(dir.path(), "notes.txt", "hello\n");

    let v = run_json(dir.path(), &[]);
    assert_eq!(
        v,
        serde_json::json!([{"name": "Your Name", "lines": 3, "commits": 2, "files": 2}])
    );
}

#[test]
fn empty_file_counts_commit_without_file() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.txt", "x\ny\n");
    commit_file(dir.path(), "empty.txt", "");

    let v = run_json(dir.path(), &[]);
    assert_eq!(
        v,
        serde_json::json!([{"name": "Your Name", "lines": 2, "commits": 2, "files": 1}])
    );
}

#[test]
fn authors_ranked_and_committer_switch() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file_as(dir.path(), "Bob", "b.rs", "one\n");
    commit_file_as(dir.path(), "Alice", "a.rs", "one\ntwo\nthree\n");

    let mut cmd = Command::cargo_bin("gitfame").unwrap();
    cmd.arg("--repository").arg(dir.path()).args(["--format", "json-lines"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let lines: Vec<serde_json::Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["name"], "Alice");
    assert_eq!(lines[0]["lines"], 3);
    assert_eq!(lines[1]["name"], "Bob");

    let v = run_json(dir.path(), &["--use-committer"]);
    assert_eq!(
        v,
        serde_json::json!([{"name": "Your Name", "lines": 4, "commits": 2, "files": 2}])
    );
}

#[test]
fn filters_limit_processed_files() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "src/lib.rs", "pub fn hi() {}\n");
    commit_file(dir.path(), "docs/guide.md", "# Guide\n\ntext\n");
    commit_file(dir.path(), "vendor/dep.rs", "x\ny\nz\nw\n");

    let v = run_json(dir.path(), &["--extensions", ".rs", "--exclude", "vendor/"]);
    assert_eq!(v[0]["lines"], 1);
    assert_eq!(v[0]["files"], 1);

    let v = run_json(dir.path(), &["--languages", "markdown"]);
    assert_eq!(v[0]["lines"], 3);

    let v = run_json(dir.path(), &["--restrict-to", "vendor/**,docs/**"]);
    assert_eq!(v[0]["lines"], 7);
    assert_eq!(v[0]["files"], 2);
}

#[test]
fn csv_and_tabular_headers() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.txt", "a\n");

    let mut cmd = Command::cargo_bin("gitfame").unwrap();
    cmd.arg("--repository").arg(dir.path()).args(["--format", "csv"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    assert_eq!(String::from_utf8(out).unwrap(), "Name,Lines,Commits,Files\nYour Name,1,1,1\n");

    let mut cmd = Command::cargo_bin("gitfame").unwrap();
    cmd.arg("--repository").arg(dir.path());
    let out = cmd.assert().success().get_output().stdout.clone();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Name      Lines Commits Files\nYour Name 1     1       1\n"
    );
}

#[test]
fn older_revision_is_attributed() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.txt", "a\n");
    commit_file(dir.path(), "a.txt", "a\nb\nc\n");

    let v = run_json(dir.path(), &["--revision", "HEAD~1"]);
    assert_eq!(v[0]["lines"], 1);
    assert_eq!(v[0]["commits"], 1);
}

#[test]
fn rejects_unknown_format_and_bad_revision() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.txt", "a\n");

    let mut cmd = Command::cargo_bin("gitfame").unwrap();
    cmd.arg("--repository").arg(dir.path()).args(["--format", "yaml"]);
    let out = cmd.assert().failure().get_output().stdout.clone();
    assert!(out.is_empty());

    let mut cmd = Command::cargo_bin("gitfame").unwrap();
    cmd.arg("--repository").arg(dir.path()).args(["--revision", "no-such-branch"]);
    let out = cmd.assert().failure().get_output().stdout.clone();
    assert!(out.is_empty());
}

#[test]
fn renamed_file_keeps_its_author() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file_as(dir.path(), "Alice", "old.txt", "x\ny\n");
    git(dir.path(), &["mv", "old.txt", "new.txt"]);
    git(dir.path(), &["commit", "-m", "rename"]);

    let v = run_json(dir.path(), &[]);
    assert_eq!(
        v,
        serde_json::json!([{"name": "Alice", "lines": 2, "commits": 1, "files": 1}])
    );
}

#[test]
fn commit_owning_lines_under_two_paths() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    write_file(dir.path(), "a.txt", "A1\n");
    write_file(dir.path(), "b.txt", "B1\n");
    git(dir.path(), &["add", "."]);
    git(dir.path(), &["commit", "-m", "c0", "--author", "Alice <alice@example.com>"]);
    git(dir.path(), &["branch", "side"]);

    git(dir.path(), &["rm", "-q", "b.txt"]);
    git(dir.path(), &["commit", "-m", "drop b"]);

    git(dir.path(), &["checkout", "-q", "side"]);
    git(dir.path(), &["rm", "-q", "a.txt"]);
    git(dir.path(), &["commit", "-m", "drop a"]);
    git(dir.path(), &["mv", "b.txt", "a.txt"]);
    git(dir.path(), &["commit", "-m", "b becomes a"]);

    git(dir.path(), &["checkout", "-q", "-"]);
    git_may_fail(dir.path(), &["merge", "--no-commit", "--no-ff", "side"]);
    write_file(dir.path(), "a.txt", "A1\nB1\n");
    let _ = fs::remove_file(dir.path().join("b.txt"));
    git(dir.path(), &["add", "-A"]);
    git(dir.path(), &["commit", "-m", "merge side"]);

    let v = run_json(dir.path(), &[]);
    assert_eq!(
        v,
        serde_json::json!([{"name": "Alice", "lines": 2, "commits": 1, "files": 1}])
    );
}

#[cfg(unix)]
#[test]
fn non_utf8_file_name_is_attributed() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    if fs::write(dir.path().join(OsStr::from_bytes(b"caf\xe9.txt")), "a\nb\n").is_err() {
        return;
    }
    write_file(dir.path(), "ok.txt", "c\n");
    git(dir.path(), &["add", "."]);
    git(dir.path(), &["commit", "-m", "add files"]);

    let v = run_json(dir.path(), &[]);
    assert_eq!(
        v,
        serde_json::json!([{"name": "Your Name", "lines": 3, "commits": 1, "files": 2}])
    );
}
