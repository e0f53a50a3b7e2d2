use std::fs;
use std::path::Path;
use std::process::Command;

use anthology_publish::{
    GitCli, PublishConfig, PublishEnv, PublishError, PublishOutcome, Publisher,
};
use pretty_assertions::assert_eq;

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn make_source_repo(dir: &Path) {
    git(dir, &["init", "--quiet"]);
    git(dir, &["config", "user.name", "test-user"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    git(dir, &["commit", "--quiet", "--allow-empty", "-m", "initial"]);
}

fn ready_env() -> PublishEnv {
    PublishEnv {
        in_automation: true,
        branch: Some("master".to_string()),
        token: Some("s3cret".to_string()),
        slug: Some("owner/book".to_string()),
    }
}

#[test]
fn publishes_snapshot_to_bare_remote() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("source");
    let remote = temp.path().join("remote.git");
    let out = source.join("_book");

    fs::create_dir_all(&source).unwrap();
    make_source_repo(&source);
    let short = git(&source, &["rev-parse", "--short", "HEAD"]);

    fs::create_dir_all(&remote).unwrap();
    git(&remote, &["init", "--quiet", "--bare"]);

    fs::create_dir_all(out.join("1")).unwrap();
    fs::write(out.join("index.html"), "redirect").unwrap();
    fs::write(out.join("1/index.html"), "first edition").unwrap();

    let config = PublishConfig {
        output_dir: out.clone(),
        source_dir: source.clone(),
        remote_url: remote.to_string_lossy().into_owned(),
        ..Default::default()
    };

    let outcome = Publisher::new(config.clone(), GitCli::new())
        .publish(&ready_env())
        .unwrap();
    assert_eq!(
        outcome,
        PublishOutcome::Published {
            commit_message: format!("Rebuild book from owner/book@{short}"),
            hosting_branch: "gh-pages".to_string(),
        }
    );

    let subject = git(&remote, &["log", "--format=%s", "gh-pages"]);
    assert_eq!(subject, format!("Rebuild book from owner/book@{short}"));

    let files = git(&remote, &["ls-tree", "-r", "--name-only", "gh-pages"]);
    assert_eq!(files, "1/index.html\nindex.html");

    // A second publish replaces the branch instead of extending it.
    fs::write(out.join("1/index.html"), "second edition").unwrap();
    Publisher::new(config, GitCli::new())
        .publish(&ready_env())
        .unwrap();

    assert_eq!(git(&remote, &["rev-list", "--count", "gh-pages"]), "1");
    assert_eq!(
        git(&remote, &["show", "gh-pages:1/index.html"]),
        "second edition"
    );
}

#[test]
fn skipped_publish_leaves_output_untouched() {
    let temp = tempfile::tempdir().unwrap();
    let out = temp.path().join("_book");
    fs::create_dir_all(&out).unwrap();

    let config = PublishConfig {
        output_dir: out.clone(),
        source_dir: temp.path().to_path_buf(),
        ..Default::default()
    };
    let env = PublishEnv {
        branch: Some("feature-x".to_string()),
        ..ready_env()
    };

    let outcome = Publisher::new(config, GitCli::new()).publish(&env).unwrap();

    assert!(matches!(outcome, PublishOutcome::Skipped(_)));
    assert!(!out.join(".git").exists());
}

#[test]
fn source_history_survives_publishing_from_the_checkout() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("source");
    fs::create_dir_all(&source).unwrap();
    make_source_repo(&source);
    let head = git(&source, &["rev-parse", "HEAD"]);

    let config = PublishConfig {
        output_dir: source.clone(),
        source_dir: source.clone(),
        remote_url: temp.path().join("remote.git").to_string_lossy().into_owned(),
        ..Default::default()
    };

    let err = Publisher::new(config, GitCli::new())
        .publish(&ready_env())
        .unwrap_err();

    assert!(matches!(err, PublishError::OutputContainsSource { .. }));
    assert_eq!(git(&source, &["log", "--format=%s"]), "initial");
    assert_eq!(git(&source, &["rev-parse", "HEAD"]), head);
}
