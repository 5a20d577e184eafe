// tests/orchestration_test.rs
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tempfile::TempDir;

use chrn::cli::{self, ChangelogOptions, Outcome, RotateOptions, Settings};
use chrn::forge::{MergedPullRequest, MockForge};
use chrn::git::{Author, GitCall, MockWorkingCopy};
use chrn::tag::TagStyle;
use chrn::ui::ScriptedConfirm;
use chrn::ChrnError;

const CHANGELOG: &str = "\
# Changelog

## [Unreleased]

## [1.0.0] - 2023-12-01

### Feature
- First cut (https://github.com/knabben/widgets/pull/1)

[Unreleased]: https://github.com/knabben/widgets/compare/v1.0.0...HEAD
[1.0.0]: https://github.com/knabben/widgets/releases/tag/v1.0.0
";

fn at(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, 9, 30, 0).unwrap()
}

fn setup_changelog(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("CHANGELOG.md");
    fs::write(&path, content).expect("Could not write changelog");
    path
}

fn settings(file: &Path) -> Settings {
    Settings {
        org: "knabben".to_string(),
        repo: "widgets".to_string(),
        file: file.to_path_buf(),
        token_file: PathBuf::from("./token"),
        label: "release-note".to_string(),
        base_branch: "master".to_string(),
        remote: "origin".to_string(),
        tag_style: TagStyle::default(),
        author: Some(Author {
            name: "Release Bot".to_string(),
            email: "bot@example.com".to_string(),
        }),
        ssh_key: PathBuf::from("/nonexistent/id_rsa"),
    }
}

fn merged(title: &str, number: u32, labels: &[&str]) -> MergedPullRequest {
    MergedPullRequest {
        title: title.to_string(),
        url: format!("https://github.com/knabben/widgets/pull/{}", number),
        labels: labels.iter().map(|s| s.to_string()).collect(),
    }
}

mod changelog_tests {
    use super::*;

    #[tokio::test]
    async fn test_changelog_inserts_grouped_notes() {
        let dir = TempDir::new().unwrap();
        let file = setup_changelog(&dir, CHANGELOG);
        let forge = MockForge::new()
            .with_release("v1.0.0", at(1, 10))
            .with_search_results(vec![
                merged("Fix crash on empty input", 12, &["release-note", "bug"]),
                merged("Add export command", 11, &["feature", "release-note"]),
            ]);

        let outcome = cli::changelog::run(
            &settings(&file),
            &ChangelogOptions::default(),
            &forge,
            at(2, 1),
        )
        .await
        .unwrap();
        assert_eq!(outcome, Outcome::Completed);

        assert_eq!(
            forge.queries(),
            vec!["repo:knabben/widgets label:release-note is:merged type:pr base:master \
                  merged:2024-01-10T09:30:00Z..2024-02-01T09:30:00Z"
                .to_string()]
        );

        let updated = fs::read_to_string(&file).unwrap();
        assert!(updated.contains(
            "## [Unreleased]\n\
             \n\
             ### Bug\n\
             - Fix crash on empty input (https://github.com/knabben/widgets/pull/12)\n\
             \n\
             ### Feature\n\
             - Add export command (https://github.com/knabben/widgets/pull/11)\n\
             \n\
             ## [1.0.0] - 2023-12-01\n"
        ));
        assert!(updated.ends_with("[1.0.0]: https://github.com/knabben/widgets/releases/tag/v1.0.0\n"));
    }

    #[tokio::test]
    async fn test_changelog_with_explicit_window_and_save() {
        let dir = TempDir::new().unwrap();
        let file = setup_changelog(&dir, CHANGELOG);
        let output = dir.path().join("notes.md");
        let forge = MockForge::new()
            .with_release("v1.0.0", at(1, 10))
            .with_release("v1.1.0", at(1, 20))
            .with_search_results(vec![merged("Speed up search", 14, &["release-note"])]);

        let options = ChangelogOptions {
            output: Some(output.clone()),
            save: true,
            previous_release: Some("1.0.0".to_string()),
            current_release: Some("v1.1.0".to_string()),
        };

        cli::changelog::run(&settings(&file), &options, &forge, at(3, 1))
            .await
            .unwrap();

        assert!(forge.queries()[0].ends_with("merged:2024-01-10T09:30:00Z..2024-01-20T09:30:00Z"));
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "### Other\n- Speed up search (https://github.com/knabben/widgets/pull/14)\n"
        );

        let saved = forge
            .releases()
            .into_iter()
            .find(|release| release.tag == "v1.1.0")
            .unwrap();
        assert_eq!(
            saved.body,
            "### Other\n- Speed up search (https://github.com/knabben/widgets/pull/14)"
        );
    }

    #[tokio::test]
    async fn test_save_without_current_release_is_config_error() {
        let dir = TempDir::new().unwrap();
        let file = setup_changelog(&dir, CHANGELOG);
        let forge = MockForge::new().with_release("v1.0.0", at(1, 10));

        let options = ChangelogOptions {
            save: true,
            ..ChangelogOptions::default()
        };
        let err = cli::changelog::run(&settings(&file), &options, &forge, at(2, 1))
            .await
            .unwrap_err();

        assert!(matches!(err, ChrnError::Config(_)));
        assert!(forge.queries().is_empty());
        assert_eq!(fs::read_to_string(&file).unwrap(), CHANGELOG);
    }

    #[tokio::test]
    async fn test_changelog_without_releases_fails_before_writing() {
        let dir = TempDir::new().unwrap();
        let file = setup_changelog(&dir, CHANGELOG);
        let forge = MockForge::new();

        let err = cli::changelog::run(
            &settings(&file),
            &ChangelogOptions::default(),
            &forge,
            at(2, 1),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ChrnError::Network(_)));
        assert_eq!(fs::read_to_string(&file).unwrap(), CHANGELOG);
    }

    #[tokio::test]
    async fn test_changelog_with_no_pull_requests_keeps_document() {
        let dir = TempDir::new().unwrap();
        let file = setup_changelog(&dir, CHANGELOG);
        let forge = MockForge::new().with_release("v1.0.0", at(1, 10));

        cli::changelog::run(
            &settings(&file),
            &ChangelogOptions::default(),
            &forge,
            at(2, 1),
        )
        .await
        .unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), CHANGELOG);
    }

    #[tokio::test]
    async fn test_changelog_without_unreleased_heading_still_writes_output() {
        let dir = TempDir::new().unwrap();
        let original = "# Changelog\n\n## [1.0.0] - 2023-12-01\n";
        let file = setup_changelog(&dir, original);
        let output = dir.path().join("notes.md");
        let forge = MockForge::new()
            .with_release("v1.0.0", at(1, 10))
            .with_search_results(vec![merged("Fix crash", 12, &["bug"])]);

        let options = ChangelogOptions {
            output: Some(output.clone()),
            ..ChangelogOptions::default()
        };
        let outcome = cli::changelog::run(&settings(&file), &options, &forge, at(2, 1))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(fs::read_to_string(&file).unwrap(), original);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "### Bug\n- Fix crash (https://github.com/knabben/widgets/pull/12)\n"
        );
    }
}

mod note_tests {
    use super::*;

    const RELEASED: &str = "\
# Changelog

## [Unreleased]

## [1.1.0] - 2024-02-01

### Bug
- Fix crash (https://github.com/knabben/widgets/pull/12)

## [1.0.0] - 2023-12-01

### Feature
- First cut (https://github.com/knabben/widgets/pull/1)
";

    #[tokio::test]
    async fn test_note_creates_release_from_first_section() {
        let dir = TempDir::new().unwrap();
        let file = setup_changelog(&dir, RELEASED);
        let forge = MockForge::new();
        let mut confirm = ScriptedConfirm::new([true]);

        let outcome = cli::note::run(&settings(&file), &forge, &mut confirm)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(confirm.prompts(), ["Do you want to proceed?"]);

        let releases = forge.releases();
        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0].tag, "v1.1.0");
        assert_eq!(
            releases[0].body,
            "### Bug\n- Fix crash (https://github.com/knabben/widgets/pull/12)"
        );
    }

    #[tokio::test]
    async fn test_note_declined_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let file = setup_changelog(&dir, RELEASED);
        let forge = MockForge::new();
        let mut confirm = ScriptedConfirm::new([false]);

        let outcome = cli::note::run(&settings(&file), &forge, &mut confirm)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Declined);
        assert_eq!(outcome.exit_code(), 1);
        assert!(forge.releases().is_empty());
    }

    #[tokio::test]
    async fn test_note_without_release_heading_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let file = setup_changelog(&dir, "# Changelog\n\n## [Unreleased]\n");
        let forge = MockForge::new();
        let mut confirm = ScriptedConfirm::new([true]);

        let err = cli::note::run(&settings(&file), &forge, &mut confirm)
            .await
            .unwrap_err();

        assert!(matches!(err, ChrnError::Parse(_)));
        assert!(confirm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_note_forge_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let file = setup_changelog(&dir, RELEASED);
        let forge = MockForge::new().failing("create_release", "Validation Failed");
        let mut confirm = ScriptedConfirm::new([true]);

        let err = cli::note::run(&settings(&file), &forge, &mut confirm)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Validation Failed"));
    }
}

mod rotate_tests {
    use super::*;

    fn options(dir: &TempDir, bump: &str) -> RotateOptions {
        RotateOptions {
            bump: bump.to_string(),
            version_file: dir.path().join("version.py"),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[tokio::test]
    async fn test_rotate_opens_release_pull_request() {
        let dir = TempDir::new().unwrap();
        let file = setup_changelog(&dir, CHANGELOG);
        let options = options(&dir, "minor");
        let forge = MockForge::new().with_release("v1.0.0", at(1, 10));
        let repo = MockWorkingCopy::new();
        let mut confirm = ScriptedConfirm::new([true]);

        let outcome = cli::rotate::run(
            &settings(&file),
            &options,
            &forge,
            &repo,
            &mut confirm,
            today(),
        )
        .await
        .unwrap();
        assert_eq!(outcome, Outcome::Completed);

        let rotated = fs::read_to_string(&file).unwrap();
        assert!(rotated.contains("## [Unreleased]\n\n## [1.1.0] - 2024-03-01\n"));
        assert!(rotated.contains(
            "[Unreleased]: https://github.com/knabben/widgets/compare/v1.1.0...HEAD\n\
             [1.1.0]: https://github.com/knabben/widgets/compare/v1.0.0...v1.1.0\n"
        ));
        assert_eq!(
            fs::read_to_string(&options.version_file).unwrap(),
            "VERSION = \"1.1.0\"\n"
        );

        assert_eq!(
            repo.calls(),
            vec![
                GitCall::Pull("origin".to_string()),
                GitCall::CreateBranch("release/1.1.0".to_string()),
                GitCall::Checkout("release/1.1.0".to_string()),
                GitCall::Stage(file.clone()),
                GitCall::Stage(options.version_file.clone()),
                GitCall::Commit {
                    message: "Release 1.1.0".to_string(),
                    author: Some("Release Bot <bot@example.com>".to_string()),
                },
                GitCall::Push {
                    remote: "origin".to_string(),
                    branch: "release/1.1.0".to_string(),
                },
            ]
        );

        let pulls = forge.pull_requests();
        assert_eq!(pulls.len(), 1);
        assert_eq!(pulls[0].head, "release/1.1.0");
        assert_eq!(pulls[0].base, "master");
        assert_eq!(pulls[0].title, "Release 1.1.0");
    }

    #[tokio::test]
    async fn test_rotate_declined_keeps_local_commit_only() {
        let dir = TempDir::new().unwrap();
        let file = setup_changelog(&dir, CHANGELOG);
        let forge = MockForge::new().with_release("v1.0.0", at(1, 10));
        let repo = MockWorkingCopy::new();
        let mut confirm = ScriptedConfirm::new([false]);

        let outcome = cli::rotate::run(
            &settings(&file),
            &options(&dir, "patch"),
            &forge,
            &repo,
            &mut confirm,
            today(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, Outcome::Declined);
        assert_eq!(confirm.prompts(), ["Opening PR, do you want to proceed?"]);
        assert!(forge.pull_requests().is_empty());

        let calls = repo.calls();
        assert!(calls.contains(&GitCall::CreateBranch("release/1.0.1".to_string())));
        assert!(!calls.iter().any(|call| matches!(call, GitCall::Push { .. })));
    }

    #[tokio::test]
    async fn test_rotate_falls_back_without_releases() {
        let dir = TempDir::new().unwrap();
        let file = setup_changelog(&dir, CHANGELOG);
        let options = options(&dir, "major");
        let forge = MockForge::new();
        let repo = MockWorkingCopy::new().with_failing_pull();
        let mut confirm = ScriptedConfirm::new([false]);

        cli::rotate::run(
            &settings(&file),
            &options,
            &forge,
            &repo,
            &mut confirm,
            today(),
        )
        .await
        .unwrap();

        assert_eq!(
            fs::read_to_string(&options.version_file).unwrap(),
            "VERSION = \"0.0.1\"\n"
        );
        assert!(repo
            .calls()
            .contains(&GitCall::CreateBranch("release/0.0.1".to_string())));
    }

    #[tokio::test]
    async fn test_rotate_malformed_footer_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let file = setup_changelog(
            &dir,
            "# Changelog\n\n## [Unreleased]\n\n[Unreleased]: not a compare link\n",
        );
        let forge = MockForge::new().with_release("v1.0.0", at(1, 10));
        let repo = MockWorkingCopy::new();
        let mut confirm = ScriptedConfirm::new([true]);

        let err = cli::rotate::run(
            &settings(&file),
            &options(&dir, "minor"),
            &forge,
            &repo,
            &mut confirm,
            today(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ChrnError::Parse(_)));
        assert!(confirm.prompts().is_empty());
        assert_eq!(repo.calls(), vec![GitCall::Pull("origin".to_string())]);
        assert!(!dir.path().join("version.py").exists());
    }

    #[tokio::test]
    async fn test_rotate_unwritable_version_file_keeps_changelog() {
        let dir = TempDir::new().unwrap();
        let file = setup_changelog(&dir, CHANGELOG);
        let options = RotateOptions {
            bump: "minor".to_string(),
            version_file: dir.path().join("missing").join("version.py"),
        };
        let forge = MockForge::new().with_release("v1.0.0", at(1, 10));
        let repo = MockWorkingCopy::new();
        let mut confirm = ScriptedConfirm::new([true]);

        let err = cli::rotate::run(
            &settings(&file),
            &options,
            &forge,
            &repo,
            &mut confirm,
            today(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ChrnError::Io(_)));
        assert_eq!(fs::read_to_string(&file).unwrap(), CHANGELOG);
        assert!(!repo
            .calls()
            .iter()
            .any(|call| matches!(call, GitCall::Stage(_) | GitCall::Commit { .. })));
    }

    #[tokio::test]
    async fn test_rotate_bump_overflow_cuts_no_branch() {
        let dir = TempDir::new().unwrap();
        let file = setup_changelog(&dir, CHANGELOG);
        let forge = MockForge::new().with_release("v18446744073709551615.0.0", at(1, 10));
        let repo = MockWorkingCopy::new();
        let mut confirm = ScriptedConfirm::new([true]);

        let err = cli::rotate::run(
            &settings(&file),
            &options(&dir, "major"),
            &forge,
            &repo,
            &mut confirm,
            today(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ChrnError::Parse(_)));
        assert!(repo.calls().is_empty());
        assert_eq!(fs::read_to_string(&file).unwrap(), CHANGELOG);
    }
}
