//! End-to-end sync runs against a real remote and an in-memory upstream

mod common;

use std::fs;
use std::time::Duration;

use common::{FakeFetcher, test_config};
use ersync_core::{
    Error, FlowKind, ItemOutcome, RunReport, SyncConfig, SyncOrchestrator, SyncState,
};
use ersync_fs::NormalizedPath;
use ersync_git::{GitRepository, RemoteSpec, VcsBackend};
use ersync_test_utils::archive::ZipBuilder;
use ersync_test_utils::git::RemoteFixture;
use pretty_assertions::assert_eq;

const CHECKPOINT: &str = "gameDb/gamedata-20240101000000.zip";

fn open_clone(fixture: &RemoteFixture) -> GitRepository {
    let path = fixture.clone_workdir();
    GitRepository::open(NormalizedPath::new(path), RemoteSpec::default()).unwrap()
}

fn run(
    config: &SyncConfig,
    fetcher: &FakeFetcher,
    repo: &GitRepository,
) -> ersync_core::Result<RunReport> {
    SyncOrchestrator::new(config, fetcher).run_with(repo)
}

fn flow(report: &RunReport, kind: FlowKind) -> &[ItemOutcome] {
    report
        .flows
        .iter()
        .find(|f| f.kind == kind)
        .map(|f| f.outcomes.as_slice())
        .unwrap()
}

#[test]
fn test_new_archive_is_extracted_committed_and_pushed() {
    let fixture = RemoteFixture::with_history(&[CHECKPOINT]);
    let repo = open_clone(&fixture);
    let config = test_config(fixture.workdir_path().as_path());
    let archive = ZipBuilder::new()
        .dir("Character/")
        .file("Character/1.json", br#"{"code":1,"name":"Jackie"}"#)
        .file("hash.txt", b"abc")
        .build();
    let fetcher = FakeFetcher::new("gamedata-20240102000000.zip")
        .with_archive("gamedata-20240102000000.zip", archive);

    let report = run(&config, &fetcher, &repo).unwrap();

    assert_eq!(report.final_state, SyncState::Done);
    assert_eq!(report.commits(), 1);
    assert_eq!(fixture.remote_log()[0], "gameDb/gamedata-20240102000000.zip");
    assert_eq!(
        fixture.remote_file("data/Character/1.json").unwrap(),
        b"{\n  \"code\": 1,\n  \"name\": \"Jackie\"\n}".to_vec()
    );
    assert_eq!(fixture.remote_file("data/hash.txt").unwrap(), b"abc".to_vec());

    let head = &repo.recent_commits(1).unwrap()[0];
    assert_eq!(head.authored_at.to_rfc3339(), "2024-01-02T00:00:00+00:00");
}

#[test]
fn test_up_to_date_archive_is_not_downloaded() {
    let fixture = RemoteFixture::with_history(&[CHECKPOINT]);
    let repo = open_clone(&fixture);
    let config = test_config(fixture.workdir_path().as_path());
    let fetcher = FakeFetcher::new("gamedata-20240101000000.zip");

    let report = run(&config, &fetcher, &repo).unwrap();

    assert!(flow(&report, FlowKind::GameData).is_empty());
    assert!(fetcher.download_calls().is_empty());
    assert_eq!(fixture.remote_log()[0], CHECKPOINT);
}

#[test]
fn test_rotated_checkpoint_reprocesses_available_archive() {
    let fixture = RemoteFixture::with_history(&["gameDb/gamedata-20231201000000.zip"]);
    let repo = open_clone(&fixture);
    let config = test_config(fixture.workdir_path().as_path());
    let fetcher = FakeFetcher::new("gamedata-20240102000000.zip").with_archive(
        "gamedata-20240102000000.zip",
        ZipBuilder::new().file("a.txt", b"a").build(),
    );

    let report = run(&config, &fetcher, &repo).unwrap();

    assert_eq!(flow(&report, FlowKind::GameData).len(), 1);
    assert_eq!(fixture.remote_file("data/a.txt").unwrap(), b"a".to_vec());
}

#[test]
fn test_missing_checkpoint_aborts_without_push() {
    let fixture = RemoteFixture::with_history(&["freeCharacters/2"]);
    let repo = open_clone(&fixture);
    let config = test_config(fixture.workdir_path().as_path());
    let fetcher = FakeFetcher::new("gamedata-20240102000000.zip");

    let error = run(&config, &fetcher, &repo).unwrap_err();

    assert!(matches!(
        error,
        Error::StepFailed {
            state: SyncState::SyncGameData,
            ..
        }
    ));
    assert!(matches!(error.root_cause(), Error::CheckpointMissing { window: 50 }));
    assert_eq!(fixture.remote_log(), vec!["freeCharacters/2", "Initial commit"]);
}

#[test]
fn test_corrupt_archive_aborts_and_keeps_previous_tree() {
    let fixture = RemoteFixture::with_history(&[CHECKPOINT]);
    let repo = open_clone(&fixture);
    fs::create_dir_all(fixture.workdir_path().join("data")).unwrap();
    fs::write(fixture.workdir_path().join("data/existing.txt"), "old").unwrap();
    let config = test_config(fixture.workdir_path().as_path());
    let fetcher = FakeFetcher::new("gamedata-20240102000000.zip")
        .with_archive("gamedata-20240102000000.zip", b"not a zip".to_vec());

    let error = run(&config, &fetcher, &repo).unwrap_err();

    assert!(matches!(error.root_cause(), Error::Fs(_)));
    assert!(fixture.workdir_path().join("data/existing.txt").is_file());
    assert_eq!(fixture.remote_log()[0], CHECKPOINT);
}

#[test]
fn test_later_failure_leaves_earlier_commits_unpushed() {
    let fixture = RemoteFixture::with_history(&[CHECKPOINT]);
    let repo = open_clone(&fixture);
    let mut config = test_config(fixture.workdir_path().as_path());
    config.languages = vec!["Korean".to_string()];
    let fetcher = FakeFetcher::new("gamedata-20240102000000.zip")
        .with_archive(
            "gamedata-20240102000000.zip",
            ZipBuilder::new().file("a.txt", b"a").build(),
        )
        .with_bundle("Korean", "l10n/Korean-latest.txt", "missing stamp");

    let error = run(&config, &fetcher, &repo).unwrap_err();

    assert!(matches!(
        error,
        Error::StepFailed {
            state: SyncState::SyncLocalization,
            ..
        }
    ));
    assert!(matches!(error.root_cause(), Error::InvalidIdentifier { .. }));
    assert_eq!(
        repo.recent_commits(1).unwrap()[0].message,
        "gameDb/gamedata-20240102000000.zip"
    );
    assert_eq!(fixture.remote_log()[0], CHECKPOINT);
}

#[test]
fn test_localization_soft_error_skips_language_and_pauses() {
    let fixture = RemoteFixture::with_history(&[CHECKPOINT]);
    let repo = open_clone(&fixture);
    let mut config = test_config(fixture.workdir_path().as_path());
    config.languages = vec!["Korean".to_string(), "English".to_string()];
    config.request_interval_ms = 1000;
    let fetcher = FakeFetcher::new("gamedata-20240101000000.zip")
        .with_localization_body("Korean", r#"{"code":404,"message":"Not Found"}"#)
        .with_bundle(
            "English",
            "l10n/l10n-English-20240105093000.txt",
            "greeting┃Hello",
        );

    let report = run(&config, &fetcher, &repo).unwrap();

    let outcomes = flow(&report, FlowKind::Localization);
    assert!(matches!(&outcomes[0], ItemOutcome::Skipped { item, .. } if item == "Korean"));
    assert!(outcomes[1].is_committed());

    assert_eq!(fixture.remote_file("l10n/Korean.txt"), None);
    assert_eq!(
        fixture.remote_file("l10n/English.txt").unwrap(),
        "greeting┃Hello".as_bytes().to_vec()
    );
    assert_eq!(fixture.remote_log()[0], "l10n/l10n-English-20240105093000.txt");
    let head = &repo.recent_commits(1).unwrap()[0];
    assert_eq!(head.authored_at.to_rfc3339(), "2024-01-05T09:30:00+00:00");

    let calls = fetcher.api_calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[1].1.duration_since(calls[0].1) >= Duration::from_secs(1));
}

#[test]
fn test_free_characters_written_only_when_non_empty() {
    let fixture = RemoteFixture::with_history(&[CHECKPOINT]);
    let repo = open_clone(&fixture);
    let mut config = test_config(fixture.workdir_path().as_path());
    config.matching_modes = vec!["2".to_string(), "3".to_string(), "6".to_string()];
    let fetcher = FakeFetcher::new("gamedata-20240101000000.zip")
        .with_free_characters_body("2", r#"{"code":200,"message":"Success","freeCharacters":[]}"#)
        .with_free_characters_body(
            "3",
            r#"{"code":200,"message":"Success","freeCharacters":[1,2,3]}"#,
        )
        .with_free_characters_body("6", r#"{"code":500,"message":"Internal Error"}"#);

    let report = run(&config, &fetcher, &repo).unwrap();

    let outcomes = flow(&report, FlowKind::FreeCharacters);
    assert_eq!(outcomes.len(), 3);
    assert!(!outcomes[0].is_committed());
    assert!(outcomes[1].is_committed());
    assert!(!outcomes[2].is_committed());

    assert!(!fixture.workdir_path().join("freeCharacters/2.json").exists());
    assert_eq!(
        fixture.remote_file("freeCharacters/3.json").unwrap(),
        b"[\n  1,\n  2,\n  3\n]".to_vec()
    );
    assert_eq!(fixture.remote_log()[0], "freeCharacters/3");
}

#[test]
fn test_unchanged_rotation_is_not_recommitted() {
    let fixture = RemoteFixture::with_history(&[CHECKPOINT]);
    let repo = open_clone(&fixture);
    let mut config = test_config(fixture.workdir_path().as_path());
    config.matching_modes = vec!["3".to_string()];
    let fetcher = FakeFetcher::new("gamedata-20240101000000.zip")
        .with_free_characters_body("3", r#"{"code":200,"freeCharacters":[7]}"#);

    run(&config, &fetcher, &repo).unwrap();
    let second = run(&config, &fetcher, &repo).unwrap();

    assert_eq!(second.commits(), 0);
    assert_eq!(
        fixture.remote_log(),
        vec!["freeCharacters/3", CHECKPOINT, "Initial commit"]
    );
}

#[test]
fn test_reset_discards_local_drift() {
    let fixture = RemoteFixture::with_history(&[CHECKPOINT]);
    let repo = open_clone(&fixture);
    fs::write(fixture.workdir_path().join("README.md"), "local edit").unwrap();
    fixture.push_commit("freeCharacters/6");
    let config = test_config(fixture.workdir_path().as_path());
    let fetcher = FakeFetcher::new("gamedata-20240101000000.zip");

    run(&config, &fetcher, &repo).unwrap();

    assert_eq!(
        fs::read_to_string(fixture.workdir_path().join("README.md")).unwrap(),
        "# data\n"
    );
    assert_eq!(repo.recent_commits(1).unwrap()[0].message, "freeCharacters/6");
}

#[test]
fn test_run_clones_missing_working_copy() {
    let fixture = RemoteFixture::with_history(&[CHECKPOINT]);
    let mut config = test_config(fixture.workdir_path().as_path());
    config.remote_url = Some(fixture.remote_url());
    let fetcher = FakeFetcher::new("gamedata-20240102000000.zip").with_archive(
        "gamedata-20240102000000.zip",
        ZipBuilder::new().file("a.txt", b"a").build(),
    );

    let report = SyncOrchestrator::new(&config, &fetcher).run().unwrap();

    assert_eq!(report.commits(), 1);
    assert_eq!(fixture.remote_log()[0], "gameDb/gamedata-20240102000000.zip");
}

#[test]
fn test_run_without_repository_fails_in_init() {
    let fixture = RemoteFixture::with_history(&[]);
    let config = test_config(fixture.workdir_path().as_path());
    let fetcher = FakeFetcher::new("gamedata-20240102000000.zip");

    let error = SyncOrchestrator::new(&config, &fetcher).run().unwrap_err();

    assert!(matches!(
        error,
        Error::StepFailed {
            state: SyncState::Init,
            ..
        }
    ));
}
