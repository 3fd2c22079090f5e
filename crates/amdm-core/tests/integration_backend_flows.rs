//! Integration tests: setup wizard, settings store and download queue driven
//! against a scripted in-memory backend.
//!
//! These cover the flows the stores carry on their own (install retries,
//! cookie fallbacks, save failures, stale loads, event-fed queue updates)
//! rather than any single store transition; those live in the unit tests.

mod common;

use amdm_core::bridge::{
    Backend, BackendEvent, BridgeError, CookieStatus, DependencyReport, ToolKind, ToolStatus,
};
use amdm_core::classify::ContentType;
use amdm_core::queue::{DownloadQueue, QueueState};
use amdm_core::settings::{SettingsPatch, SettingsRecord, SettingsStore};
use amdm_core::setup::{SetupStep, SetupWizard};

use common::mock_backend::MockBackend;

fn report_with_all_tools() -> DependencyReport {
    DependencyReport {
        python: ToolStatus::installed("3.12.1"),
        gamdl: ToolStatus::installed("2.4.1"),
        ffmpeg: ToolStatus::installed("7.0"),
        mp4decrypt: ToolStatus::installed("5.0.3"),
        cookies: CookieStatus::invalid("no cookies file"),
    }
}

#[tokio::test]
async fn setup_wizard_walks_to_completion_with_installs() {
    let backend = MockBackend::new();
    let mut wizard = SetupWizard::new();
    wizard.refresh_report(&backend).await.unwrap();

    assert_eq!(wizard.current_step(), SetupStep::Welcome);
    assert!(wizard.next_step(), "welcome completes itself");

    assert_eq!(wizard.current_step(), SetupStep::Python);
    assert!(!wizard.next_step(), "python gates until installed");
    wizard.run_install(&backend, ToolKind::Python).await.unwrap();
    assert!(wizard.next_step());

    assert_eq!(wizard.current_step(), SetupStep::Gamdl);
    wizard.run_install(&backend, ToolKind::Gamdl).await.unwrap();
    assert!(wizard.next_step());

    assert_eq!(wizard.current_step(), SetupStep::Dependencies);
    wizard.run_install(&backend, ToolKind::Ffmpeg).await.unwrap();
    assert!(!wizard.next_step(), "one of two media tools is not enough");
    wizard
        .run_install(&backend, ToolKind::Mp4decrypt)
        .await
        .unwrap();
    assert!(wizard.next_step());

    assert_eq!(wizard.current_step(), SetupStep::Cookies);
    let status = wizard
        .run_import_cookies(&backend, "/tmp/cookies.txt")
        .await
        .unwrap();
    assert!(status.valid);
    assert!(wizard.next_step());

    assert_eq!(wizard.current_step(), SetupStep::Complete);
    assert!(wizard.finish(&backend).await.unwrap());
    assert!(wizard.is_finished());
    assert!(backend.setup_marked_complete());
    assert!(backend.is_setup_complete().await.unwrap());

    // The installs really registered with the backend.
    let python = backend.check_tool(ToolKind::Python).await.unwrap();
    assert_eq!(python, ToolStatus::installed("3.12.1"));
}

#[tokio::test]
async fn failed_install_keeps_step_incomplete_until_retried() {
    let backend = MockBackend::new();
    let mut wizard = SetupWizard::new();
    wizard.refresh_report(&backend).await.unwrap();
    wizard.next_step();
    assert_eq!(wizard.current_step(), SetupStep::Python);

    backend.fail_next("install_tool", "pip exited with status 1");
    let err = wizard
        .run_install(&backend, ToolKind::Python)
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::Backend(_)));
    assert_eq!(
        wizard.last_error(),
        Some("backend error: pip exited with status 1")
    );
    assert!(!wizard.is_completed(SetupStep::Python));
    assert!(!wizard.next_step());

    // The scripted failure is consumed; a retry goes through.
    wizard.run_install(&backend, ToolKind::Python).await.unwrap();
    assert!(wizard.is_completed(SetupStep::Python));
    assert!(wizard.last_error().is_none());
    assert!(wizard.next_step());
}

#[tokio::test]
async fn rejected_cookie_import_can_be_skipped() {
    let backend = MockBackend::new();
    backend.set_report(report_with_all_tools());
    backend.set_import_outcome(CookieStatus::invalid("cookies expired"));

    let mut wizard = SetupWizard::new();
    wizard.refresh_report(&backend).await.unwrap();
    while wizard.current_step() != SetupStep::Cookies {
        assert!(wizard.next_step());
    }

    let status = wizard
        .run_import_cookies(&backend, "/tmp/cookies.txt")
        .await
        .unwrap();
    assert!(!status.valid);
    assert!(!wizard.is_completed(SetupStep::Cookies));
    assert!(!wizard.next_step());
    assert_eq!(wizard.last_error(), Some("cookies expired"));

    // Cookies are optional; skipping unblocks the walk.
    assert!(wizard.skip_current());
    assert!(wizard.next_step());
    assert_eq!(wizard.current_step(), SetupStep::Complete);
}

#[tokio::test]
async fn finish_off_the_terminal_step_is_a_no_op() {
    let backend = MockBackend::new();
    let mut wizard = SetupWizard::new();
    assert!(!wizard.finish(&backend).await.unwrap());
    assert!(!wizard.is_finished());
    assert!(!backend.setup_marked_complete());
}

#[tokio::test]
async fn settings_load_edit_save_round_trip() {
    let backend = MockBackend::new();
    backend.set_settings(SettingsRecord {
        download_dir: Some("/music".to_string()),
        ..SettingsRecord::default()
    });

    let mut store = SettingsStore::new();
    store.load(&backend).await.unwrap();
    assert!(!store.is_dirty());
    assert_eq!(store.current().download_dir.as_deref(), Some("/music"));

    store.update(SettingsPatch {
        overwrite: Some(true),
        ..SettingsPatch::default()
    });
    assert!(store.is_dirty());

    store.save(&backend).await.unwrap();
    assert!(!store.is_dirty());
    let stored = backend.stored_settings();
    assert!(stored.overwrite);
    assert_eq!(stored.download_dir.as_deref(), Some("/music"));
}

#[tokio::test]
async fn failed_save_keeps_edits_dirty() {
    let backend = MockBackend::new();
    let mut store = SettingsStore::new();
    store.load(&backend).await.unwrap();

    store.update(SettingsPatch {
        save_cover: Some(true),
        ..SettingsPatch::default()
    });
    backend.fail_next("save_settings", "settings file is read-only");
    let err = store.save(&backend).await.unwrap_err();
    assert!(matches!(err, BridgeError::Backend(_)));
    assert!(store.is_dirty());
    assert_eq!(
        store.last_error(),
        Some("backend error: settings file is read-only")
    );
    assert!(
        !backend.stored_settings().save_cover,
        "failed save must not persist"
    );

    store.save(&backend).await.unwrap();
    assert!(!store.is_dirty());
    assert!(backend.stored_settings().save_cover);
}

#[tokio::test]
async fn edit_during_load_wins_over_the_stale_response() {
    let backend = MockBackend::new();
    backend.set_settings(SettingsRecord {
        cover_size: 600,
        ..SettingsRecord::default()
    });

    let mut store = SettingsStore::new();
    let ticket = store.begin_load();
    let response = backend.get_settings().await;

    // The user edits while the response is in flight.
    store.update(SettingsPatch {
        cover_size: Some(3000),
        ..SettingsPatch::default()
    });

    store.finish_load(ticket, response).unwrap();
    assert_eq!(
        store.current().cover_size,
        3000,
        "stale load must not clobber the edit"
    );
    assert!(store.is_dirty());
}

#[tokio::test]
async fn queue_follows_a_download_through_events() {
    let backend = MockBackend::new();
    let mut events = backend.subscribe();

    let url = "https://music.apple.com/us/album/random-access-memories/617154241";
    let id = backend.enqueue_download(url).await.unwrap();

    backend.push_event(BackendEvent::DownloadProgress {
        id,
        bytes_done: 512 * 1024,
        total_bytes: Some(2 * 1024 * 1024),
    });
    backend.push_event(BackendEvent::DownloadCompleted { id });

    let mut queue = DownloadQueue::new();
    for _ in 0..3 {
        let event = events.recv().await.expect("event stream stays open");
        queue.apply_event(&event);
    }

    let item = queue.get(id).unwrap();
    assert_eq!(item.content_type, ContentType::Album);
    assert_eq!(item.state, QueueState::Completed);
    assert_eq!(item.bytes_done, 2 * 1024 * 1024);
    assert_eq!(item.fraction(), Some(1.0));
}

#[tokio::test]
async fn queue_records_download_failure() {
    let backend = MockBackend::new();
    let mut events = backend.subscribe();

    let url = "https://music.apple.com/us/song/around-the-world/697194281";
    let id = backend.enqueue_download(url).await.unwrap();
    backend.push_event(BackendEvent::DownloadFailed {
        id,
        message: "no valid cookies".to_string(),
    });

    let mut queue = DownloadQueue::new();
    for _ in 0..2 {
        queue.apply_event(&events.recv().await.expect("event stream stays open"));
    }

    let item = queue.get(id).unwrap();
    assert_eq!(item.content_type, ContentType::Song);
    assert!(item.state.is_terminal());
    assert_eq!(
        item.state,
        QueueState::Failed {
            message: "no valid cookies".to_string()
        }
    );
}
