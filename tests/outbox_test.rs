// ABOUTME: Tests for the durable JSON outbox of pending saves
// ABOUTME: Enqueue, overwrite, ordering, removal, draining, and skipping unreadable entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{Duration, Utc};
use common::init_test_logging;
use stride_tracker::models::{ActivityType, FinishedActivity};
use stride_tracker::recorder::{Outbox, PendingSave};
use tempfile::TempDir;
use uuid::Uuid;

fn pending(minutes_ago: i64) -> PendingSave {
    let finished_at = Utc::now() - Duration::minutes(minutes_ago);
    PendingSave::new(FinishedActivity {
        session_id: Uuid::new_v4(),
        activity_type: ActivityType::Walking,
        start_coordinate: None,
        end_coordinate: None,
        track_points: Vec::new(),
        distance_km: 0.0,
        duration_seconds: 1_200,
        step_count: 2_400,
        calories_burned: 96,
        started_at: finished_at - Duration::minutes(20),
        finished_at,
    })
}

async fn open() -> (TempDir, Outbox) {
    init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let outbox = Outbox::open(dir.path().join("pending")).await.unwrap();
    (dir, outbox)
}

#[tokio::test]
async fn test_enqueue_writes_one_file_per_session() {
    let (_dir, outbox) = open().await;
    let save = pending(5);

    let path = outbox.enqueue(&save).await.unwrap();

    assert!(path.exists());
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        format!("{}.json", save.activity.session_id)
    );
    assert_eq!(outbox.pending().await.unwrap(), vec![save]);
}

#[tokio::test]
async fn test_enqueue_overwrites_same_session() {
    let (_dir, outbox) = open().await;
    let mut save = pending(5);
    save.route_pending = true;
    outbox.enqueue(&save).await.unwrap();

    save.route_pending = false;
    outbox.enqueue(&save).await.unwrap();

    let entries = outbox.pending().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].route_pending);
}

#[tokio::test]
async fn test_pending_sorted_oldest_first() {
    let (_dir, outbox) = open().await;
    let newest = pending(1);
    let oldest = pending(30);
    let middle = pending(10);
    for save in [&newest, &oldest, &middle] {
        outbox.enqueue(save).await.unwrap();
    }

    let ids: Vec<Uuid> = outbox
        .pending()
        .await
        .unwrap()
        .iter()
        .map(|save| save.activity.session_id)
        .collect();

    assert_eq!(
        ids,
        vec![
            oldest.activity.session_id,
            middle.activity.session_id,
            newest.activity.session_id
        ]
    );
}

#[tokio::test]
async fn test_remove_reports_whether_entry_existed() {
    let (_dir, outbox) = open().await;
    let save = pending(5);
    outbox.enqueue(&save).await.unwrap();

    assert!(outbox.remove(save.activity.session_id).await.unwrap());
    assert!(!outbox.remove(save.activity.session_id).await.unwrap());
    assert!(outbox.pending().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unreadable_entries_are_skipped_and_kept() {
    let (_dir, outbox) = open().await;
    let save = pending(5);
    outbox.enqueue(&save).await.unwrap();
    let corrupt = outbox.dir().join(format!("{}.json", Uuid::new_v4()));
    tokio::fs::write(&corrupt, b"{ not json").await.unwrap();
    tokio::fs::write(outbox.dir().join("notes.txt"), b"ignored")
        .await
        .unwrap();

    let entries = outbox.pending().await.unwrap();

    assert_eq!(entries, vec![save]);
    assert!(corrupt.exists());
}

#[tokio::test]
async fn test_drain_empties_outbox() {
    let (_dir, outbox) = open().await;
    outbox.enqueue(&pending(3)).await.unwrap();
    outbox.enqueue(&pending(2)).await.unwrap();

    let drained = outbox.drain().await.unwrap();

    assert_eq!(drained.len(), 2);
    assert!(outbox.pending().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_entries_survive_reopen() {
    let (dir, outbox) = open().await;
    let save = pending(5);
    outbox.enqueue(&save).await.unwrap();
    drop(outbox);

    let reopened = Outbox::open(dir.path().join("pending")).await.unwrap();

    assert_eq!(reopened.pending().await.unwrap(), vec![save]);
}
