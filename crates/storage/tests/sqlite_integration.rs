use board_core::model::{EntryId, ProjectId, TimeEntry};
use board_core::time::fixed_now;
use chrono::Duration;
use storage::repository::{ProgressRepository, TimeEntryRepository, TrackingSessionRepository};
use storage::sqlite::SqliteRepository;

fn build_entry(offset_secs: i64, len_secs: i64) -> TimeEntry {
    let started_at = fixed_now() + Duration::seconds(offset_secs);
    let ended_at = started_at + Duration::seconds(len_secs);
    TimeEntry::new(EntryId::from_timestamp(ended_at), started_at, ended_at).unwrap()
}

#[tokio::test]
async fn sqlite_roundtrip_persists_entries_in_start_order() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_entries?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let project = ProjectId::new("proj-1");
    let other = ProjectId::new("proj-2");

    // stored out of order on purpose
    repo.put_entries(&project, &[build_entry(300, 60), build_entry(0, 90)])
        .await
        .expect("put entries");
    repo.put_entries(&other, &[build_entry(0, 10)])
        .await
        .expect("put other");

    let fetched = repo.list_entries(&project).await.expect("list");
    assert_eq!(fetched.len(), 2);
    assert_eq!(fetched[0].started_at(), fixed_now());
    assert_eq!(fetched[0].duration_seconds(), 90);
    assert_eq!(fetched[1].duration_seconds(), 60);

    // replacement is whole-collection, scoped to the project
    repo.put_entries(&project, &[]).await.expect("clear");
    assert!(repo.list_entries(&project).await.expect("list").is_empty());
    assert_eq!(repo.list_entries(&other).await.expect("list").len(), 1);
}

#[tokio::test]
async fn sqlite_session_descriptor_survives_reopen() {
    let url = "sqlite:file:memdb_sessions?mode=memory&cache=shared";
    let repo = SqliteRepository::connect(url).await.expect("connect");
    repo.migrate().await.expect("migrate");

    let project = ProjectId::new("proj-1");
    let started_at = fixed_now();
    repo.put_session(&project, started_at)
        .await
        .expect("put session");

    // a second handle on the same database sees the descriptor
    let reopened = SqliteRepository::connect(url).await.expect("reconnect");
    reopened.migrate().await.expect("migrate again");
    assert_eq!(
        reopened.get_session(&project).await.expect("get"),
        Some(started_at)
    );

    reopened.clear_session(&project).await.expect("clear");
    assert_eq!(repo.get_session(&project).await.expect("get"), None);
}

#[tokio::test]
async fn sqlite_progress_values_upsert_by_key() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_progress?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get_progress("setup").await.expect("get"), None);

    repo.put_progress("setup", 30.0).await.expect("put");
    repo.put_progress("setup", 85.5).await.expect("overwrite");
    repo.put_progress("review", 10.0).await.expect("put other");

    assert_eq!(repo.get_progress("setup").await.expect("get"), Some(85.5));
    assert_eq!(repo.get_progress("review").await.expect("get"), Some(10.0));
}
