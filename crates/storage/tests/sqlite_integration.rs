use quest_core::model::{Course, Lives, User, default_catalog};
use quest_core::time::fixed_today;
use storage::records::{load_json, save_json};
use storage::sqlite::SqliteRepository;
use storage::{KeyValueStore, Storage, StoreKey};

#[tokio::test]
async fn sqlite_roundtrip_persists_all_slots() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    save_json(&repo, StoreKey::User, &User::demo()).await.unwrap();
    save_json(&repo, StoreKey::Courses, default_catalog().as_slice())
        .await
        .unwrap();
    save_json(&repo, StoreKey::Lives, &Lives::new(1, fixed_today()))
        .await
        .unwrap();

    let user: User = load_json(&repo, StoreKey::User).await.unwrap().unwrap();
    assert_eq!(user, User::demo());

    let courses: Vec<Course> = load_json(&repo, StoreKey::Courses).await.unwrap().unwrap();
    assert_eq!(courses, default_catalog());

    let lives: Lives = load_json(&repo, StoreKey::Lives).await.unwrap().unwrap();
    assert_eq!(lives.count(), 1);
    assert_eq!(lives.last_reset(), fixed_today());
}

#[tokio::test]
async fn sqlite_set_overwrites_and_remove_clears() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_overwrite?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.set(StoreKey::Lives, "first".into()).await.unwrap();
    repo.set(StoreKey::Lives, "second".into()).await.unwrap();
    assert_eq!(
        repo.get(StoreKey::Lives).await.unwrap().as_deref(),
        Some("second")
    );

    repo.remove(StoreKey::Lives).await.unwrap();
    assert_eq!(repo.get(StoreKey::Lives).await.unwrap(), None);

    // removing an empty slot is fine
    repo.remove(StoreKey::Lives).await.unwrap();
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let url = "sqlite:file:memdb_migrate_twice?mode=memory&cache=shared";
    let repo = SqliteRepository::connect(url).await.expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.set(StoreKey::User, "{}".into()).await.unwrap();
    repo.migrate().await.expect("second migrate");

    assert!(repo.get(StoreKey::User).await.unwrap().is_some());
}

#[tokio::test]
async fn storage_aggregate_uses_sqlite_backend() {
    let storage = Storage::sqlite("sqlite:file:memdb_aggregate?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage
        .kv
        .set(StoreKey::Courses, "[]".into())
        .await
        .unwrap();
    assert_eq!(
        storage.kv.get(StoreKey::Courses).await.unwrap().as_deref(),
        Some("[]")
    );
}
