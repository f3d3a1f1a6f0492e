//! End-to-end tests for the hierarchy store over an in-memory database.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use sqlx::SqlitePool;

use treestore_core::error::ErrorKind;
use treestore_database::repositories::{FileRepository, FolderRepository};
use treestore_database::{DatabasePool, migration};
use treestore_entity::file::File;
use treestore_entity::folder::Folder;
use treestore_service::FileSystem;

struct TestStore {
    fs: FileSystem,
    pool: SqlitePool,
}

impl TestStore {
    async fn new() -> Self {
        let db = DatabasePool::connect_in_memory()
            .await
            .expect("Failed to open in-memory database");
        migration::run_migrations(db.pool())
            .await
            .expect("Failed to run migrations");

        let pool = db.into_pool();
        let fs = FileSystem::new(
            Arc::new(FolderRepository::new(pool.clone())),
            Arc::new(FileRepository::new(pool.clone())),
        );
        Self { fs, pool }
    }

    async fn folder_rows(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM folders")
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count folder rows")
    }

    async fn file_rows(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM files")
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count file rows")
    }
}

fn folder(name: &str, path: &str) -> Folder {
    let mut folder = Folder::new(name);
    folder.path = Some(path.to_string());
    folder.created_time = Some(Utc::now());
    folder
}

fn file(name: &str, size: i64) -> File {
    let mut file = File::new(name, size);
    file.created_time = Some(Utc::now());
    file
}

#[tokio::test]
async fn test_create_root_folder_assigns_id_and_round_trips() {
    let store = TestStore::new().await;

    let mut docs = folder("docs", "/docs");
    docs.created_time = Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());

    let created = store.fs.create_root_folder(docs).await.unwrap();
    let id = created.id.expect("id assigned on persist");

    let loaded = store.fs.load_folder(id).await.unwrap().expect("folder exists");
    assert_eq!(loaded.name, "docs");
    assert_eq!(loaded.path(), Some("/docs"));
    assert_eq!(loaded.created_time, created.created_time);
    assert!(loaded.is_root());
}

#[tokio::test]
async fn test_duplicate_root_path_fails_without_insert() {
    let store = TestStore::new().await;
    store
        .fs
        .create_root_folder(folder("docs", "/docs"))
        .await
        .unwrap();

    let err = store
        .fs
        .create_root_folder(folder("other", "/docs"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(
        err.message
            .contains("Folder with a path /docs has been already created")
    );
    assert_eq!(store.folder_rows().await, 1);
}

#[tokio::test]
async fn test_validation_reports_every_violation_at_once() {
    let store = TestStore::new().await;

    let err = store
        .fs
        .create_root_folder(Folder::new(""))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(err.message.contains("Folder name not specified"));
    assert!(err.message.contains("Path not specified"));
    assert!(err.message.contains("Created time not specified"));
    assert_eq!(store.folder_rows().await, 0);
}

#[tokio::test]
async fn test_create_file_persists_transient_parent() {
    let store = TestStore::new().await;

    let created = store
        .fs
        .create_file(file("report.pdf", 2048), folder("inbox", "/inbox"))
        .await
        .unwrap();

    assert!(created.is_persisted());
    assert_eq!(created.path(), Some("/inbox/report.pdf".to_string()));

    let parent_id = created
        .parent
        .as_ref()
        .and_then(|p| p.id)
        .expect("parent persisted as a side effect");
    let parent = store.fs.load_folder(parent_id).await.unwrap();
    assert_eq!(parent.unwrap().name, "inbox");
}

#[tokio::test]
async fn test_create_folder_materializes_ancestor_chain() {
    let store = TestStore::new().await;

    let mut parent = folder("b", "/a/b");
    parent.parent = Some(Box::new(folder("a", "/a")));
    let child = folder("c", "/a/b/c");

    let created = store.fs.create_folder(child, parent).await.unwrap();

    assert_eq!(store.folder_rows().await, 3);
    let loaded = store
        .fs
        .load_folder(created.id.unwrap())
        .await
        .unwrap()
        .unwrap();
    let chain_parent = loaded.parent.as_deref().expect("parent hydrated");
    let chain_root = chain_parent.parent.as_deref().expect("grandparent hydrated");
    assert_eq!(chain_parent.path(), Some("/a/b"));
    assert_eq!(chain_root.path(), Some("/a"));
    assert!(chain_root.is_root());
}

#[tokio::test]
async fn test_folder_counts_on_two_level_tree() {
    let store = TestStore::new().await;

    let root = store.fs.create_root_folder(folder("r", "/r")).await.unwrap();
    let c1 = store
        .fs
        .create_folder(folder("c1", "/r/c1"), root.clone())
        .await
        .unwrap();
    let c2 = store
        .fs
        .create_folder(folder("c2", "/r/c2"), root.clone())
        .await
        .unwrap();
    for (name, parent) in [("g1", &c1), ("g2", &c1), ("g3", &c2)] {
        let path = format!("{}/{name}", parent.path().unwrap());
        store
            .fs
            .create_folder(folder(name, &path), parent.clone())
            .await
            .unwrap();
    }

    assert_eq!(store.fs.folder_count(&root).await.unwrap(), 2);
    assert_eq!(store.fs.all_sub_folder_count(&root).await.unwrap(), 5);
    assert_eq!(store.fs.all_sub_folder_count(&c1).await.unwrap(), 2);
}

#[tokio::test]
async fn test_directory_size_sums_whole_subtree() {
    let store = TestStore::new().await;

    let root = store.fs.create_root_folder(folder("r", "/r")).await.unwrap();
    let child = store
        .fs
        .create_folder(folder("c", "/r/c"), root.clone())
        .await
        .unwrap();
    let grandchild = store
        .fs
        .create_folder(folder("g", "/r/c/g"), child.clone())
        .await
        .unwrap();

    store.fs.create_file(file("a", 10), root.clone()).await.unwrap();
    store.fs.create_file(file("b", 20), child.clone()).await.unwrap();
    store
        .fs
        .create_file(file("c", 30), grandchild.clone())
        .await
        .unwrap();

    assert_eq!(store.fs.total_file_size_in_folder(&root).await.unwrap(), 10);
    assert_eq!(store.fs.directory_size(&root).await.unwrap(), 60);
    assert_eq!(store.fs.directory_size(&child).await.unwrap(), 50);
    assert_eq!(store.fs.file_count(&root).await.unwrap(), 1);
}

#[tokio::test]
async fn test_update_file_without_id_fails_precondition() {
    let store = TestStore::new().await;

    let err = store.fs.update_file(file("orphan.txt", 1)).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Precondition);
    assert_eq!(store.file_rows().await, 0);
}

#[tokio::test]
async fn test_update_file_rejects_colliding_path() {
    let store = TestStore::new().await;

    let root = store.fs.create_root_folder(folder("r", "/r")).await.unwrap();
    store.fs.create_file(file("a.txt", 1), root.clone()).await.unwrap();
    let second = store
        .fs
        .create_file(file("b.txt", 2), root.clone())
        .await
        .unwrap();

    let err = store.fs.rename_file(second, "a.txt").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(err.message.contains("same path already exists"));
}

#[tokio::test]
async fn test_rename_file_updates_path_and_stamps_modified_time() {
    let store = TestStore::new().await;

    let root = store.fs.create_root_folder(folder("r", "/r")).await.unwrap();
    let created = store
        .fs
        .create_file(file("old.txt", 5), root.clone())
        .await
        .unwrap();
    assert!(created.modified_time.is_none());

    let renamed = store.fs.rename_file(created, "new.txt").await.unwrap();
    assert!(renamed.modified_time.is_some());

    let loaded = store
        .fs
        .load_file(renamed.id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.name, "new.txt");
    assert_eq!(loaded.path(), Some("/r/new.txt".to_string()));
    assert!(loaded.modified_time.is_some());
}

#[tokio::test]
async fn test_rename_root_folder_updates_name_and_path() {
    let store = TestStore::new().await;

    let root = store.fs.create_root_folder(folder("docs", "/docs")).await.unwrap();
    let id = root.id.unwrap();

    store.fs.rename_folder(root, "archive").await.unwrap();

    let loaded = store.fs.load_folder(id).await.unwrap().unwrap();
    assert_eq!(loaded.name, "archive");
    assert_eq!(loaded.path(), Some("/archive"));
}

#[tokio::test]
async fn test_rename_child_folder_uses_parent_path() {
    let store = TestStore::new().await;

    let root = store.fs.create_root_folder(folder("r", "/r")).await.unwrap();
    let child = store
        .fs
        .create_folder(folder("c1", "/r/c1"), root)
        .await
        .unwrap();
    let id = child.id.unwrap();

    // Rename the hydrated entity the way a dispatcher would.
    let loaded = store.fs.load_folder(id).await.unwrap().unwrap();
    store.fs.rename_folder(loaded, "c9").await.unwrap();

    let reloaded = store.fs.load_folder(id).await.unwrap().unwrap();
    assert_eq!(reloaded.name, "c9");
    assert_eq!(reloaded.path(), Some("/r/c9"));
}

#[tokio::test]
async fn test_delete_without_id_is_a_successful_noop() {
    let store = TestStore::new().await;

    store.fs.delete_folder(&folder("x", "/x")).await.unwrap();
    store.fs.delete_file(&file("x.txt", 1)).await.unwrap();
}

#[tokio::test]
async fn test_delete_folder_cascades_through_schema() {
    let store = TestStore::new().await;

    let root = store.fs.create_root_folder(folder("r", "/r")).await.unwrap();
    let child = store
        .fs
        .create_folder(folder("c", "/r/c"), root.clone())
        .await
        .unwrap();
    let leaf = store
        .fs
        .create_file(file("f.txt", 7), child.clone())
        .await
        .unwrap();

    store.fs.delete_folder(&root).await.unwrap();

    assert!(store.fs.load_folder(child.id.unwrap()).await.unwrap().is_none());
    assert!(store.fs.load_file(leaf.id.unwrap()).await.unwrap().is_none());
    assert_eq!(store.folder_rows().await, 0);
    assert_eq!(store.file_rows().await, 0);
}

#[tokio::test]
async fn test_load_absent_ids_return_none() {
    let store = TestStore::new().await;

    assert!(store.fs.load_folder(9999).await.unwrap().is_none());
    assert!(store.fs.load_file(9999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_children_are_hydrated_with_ancestor_chains() {
    let store = TestStore::new().await;

    let root = store.fs.create_root_folder(folder("r", "/r")).await.unwrap();
    store
        .fs
        .create_folder(folder("c1", "/r/c1"), root.clone())
        .await
        .unwrap();
    store.fs.create_file(file("f.txt", 3), root.clone()).await.unwrap();

    let children = store.fs.folders(&root).await.unwrap();
    assert_eq!(children.len(), 1);
    let parent = children[0].parent.as_deref().expect("ancestor chain hydrated");
    assert_eq!(parent.path(), Some("/r"));

    let files = store.fs.files(&root).await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path(), Some("/r/f.txt".to_string()));

    // A transient folder observes an empty subtree.
    assert!(store.fs.folders(&folder("t", "/t")).await.unwrap().is_empty());
    assert_eq!(store.fs.folder_count(&folder("t", "/t")).await.unwrap(), 0);
}
