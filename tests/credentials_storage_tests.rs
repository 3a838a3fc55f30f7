use std::time::Duration;

use passvault::{CredentialsStorage, NewCredential, VaultError};
use tempfile::TempDir;

async fn open_store() -> (TempDir, CredentialsStorage) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let storage = CredentialsStorage::connect(&dir.path().join("vault.sqlite"))
        .await
        .expect("failed to open store");
    (dir, storage)
}

fn sample(username: &str) -> NewCredential {
    NewCredential {
        username: username.to_string(),
        password: "password1".to_string(),
        description: Some(format!("{username} mail account")),
        tags: Some(vec![
            "mail".to_string(),
            "personal".to_string(),
            "mail".to_string(),
        ]),
    }
}

#[tokio::test]
async fn inserted_credential_reads_back_unchanged() {
    let (_dir, storage) = open_store().await;
    let input = sample("alice");

    let id = storage.insert(&input).await.expect("insert failed");
    let stored = storage.get_by_id(id).await.expect("fetch failed");

    assert_eq!(stored.id, id);
    assert_eq!(stored.username, input.username);
    assert_eq!(stored.password, input.password);
    assert_eq!(Some(stored.description.clone()), input.description);
    assert_eq!(Some(stored.tags.clone()), input.tags);
    assert_eq!(stored.created_at, stored.updated_at);
}

#[tokio::test]
async fn missing_optional_fields_come_back_empty() {
    let (_dir, storage) = open_store().await;
    let input = NewCredential {
        username: "bob".to_string(),
        password: "hunter2hunter2".to_string(),
        description: None,
        tags: None,
    };

    let id = storage.insert(&input).await.expect("insert failed");
    let stored = storage.get_by_id(id).await.expect("fetch failed");

    assert_eq!(stored.description, "");
    assert!(stored.tags.is_empty());
}

#[tokio::test]
async fn null_and_empty_tag_columns_decode_to_empty_lists() {
    let (_dir, storage) = open_store().await;
    for tags in [None, Some(""), Some("null")] {
        sqlx::query(
            "INSERT INTO credentials (username, password, created_at, updated_at, tags)
             VALUES ('legacy', 'password1', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z', ?)",
        )
        .bind(tags)
        .execute(storage.pool())
        .await
        .expect("raw insert failed");
    }

    let all = storage.list_all().await.expect("list failed");
    assert_eq!(all.len(), 3);
    for cred in all {
        assert!(cred.tags.is_empty());
        assert_eq!(cred.description, "");
    }
}

#[tokio::test]
async fn list_is_empty_then_newest_first() {
    let (_dir, storage) = open_store().await;
    assert!(storage.list_all().await.expect("list failed").is_empty());

    let mut ids = Vec::new();
    for name in ["first", "second", "third"] {
        ids.push(storage.insert(&sample(name)).await.expect("insert failed"));
        std::thread::sleep(Duration::from_millis(2));
    }

    let listed: Vec<i64> = storage
        .list_all()
        .await
        .expect("list failed")
        .into_iter()
        .map(|c| c.id)
        .collect();
    ids.reverse();
    assert_eq!(listed, ids);
}

#[tokio::test]
async fn update_refreshes_updated_at_only() {
    let (_dir, storage) = open_store().await;
    let id = storage.insert(&sample("alice")).await.expect("insert failed");
    let before = storage.get_by_id(id).await.expect("fetch failed");
    std::thread::sleep(Duration::from_millis(2));

    let changed = NewCredential {
        username: "alice2".to_string(),
        password: "new-password".to_string(),
        description: Some("rotated".to_string()),
        tags: Some(vec!["work".to_string()]),
    };
    storage.update_by_id(id, &changed).await.expect("update failed");
    let after = storage.get_by_id(id).await.expect("fetch failed");

    assert_eq!(after.id, id);
    assert_eq!(after.username, "alice2");
    assert_eq!(after.password, "new-password");
    assert_eq!(after.description, "rotated");
    assert_eq!(after.tags, vec!["work".to_string()]);
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);
}

#[tokio::test]
async fn update_of_missing_id_is_not_found_and_changes_nothing() {
    let (_dir, storage) = open_store().await;
    let id = storage.insert(&sample("alice")).await.expect("insert failed");
    let before = storage.list_all().await.expect("list failed");

    let result = storage.update_by_id(id + 100, &sample("mallory")).await;
    assert!(matches!(result, Err(VaultError::NotFound)));
    assert_eq!(storage.list_all().await.expect("list failed"), before);
}

#[tokio::test]
async fn delete_is_physical() {
    let (_dir, storage) = open_store().await;
    let id = storage.insert(&sample("alice")).await.expect("insert failed");

    storage.delete_by_id(id).await.expect("delete failed");
    assert!(matches!(
        storage.get_by_id(id).await,
        Err(VaultError::NotFound)
    ));
    assert!(matches!(
        storage.delete_by_id(id).await,
        Err(VaultError::NotFound)
    ));
}

#[tokio::test]
async fn records_survive_reopening_the_file() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("vault.sqlite");

    let storage = CredentialsStorage::connect(&path).await.expect("open failed");
    let id = storage.insert(&sample("alice")).await.expect("insert failed");
    storage.close().await;

    let reopened = CredentialsStorage::connect(&path).await.expect("reopen failed");
    let stored = reopened.get_by_id(id).await.expect("fetch failed");
    assert_eq!(stored.username, "alice");
}

#[tokio::test]
async fn connect_fails_when_the_file_cannot_be_created() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("missing-dir").join("vault.sqlite");

    let result = CredentialsStorage::connect(&path).await;
    assert!(matches!(result, Err(VaultError::DatabaseError(_))));
}
