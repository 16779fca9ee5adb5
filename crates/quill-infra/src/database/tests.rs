use std::collections::BTreeMap;

use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
use uuid::Uuid;

use quill_core::domain::{Post, PostChanges, User};
use quill_core::ports::{BaseRepository, PostStore, UserRepository};

use crate::database::entity::{post, user};
use crate::database::postgres_repo::{PostgresPostStore, PostgresUserRepository};

fn post_model(user_id: Uuid, title: &str) -> post::Model {
    let now = chrono::Utc::now();
    post::Model {
        id: Uuid::new_v4(),
        user_id,
        title: title.to_owned(),
        content: "Content".to_owned(),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn exec_result(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let model = post_model(Uuid::new_v4(), "Test Post");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model.clone()]])
        .into_connection();

    let store = PostgresPostStore::new(db);
    let post: Post = store.find_by_id(model.id).await.unwrap().unwrap();

    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, model.id);
    assert_eq!(post.user_id, model.user_id);
}

#[tokio::test]
async fn test_find_missing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let store = PostgresPostStore::new(db);

    assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_insert_post_returns_id() {
    let model = post_model(Uuid::new_v4(), "Hello");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model.clone()]])
        .into_connection();

    let store = PostgresPostStore::new(db);
    let post: Post = model.clone().into();

    assert_eq!(store.insert(post).await.unwrap(), model.id);
}

#[tokio::test]
async fn test_update_reports_affected_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_result(1), exec_result(0)])
        .into_connection();

    let store = PostgresPostStore::new(db);
    let changes = PostChanges::new("t", "c");

    assert!(store.update(Uuid::new_v4(), changes.clone()).await.unwrap());
    assert!(!store.update(Uuid::new_v4(), changes).await.unwrap());
}

#[tokio::test]
async fn test_update_writes_only_mutable_columns() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_result(1)])
        .into_connection();

    let store = PostgresPostStore::new(db);
    let id = Uuid::new_v4();
    assert!(store.update(id, PostChanges::new("New", "Body")).await.unwrap());

    let log = store.db.into_transaction_log();
    assert_eq!(log.len(), 1);
    let statements = log[0].statements();
    assert_eq!(statements.len(), 1);

    let sql = &statements[0].sql;
    assert!(sql.starts_with(
        r#"UPDATE "posts" SET "title" = $1, "content" = $2, "updated_at" = $3 WHERE"#
    ));
    assert!(sql.ends_with(r#""id" = $4"#));
    assert!(!sql.contains("user_id"));
    assert!(!sql.contains("created_at"));

    let values = &statements[0].values.as_ref().unwrap().0;
    assert_eq!(values[0], Value::String(Some(Box::new("New".to_owned()))));
    assert_eq!(values[1], Value::String(Some(Box::new("Body".to_owned()))));
    assert_eq!(values[3], Value::Uuid(Some(Box::new(id))));
}

#[tokio::test]
async fn test_delete_reports_affected_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_result(1), exec_result(0)])
        .into_connection();

    let store = PostgresPostStore::new(db);

    assert!(store.delete_by_id(Uuid::new_v4()).await.unwrap());
    assert!(!store.delete_by_id(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn test_paginate_returns_total() {
    let owner = Uuid::new_v4();
    let models: Vec<post::Model> = (0..5).map(|i| post_model(owner, &format!("p{i}"))).collect();
    let count_row = BTreeMap::from([("num_items", Value::BigInt(Some(25)))]);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row]])
        .append_query_results([models])
        .into_connection();

    let store = PostgresPostStore::new(db);
    let (page, total) = store.paginate(20, 20).await.unwrap();

    assert_eq!(total, 25);
    assert_eq!(page.len(), 5);
    assert_eq!(page[0].title, "p0");
}

#[tokio::test]
async fn test_paginate_past_the_end_skips_the_page_query() {
    let count_row = BTreeMap::from([("num_items", Value::BigInt(Some(1)))]);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row]])
        .into_connection();

    let store = PostgresPostStore::new(db);
    let (page, total) = store.paginate(u64::MAX - 19, 20).await.unwrap();

    assert!(page.is_empty());
    assert_eq!(total, 1);
    assert_eq!(store.db.into_transaction_log().len(), 1);
}

#[tokio::test]
async fn test_find_user_by_email() {
    let now = chrono::Utc::now();
    let model = user::Model {
        id: Uuid::new_v4(),
        name: "Test User".to_owned(),
        email: "test@gmail.com".to_owned(),
        password_hash: "hash".to_owned(),
        created_at: now.into(),
        updated_at: now.into(),
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model.clone()]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let found: User = repo.find_by_email(" Test@Gmail.COM").await.unwrap().unwrap();

    assert_eq!(found.id, model.id);
    assert_eq!(found.name, "Test User");

    let log = repo.db.into_transaction_log();
    let values = &log[0].statements()[0].values.as_ref().unwrap().0;
    assert_eq!(
        values[0],
        Value::String(Some(Box::new("test@gmail.com".to_owned())))
    );
}

#[tokio::test]
async fn test_delete_missing_user_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_result(0)])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let result = BaseRepository::<User, Uuid>::delete(&repo, Uuid::new_v4()).await;

    assert!(matches!(result, Err(quill_core::error::RepoError::NotFound)));
}
