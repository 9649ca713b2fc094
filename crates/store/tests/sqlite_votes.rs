//! On-disk SQLite tests: durability across pools and concurrent voters

use std::sync::Arc;

use chrono::Utc;
use signoff_core::{ApprovalConfiguration, CommandId, Decision, UserId};
use signoff_store::sqlite::{self, SqliteConfigurationStore, SqliteVoteStore};
use signoff_store::{ConfigurationStore, VoteStore};
use tempfile::TempDir;

#[tokio::test]
async fn test_concurrent_votes_from_same_user_store_once() {
    let temp_dir = TempDir::new().unwrap();
    let pool = sqlite::open(temp_dir.path().join("votes.db")).await.unwrap();
    let store = Arc::new(SqliteVoteStore::new(pool));
    store.init().await.unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .record(CommandId(1), UserId(42), i % 2 == 0, Utc::now())
                .await
        }));
    }

    let mut stored = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => stored += 1,
            Err(e) => assert!(e.is_duplicate_vote(), "unexpected error: {e}"),
        }
    }

    assert_eq!(stored, 1);
    assert_eq!(store.list_votes(CommandId(1)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_votes_from_distinct_users_all_stored() {
    let temp_dir = TempDir::new().unwrap();
    let pool = sqlite::open(temp_dir.path().join("votes.db")).await.unwrap();
    let store = Arc::new(SqliteVoteStore::new(pool));
    store.init().await.unwrap();

    let mut handles = Vec::new();
    for voter in 1..=6 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .record(CommandId(2), UserId(voter), true, Utc::now())
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.list_votes(CommandId(2)).await.unwrap().len(), 6);
}

#[tokio::test]
async fn test_state_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("signoff.db");

    {
        let pool = sqlite::open(&db_path).await.unwrap();
        sqlite::init_schema(&pool).await.unwrap();

        let votes = SqliteVoteStore::new(pool.clone());
        votes.record(CommandId(7), UserId(1), true, Utc::now()).await.unwrap();
        votes
            .settle(CommandId(7), Decision::Approved, Utc::now())
            .await
            .unwrap();

        let config = SqliteConfigurationStore::new(pool.clone());
        config
            .save(&ApprovalConfiguration::quorum(3), true)
            .await
            .unwrap();
        pool.close().await;
    }

    let pool = sqlite::open(&db_path).await.unwrap();
    let votes = SqliteVoteStore::new(pool.clone());
    let config = SqliteConfigurationStore::new(pool);

    assert_eq!(votes.list_votes(CommandId(7)).await.unwrap().len(), 1);
    assert_eq!(
        votes.decision(CommandId(7)).await.unwrap(),
        Some(Decision::Approved)
    );
    assert_eq!(config.get_active().await.unwrap().required_approvals, 3);
    assert!(config.maker_checker_enabled().await.unwrap());

    // The unique index is persisted with the table
    let err = votes
        .record(CommandId(7), UserId(1), false, Utc::now())
        .await
        .unwrap_err();
    assert!(err.is_duplicate_vote());
}

#[tokio::test]
async fn test_concurrent_settles_store_one_decision() {
    let temp_dir = TempDir::new().unwrap();
    let pool = sqlite::open(temp_dir.path().join("votes.db")).await.unwrap();
    let store = Arc::new(SqliteVoteStore::new(pool));
    store.init().await.unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = Arc::clone(&store);
        let decision = if i % 2 == 0 {
            Decision::Approved
        } else {
            Decision::Rejected
        };
        handles.push(tokio::spawn(async move {
            store.settle(CommandId(3), decision, Utc::now()).await
        }));
    }

    let mut written = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap() {
            written += 1;
        }
    }

    assert_eq!(written, 1);
    assert!(store.decision(CommandId(3)).await.unwrap().is_some());
}
