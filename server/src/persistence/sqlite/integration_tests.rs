use std::sync::Arc;

use scoring::{GameCatalog, MAX_SAFE_SCORE};

use super::{Database, SqliteScoreStore};
use crate::leaderboard::{LeaderboardError, LeaderboardService, DEFAULT_OVERVIEW_LIMIT};
use crate::persistence::traits::ScoreStore;
use crate::persistence::{LegacyScoreRow, ScoreRecord};

async fn in_memory_service() -> (Database, LeaderboardService<SqliteScoreStore>) {
    let db = Database::new_in_memory().await.unwrap();
    let store = SqliteScoreStore::new(db.pool().clone());
    let svc = LeaderboardService::new(store, Arc::new(GameCatalog::builtin()));
    (db, svc)
}

#[tokio::test]
async fn submit_keeps_best_and_reports_existing() {
    let (_db, svc) = in_memory_service().await;

    let first = svc.submit("pump-clicker", "Bob", 500.0).await.unwrap();
    assert!(first.is_new_best);
    let second = svc.submit("pump-clicker", "Bob", 300.0).await.unwrap();
    assert!(!second.is_new_best);
    assert_eq!(second.previous_best, Some(500));

    let board = svc.query("pump-clicker", 10).await.unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].raw_stored_value, 500);
    assert_eq!(board[0].display_score, "500");
}

#[tokio::test]
async fn timed_level_round_trip_through_sqlite() {
    let (_db, svc) = in_memory_service().await;
    svc.submit("plankton-heist-level1", "Amy", 42.0).await.unwrap();
    svc.submit("plankton-heist-level1", "Bob", 37.0).await.unwrap();
    svc.submit("plankton-heist-level1", "Cat", 58.0).await.unwrap();

    let board = svc.query("plankton-heist-level1", 10).await.unwrap();
    let shown: Vec<(&str, &str)> = board
        .iter()
        .map(|e| (e.player.as_str(), e.display_score.as_str()))
        .collect();
    assert_eq!(shown, vec![("Bob", "37s"), ("Amy", "42s"), ("Cat", "58s")]);
    assert_eq!(board[1].raw_stored_value, 9958);
}

#[tokio::test]
async fn query_returns_min_of_limit_and_records() {
    let (_db, svc) = in_memory_service().await;
    for i in 0..120u32 {
        svc.submit("pump-clicker", &format!("player-{i}"), f64::from(i))
            .await
            .unwrap();
    }

    let wide = svc.query("pump-clicker", 150).await.unwrap();
    assert_eq!(wide.len(), 120);
    assert_eq!(wide[0].player, "player-119");
    assert_eq!(wide[119].rank, 120);

    assert_eq!(svc.query("pump-clicker", 110).await.unwrap().len(), 110);
}

#[tokio::test]
async fn clamped_score_persists_at_ceiling() {
    let (_db, svc) = in_memory_service().await;
    let submission = svc
        .submit("pump-clicker", "Whale", MAX_SAFE_SCORE as f64 + 1000.0)
        .await
        .unwrap();
    assert!(submission.clamped.is_some());

    let rows = svc.store().find("pump-clicker", "Whale").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value, MAX_SAFE_SCORE);
}

#[tokio::test]
async fn delete_player_is_idempotent() {
    let (_db, svc) = in_memory_service().await;
    assert_eq!(svc.delete_player("krusty-tycoon", "Ghost").await.unwrap(), 0);

    svc.submit("krusty-tycoon", "Plankton", 1.0).await.unwrap();
    assert_eq!(svc.delete_player("krusty-tycoon", "Plankton").await.unwrap(), 1);
    assert!(svc.query("krusty-tycoon", 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn submit_heals_preexisting_duplicates() {
    let (_db, svc) = in_memory_service().await;
    svc.store()
        .insert(&ScoreRecord::new("flappy-cock", "Gary", 20))
        .await
        .unwrap();
    svc.store()
        .insert(&ScoreRecord::new("flappy-cock", "Gary", 35))
        .await
        .unwrap();

    let kept = svc.submit("flappy-cock", "Gary", 30.0).await.unwrap();
    assert!(!kept.is_new_best);
    assert_eq!(svc.store().find("flappy-cock", "Gary").await.unwrap().len(), 2);

    let replaced = svc.submit("flappy-cock", "Gary", 36.0).await.unwrap();
    assert!(replaced.is_new_best);
    assert_eq!(replaced.previous_best, Some(35));
    let rows = svc.store().find("flappy-cock", "Gary").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value, 36);
}

#[tokio::test]
async fn overview_covers_catalog() {
    let (_db, svc) = in_memory_service().await;
    svc.submit("bikini-adventure", "Pearl", 12.0).await.unwrap();

    let boards = svc.query_all(DEFAULT_OVERVIEW_LIMIT).await.unwrap();
    assert_eq!(boards.len(), svc.catalog().len());
    assert_eq!(boards["bikini-adventure"][0].player, "Pearl");
}

#[tokio::test]
async fn closed_pool_surfaces_store_unavailable() {
    let (db, svc) = in_memory_service().await;
    db.close().await;

    let result = svc.submit("pump-clicker", "Bob", 1.0).await;
    assert!(matches!(result, Err(LeaderboardError::StoreUnavailable(_))));

    let boards = svc.query_all(DEFAULT_OVERVIEW_LIMIT).await.unwrap();
    assert!(boards.is_empty());
}

#[tokio::test]
async fn legacy_import_into_sqlite() {
    let (_db, svc) = in_memory_service().await;
    let rows = vec![
        LegacyScoreRow {
            game_name: "house-hoarder".to_string(),
            player_name: "Sandy".to_string(),
            score: 77.0,
        },
        LegacyScoreRow {
            game_name: "house-hoarder".to_string(),
            player_name: "Sandy".to_string(),
            score: 12.0,
        },
    ];
    let report = svc.import_legacy(&rows).await.unwrap();
    assert_eq!(report.inserted, 1);
    assert_eq!(report.kept, 1);

    let best = svc.best_for("house-hoarder", "Sandy").await.unwrap().unwrap();
    assert_eq!(best.raw_stored_value, 77);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_converge_on_maximum() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(&dir.path().join("scores.db")).await.unwrap();
    let store = SqliteScoreStore::new(db.pool().clone());
    let svc = Arc::new(LeaderboardService::new(store, Arc::new(GameCatalog::builtin())));

    // Interleave high and low submissions so late low scores race early highs.
    let scores: Vec<u32> = (1..=40).map(|i| if i % 2 == 0 { i * 10 } else { 400 - i }).collect();
    let expected = *scores.iter().max().unwrap();

    let mut handles = Vec::new();
    for score in scores {
        let svc = Arc::clone(&svc);
        handles.push(tokio::spawn(async move {
            svc.submit("pump-clicker", "Racer", f64::from(score)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let rows = svc.store().find("pump-clicker", "Racer").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value, u64::from(expected));

    db.close().await;
}
