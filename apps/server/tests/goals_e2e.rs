//! Runs the server on an ephemeral port and drives it through the HTTP
//! client and the session goal collection.

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::{tempdir, TempDir};

use goal_planner_connect::GoalApiClient;
use goal_planner_core::goals::{GoalDraft, GoalService, GoalServiceTrait};
use goal_planner_core::Error;
use goal_planner_server::{api::app_router, build_state, config::Config};

async fn spawn_server() -> (SocketAddr, TempDir) {
    let tmp = tempdir().unwrap();
    let config = Config::with_db_path(tmp.path().join("goals.db").to_string_lossy());
    let state = build_state(&config).await.unwrap();
    let router = app_router(state, &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (addr, tmp)
}

fn session(addr: SocketAddr) -> Arc<GoalService> {
    let client = GoalApiClient::new(&format!("http://{addr}")).unwrap();
    Arc::new(GoalService::new(Arc::new(client)))
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn collection_round_trip_over_http() {
    let (addr, _tmp) = spawn_server().await;
    let goals = session(addr);

    let car = goals
        .add(GoalDraft::new("Car", "Travel", "8000", "2026-01-01"), today())
        .await
        .unwrap();
    assert_eq!(car.saved_amount, Decimal::ZERO);
    assert_eq!(car.created_at, today());
    assert_eq!(goals.list(), vec![car.clone()]);

    let deposited = goals.deposit(&car.id, dec!(250.50)).await.unwrap();
    assert_eq!(deposited.saved_amount, dec!(250.50));
    assert_eq!(deposited.target_amount, car.target_amount);
    assert_eq!(goals.get(&car.id).unwrap(), deposited);

    let other = session(addr);
    assert_eq!(other.refresh().await.unwrap(), 1);
    assert_eq!(other.list(), goals.list());

    goals.remove(&car.id).await.unwrap();
    assert!(goals.list().is_empty());
    // Removing again, and from a session whose cache is stale, both succeed.
    goals.remove(&car.id).await.unwrap();
    other.remove(&car.id).await.unwrap();
    assert!(other.list().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn validation_and_not_found_surface_from_the_store() {
    let (addr, _tmp) = spawn_server().await;
    let goals = session(addr);

    let result = goals
        .add(GoalDraft::new("", "Travel", "100", "2026-01-01"), today())
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));

    let result = goals.deposit("missing", dec!(10)).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
    assert!(goals.list().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_deposits_are_not_lost() {
    let (addr, _tmp) = spawn_server().await;
    let first = session(addr);
    let second = session(addr);

    let goal = first
        .add(GoalDraft::new("House", "Home", "10000", "2030-01-01"), today())
        .await
        .unwrap();
    second.refresh().await.unwrap();

    let mut tasks = Vec::new();
    for (goals, amount) in [(&first, dec!(10)), (&second, dec!(3))] {
        for _ in 0..4 {
            let goals = goals.clone();
            let id = goal.id.clone();
            tasks.push(tokio::spawn(async move { goals.deposit(&id, amount).await }));
        }
    }
    for outcome in join_all(tasks).await {
        outcome.unwrap().unwrap();
    }

    first.refresh().await.unwrap();
    let stored = first.get(&goal.id).unwrap();
    assert_eq!(stored.saved_amount, dec!(52));
    assert_eq!(stored.version, goal.version + 8);
}

#[tokio::test]
async fn unreachable_store_is_a_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let goals = session(addr);
    assert!(matches!(goals.refresh().await, Err(Error::Transport(_))));
    assert!(goals.list().is_empty());
}
