//! Common test utilities

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use follow_notifications::clock::FixedClock;
use follow_notifications::domain::PublicProfile;
use follow_notifications::store::{
    MemoryFollowStore, MemoryNotificationStore, MemoryProfileProjector,
};
use follow_notifications::NewFollowerHandler;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};

const SCHEMA: &str = include_str!("../../migrations/0001_follow_notifications.sql");

static USER_SEQ: AtomicU64 = AtomicU64::new(0);

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap()
}

/// Connect and apply the schema, or `None` when no database is configured
pub async fn setup_test_db() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL not set, skipping PostgreSQL test");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    pool.execute(SCHEMA).await.expect("Failed to apply schema");

    Some(pool)
}

/// Insert a user with a unique username, returning its id
pub async fn create_user(pool: &PgPool, name: &str) -> i64 {
    let seq = USER_SEQ.fetch_add(1, Ordering::SeqCst);
    let username = format!(
        "{}_{}_{}",
        name.to_lowercase(),
        Utc::now().timestamp_nanos_opt().unwrap_or_default(),
        seq
    );

    sqlx::query_scalar("INSERT INTO users (name, username) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(username)
        .fetch_one(pool)
        .await
        .expect("Failed to seed user")
}

pub async fn create_follow(
    pool: &PgPool,
    follower_id: i64,
    followable_id: i64,
    followable_type: &str,
    created_at: DateTime<Utc>,
) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO follows (follower_id, followable_id, followable_type, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(follower_id)
    .bind(followable_id)
    .bind(followable_type)
    .bind(created_at)
    .fetch_one(pool)
    .await
    .expect("Failed to seed follow")
}

pub async fn delete_follow(
    pool: &PgPool,
    follower_id: i64,
    followable_id: i64,
    followable_type: &str,
) {
    sqlx::query(
        "DELETE FROM follows \
         WHERE follower_id = $1 AND followable_id = $2 AND followable_type = $3",
    )
    .bind(follower_id)
    .bind(followable_id)
    .bind(followable_type)
    .execute(pool)
    .await
    .expect("Failed to delete follow");
}

/// In-memory stores wired to one handler
pub struct MemoryEnv {
    pub follows: Arc<MemoryFollowStore>,
    pub notifications: Arc<MemoryNotificationStore>,
    pub profiles: Arc<MemoryProfileProjector>,
    pub clock: Arc<FixedClock>,
    pub handler: NewFollowerHandler,
}

pub async fn memory_env(user_ids: &[i64]) -> MemoryEnv {
    let follows = Arc::new(MemoryFollowStore::new());
    let notifications = Arc::new(MemoryNotificationStore::new());
    let profiles = Arc::new(MemoryProfileProjector::new());
    let clock = Arc::new(FixedClock::new(t0()));

    for id in user_ids {
        profiles
            .insert(PublicProfile::new(
                *id,
                format!("Member {}", id),
                format!("member{}", id),
                Some(format!("https://cdn.example.com/{}/90.png", id)),
                t0(),
            ))
            .await;
    }

    let handler = NewFollowerHandler::new(follows.clone(), notifications.clone(), profiles.clone())
        .with_clock(clock.clone());

    MemoryEnv {
        follows,
        notifications,
        profiles,
        clock,
        handler,
    }
}
