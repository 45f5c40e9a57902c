// Shared test utilities for integration tests
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use fyyur_db::entities::{artist, show, venue};
use fyyur_db::{AppState, Genre, GenreList, State};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait,
    Set,
};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Fresh in-memory SQLite database with the full schema applied.
///
/// The pool is pinned to one connection: every connection to
/// `sqlite::memory:` would otherwise open its own empty database.
pub async fn test_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.expect("failed to open sqlite");
    fyyur_migration::Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");
    db
}

pub fn test_app(db: DatabaseConnection) -> Router {
    fyyur_server::router(Arc::new(AppState { db }))
}

pub fn past() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 5, 21, 21, 30, 0).unwrap()
}

pub fn future() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2099, 4, 1, 20, 0, 0).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub async fn get(app: &Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_raw(
    app: &Router,
    path: &str,
    content_type: &str,
    body: &str,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_search(app: &Router, path: &str, term: &str) -> (StatusCode, Value) {
    let encoded: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("search_term", term)
        .finish();
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(encoded))
        .unwrap();
    send(app, request).await
}

pub async fn seed_venue(db: &DatabaseConnection, name: &str, city: &str, state: State) -> venue::Model {
    venue::ActiveModel {
        name: Set(name.to_string()),
        city: Set(city.to_string()),
        state: Set(state),
        address: Set("1015 Folsom Street".to_string()),
        phone: Set(None),
        image_link: Set(Some(format!("https://images.example.com/{}.jpg", name.len()))),
        facebook_link: Set(None),
        website: Set(None),
        genres: Set(GenreList(vec![Genre::Jazz])),
        seeking_talent: Set(false),
        seeking_description: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to seed venue")
}

pub async fn seed_artist(db: &DatabaseConnection, name: &str) -> artist::Model {
    artist::ActiveModel {
        name: Set(name.to_string()),
        city: Set("San Francisco".to_string()),
        state: Set(State::Ca),
        phone: Set(None),
        genres: Set(GenreList(vec![Genre::RockNRoll])),
        image_link: Set(Some("https://images.example.com/artist.jpg".to_string())),
        facebook_link: Set(None),
        website: Set(None),
        seeking_venue: Set(false),
        seeking_description: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to seed artist")
}

pub async fn seed_show(
    db: &DatabaseConnection,
    artist_id: i32,
    venue_id: i32,
    start_time: DateTime<Utc>,
) -> show::Model {
    show::ActiveModel {
        start_time: Set(start_time),
        artist_id: Set(artist_id),
        venue_id: Set(venue_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to seed show")
}

pub async fn venue_count(db: &DatabaseConnection) -> u64 {
    venue::Entity::find().count(db).await.unwrap()
}

pub async fn artist_count(db: &DatabaseConnection) -> u64 {
    artist::Entity::find().count(db).await.unwrap()
}

pub async fn show_count(db: &DatabaseConnection) -> u64 {
    show::Entity::find().count(db).await.unwrap()
}

pub fn venue_payload() -> Value {
    serde_json::json!({
        "name": "The Musical Hop",
        "city": "San Francisco",
        "state": "CA",
        "address": "1015 Folsom Street",
        "phone": "123-123-1234",
        "genres": ["Jazz", "Reggae", "Folk"],
        "facebook_link": "https://www.facebook.com/TheMusicalHop",
        "website": "https://www.themusicalhop.com",
        "image_link": "https://images.example.com/hop.jpg",
        "seeking_talent": true,
        "seeking_description": "We are on the lookout for a local artist to play every two weeks."
    })
}

pub fn artist_payload() -> Value {
    serde_json::json!({
        "name": "Guns N Petals",
        "city": "San Francisco",
        "state": "CA",
        "phone": "326-123-5000",
        "genres": ["Rock n Roll"],
        "website": "https://www.gunsnpetalsband.com",
        "facebook_link": "https://www.facebook.com/GunsNPetals",
        "seeking_venue": true,
        "seeking_description": "Looking for shows to perform at in the San Francisco Bay Area!"
    })
}
