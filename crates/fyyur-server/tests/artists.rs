mod common;

use axum::http::StatusCode;
use common::*;
use fyyur_db::State;
use serde_json::json;

#[tokio::test]
async fn test_list_artists_by_name() {
    let db = test_db().await;
    let petals = seed_artist(&db, "Guns N Petals").await;
    let quevedo = seed_artist(&db, "Matt Quevedo").await;
    let wild = seed_artist(&db, "The Wild Sax Band").await;
    let app = test_app(db);

    let (status, body) = get(&app, "/artists").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "id": petals.id, "name": "Guns N Petals" },
            { "id": quevedo.id, "name": "Matt Quevedo" },
            { "id": wild.id, "name": "The Wild Sax Band" },
        ])
    );
}

#[tokio::test]
async fn test_search_artists() {
    let db = test_db().await;
    let petals = seed_artist(&db, "Guns N Petals").await;
    let quevedo = seed_artist(&db, "Matt Quevedo").await;
    let wild = seed_artist(&db, "The Wild Sax Band").await;
    let venue = seed_venue(&db, "The Musical Hop", "San Francisco", State::Ca).await;
    seed_show(&db, wild.id, venue.id, future()).await;
    seed_show(&db, wild.id, venue.id, past()).await;
    let app = test_app(db);

    let (status, body) = post_search(&app, "/artists/search", "A").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"]["count"], 3);
    let ids: Vec<i64> = body["results"]["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![petals.id as i64, quevedo.id as i64, wild.id as i64]);

    let (_, body) = post_search(&app, "/artists/search", "band").await;
    assert_eq!(
        body["results"],
        json!({
            "count": 1,
            "data": [{ "id": wild.id, "name": "The Wild Sax Band", "num_upcoming_shows": 1 }],
        })
    );
}

#[tokio::test]
async fn test_create_then_show_artist() {
    let db = test_db().await;
    let app = test_app(db.clone());

    let (status, body) = post_json(&app, "/artists/create", artist_payload()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["notice"]["message"], "Artist Guns N Petals was successfully listed!");
    let id = body["id"].as_i64().unwrap();

    let (status, detail) = get(&app, &format!("/artists/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["name"], "Guns N Petals");
    assert_eq!(detail["state"], "CA");
    assert_eq!(detail["genres"], json!(["Rock n Roll"]));
    assert_eq!(detail["seeking_venue"], true);
    assert!(detail["image_link"].is_null());
    assert_eq!(detail["past_shows"], json!([]));
    assert_eq!(detail["upcoming_shows_count"], 0);
}

#[tokio::test]
async fn test_create_artist_rejects_unknown_genre() {
    let db = test_db().await;
    let app = test_app(db.clone());

    let mut payload = artist_payload();
    payload["genres"] = json!(["Polka"]);
    let (status, body) = post_json(&app, "/artists/create", payload).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["notice"]["message"], "Artist could not be listed.");
    assert!(body["errors"]["genres"][0]
        .as_str()
        .unwrap()
        .starts_with("'Polka' is not a valid genre."));
    assert_eq!(artist_count(&db).await, 0);
}

#[tokio::test]
async fn test_artist_detail_shows_venues() {
    let db = test_db().await;
    let artist = seed_artist(&db, "Guns N Petals").await;
    let venue = seed_venue(&db, "The Musical Hop", "San Francisco", State::Ca).await;
    seed_show(&db, artist.id, venue.id, past()).await;
    let app = test_app(db);

    let (_, detail) = get(&app, &format!("/artists/{}", artist.id)).await;
    assert_eq!(detail["past_shows_count"], 1);
    assert_eq!(detail["upcoming_shows_count"], 0);
    assert_eq!(detail["past_shows"][0]["venue_id"], venue.id);
    assert_eq!(detail["past_shows"][0]["venue_name"], "The Musical Hop");
    assert_eq!(detail["past_shows"][0]["start_time"], "2019-05-21T21:30:00.000000Z");
}

#[tokio::test]
async fn test_missing_artist_is_404() {
    let app = test_app(test_db().await);
    let (status, body) = get(&app, "/artists/12").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_edit_artist() {
    let db = test_db().await;
    let artist = seed_artist(&db, "Guns N Petals").await;
    let app = test_app(db);
    let path = format!("/artists/{}/edit", artist.id);

    let (status, body) = get(&app, &path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["form"]["name"], "Guns N Petals");
    assert_eq!(body["form"]["genres"], json!(["Rock n Roll"]));

    let mut payload = artist_payload();
    payload["name"] = json!("Guns N Roses");
    payload["genres"] = json!(["Rock n Roll", "Heavy Metal"]);
    payload["seeking_venue"] = json!(false);
    let (status, body) = post_json(&app, &path, payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["redirect_to"], format!("/artists/{}", artist.id));

    let (_, detail) = get(&app, &format!("/artists/{}", artist.id)).await;
    assert_eq!(detail["name"], "Guns N Roses");
    assert_eq!(detail["genres"], json!(["Rock n Roll", "Heavy Metal"]));
    assert_eq!(detail["seeking_venue"], false);
}

#[tokio::test]
async fn test_delete_booked_artist_is_refused() {
    let db = test_db().await;
    let artist = seed_artist(&db, "Guns N Petals").await;
    let venue = seed_venue(&db, "The Musical Hop", "San Francisco", State::Ca).await;
    seed_show(&db, artist.id, venue.id, future()).await;
    let app = test_app(db.clone());

    let (status, body) = delete(&app, &format!("/artists/{}", artist.id)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({ "status": "ERROR" }));
    assert_eq!(artist_count(&db).await, 1);
    assert_eq!(show_count(&db).await, 1);
}

#[tokio::test]
async fn test_delete_unbooked_artist() {
    let db = test_db().await;
    let artist = seed_artist(&db, "Matt Quevedo").await;
    let app = test_app(db.clone());

    let (status, body) = delete(&app, &format!("/artists/{}", artist.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(artist_count(&db).await, 0);
}
