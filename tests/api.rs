mod common;

use axum::http::StatusCode;
use common::{director, movie, rate, send, send_raw, test_app};
use serde_json::json;

#[tokio::test]
async fn health_endpoints() {
    let (app, _) = test_app().await;

    let (status, body) = send(&app, "GET", "/api/v1/movies/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy" }));

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "connected");

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "cinerate");
}

#[tokio::test]
async fn health_reports_unreachable_store() {
    let (app, state) = test_app().await;
    state.db.clone().close().await.unwrap();

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({ "status": "degraded", "database": "unreachable" }));

    let (status, _) = send(&app, "GET", "/api/v1/movies/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_ids_get_the_failure_envelope() {
    let (app, _) = test_app().await;

    for (method, uri) in [
        ("GET", "/api/v1/movies/detail/abc"),
        ("DELETE", "/api/v1/movies/99999999999"),
        ("GET", "/api/v1/movies/abc/ratings"),
        ("GET", "/api/v1/movies/1.5/ratings/average"),
        ("GET", "/api/v1/directors/abc"),
        ("GET", "/api/v1/directors/abc/movies"),
        ("GET", "/api/v1/genres/-"),
    ] {
        let (status, body) = send(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(body["status"], "failure", "{method} {uri}");
        assert_eq!(body["error"]["code"], "invalid_argument", "{method} {uri}");
    }

    let (status, body) =
        send(&app, "POST", "/api/v1/movies/abc/ratings", Some(json!({ "score": 5 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_argument");
}

#[tokio::test]
async fn create_and_fetch_movie() {
    let (app, _) = test_app().await;

    let (status, body) =
        send(&app, "POST", "/api/v1/directors", Some(json!({ "name": "Christopher Nolan" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let director_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/movies",
        Some(json!({
            "title": "Inception",
            "director_id": director_id,
            "release_year": 2010,
            "cast": "Leonardo DiCaprio",
            "genres": ["Action", "Sci-Fi"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["average_rating"], serde_json::Value::Null);
    assert_eq!(body["data"]["ratings_count"], 0);
    let id = body["data"]["id"].as_i64().unwrap();

    for score in [8, 10] {
        let uri = format!("/api/v1/movies/{id}/ratings");
        let (status, body) = send(&app, "POST", &uri, Some(json!({ "score": score }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["score"], score);
        assert!(body["data"]["created_at"].is_string());
    }

    let (status, body) = send(&app, "GET", &format!("/api/v1/movies/detail/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["title"], "Inception");
    assert_eq!(data["director"], json!({ "id": director_id, "name": "Christopher Nolan" }));
    assert_eq!(data["genres"], json!(["Action", "Sci-Fi"]));
    assert_eq!(data["average_rating"], 9.0);
    assert_eq!(data["ratings_count"], 2);

    let (status, body) =
        send(&app, "GET", &format!("/api/v1/movies/{id}/ratings/average"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "movie_id": id, "average_rating": 9.0, "ratings_count": 2 }));
}

#[tokio::test]
async fn missing_references_are_404() {
    let (app, state) = test_app().await;
    let d = director(&state, "Jane Campion").await;

    let (status, body) = send(&app, "GET", "/api/v1/movies/detail/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "failure");
    assert_eq!(body["error"]["code"], "not_found");

    let movie = json!({ "title": "The Piano", "director_id": 999, "release_year": 1993 });
    let (status, _) = send(&app, "POST", "/api/v1/movies", Some(movie)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let movie = json!({
        "title": "The Piano",
        "director_id": d,
        "release_year": 1993,
        "genres": ["Drama", "Period Piece"],
    });
    let (status, body) = send(&app, "POST", "/api/v1/movies", Some(movie)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"]["message"].as_str().unwrap().contains("Period Piece"));

    let (status, _) = send(&app, "POST", "/api/v1/movies/999/ratings", Some(json!({ "score": 5 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/v1/movies/999/ratings", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "PUT", "/api/v1/movies/999", Some(json!({ "title": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/api/v1/movies/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_input_is_400() {
    let (app, state) = test_app().await;
    let d = director(&state, "Jane Campion").await;
    let m = movie(&state, "Bright Star", d, 2009, &["Romance"]).await;
    let ratings_uri = format!("/api/v1/movies/{}/ratings", m.id);

    for score in [0, 11] {
        let (status, body) = send(&app, "POST", &ratings_uri, Some(json!({ "score": score }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "invalid_argument");
    }

    let status = send_raw(&app, "POST", "/api/v1/movies", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/v1/movies", Some(json!({ "title": "No director" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let movie = json!({ "title": "Too Late", "director_id": d, "release_year": 2999 });
    let (status, _) = send(&app, "POST", "/api/v1/movies", Some(movie)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/v1/movies/search?page=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/v1/movies/search?release_year=1700", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/v1/movies/list?page_size=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_uses_and_semantics() {
    let (app, state) = test_app().await;
    let d = director(&state, "Michael Mann").await;
    movie(&state, "Collateral", d, 2004, &["Action"]).await;
    let heat = movie(&state, "Heat", d, 1995, &["Action", "Drama"]).await;

    let (status, body) =
        send(&app, "GET", "/api/v1/movies/search?genres=Action&genres=Drama", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["total_items"], 1);
    assert_eq!(data["page"], 1);
    assert_eq!(data["page_size"], 10);
    assert_eq!(data["items"][0]["id"], heat.id);
    assert!(body.get("pagination").is_none());

    let (_, body) = send(&app, "GET", "/api/v1/movies/search?title=HEA&release_year=1995", None).await;
    assert_eq!(body["data"]["total_items"], 1);
}

#[tokio::test]
async fn list_carries_pagination_block() {
    let (app, state) = test_app().await;
    let d = director(&state, "Hayao Miyazaki").await;
    for (title, year) in [("Porco Rosso", 1992), ("Spirited Away", 2001), ("Ponyo", 2008)] {
        movie(&state, title, d, year, &["Animation"]).await;
    }

    let (status, body) = send(&app, "GET", "/api/v1/movies/list?page=1&page_size=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["pagination"],
        json!({ "current_page": 1, "next_page": 2, "prev_page": null, "total_pages": 2 })
    );

    let (_, body) = send(&app, "GET", "/api/v1/movies?page=2&page_size=2", None).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(
        body["pagination"],
        json!({ "current_page": 2, "next_page": null, "prev_page": 1, "total_pages": 2 })
    );
}

#[tokio::test]
async fn ratings_listing_includes_aggregates() {
    let (app, state) = test_app().await;
    let d = director(&state, "Céline Sciamma").await;
    let rated = movie(&state, "Portrait of a Lady on Fire", d, 2019, &["Romance", "Drama"]).await;
    let unrated = movie(&state, "Petite Maman", d, 2021, &["Drama"]).await;
    rate(&state, rated.id, &[10, 9, 9]).await;

    let (status, body) = send(&app, "GET", "/api/v1/movies/ratings?genres=Drama", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["total_items"], 2);
    assert_eq!(data["total_pages"], 1);
    assert!(data["next_page"].is_null());
    assert!(data["prev_page"].is_null());

    let items = data["items"].as_array().unwrap();
    assert_eq!(items[0]["id"], rated.id);
    assert_eq!(items[0]["average_rating"], 9.33);
    assert_eq!(items[0]["ratings_count"], 3);
    assert_eq!(items[1]["id"], unrated.id);
    assert!(items[1]["average_rating"].is_null());
    assert_eq!(items[1]["ratings_count"], 0);
}

#[tokio::test]
async fn update_and_delete() {
    let (app, state) = test_app().await;
    let d = director(&state, "Paul Thomas Anderson").await;
    let m = movie(&state, "Magnolia", d, 1999, &["Drama"]).await;
    rate(&state, m.id, &[8, 7]).await;
    let uri = format!("/api/v1/movies/{}", m.id);

    let (status, body) = send(&app, "PUT", &uri, Some(json!({ "cast": "Tom Cruise" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cast"], "Tom Cruise");
    assert_eq!(body["data"]["genres"], json!(["Drama"]));
    assert_eq!(body["data"]["average_rating"], 7.5);

    let (status, _) = send(&app, "PUT", &uri, Some(json!({ "genres": ["Drama", "Opera"] }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "PUT", &uri, Some(json!({ "genres": [] }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["genres"], json!([]));

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = send(&app, "GET", &format!("{uri}/ratings"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalog_endpoints() {
    let (app, _) = test_app().await;

    let (status, body) = send(&app, "GET", "/api/v1/genres", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> =
        body["data"].as_array().unwrap().iter().map(|g| g["name"].as_str().unwrap()).collect();
    assert!(names.contains(&"Drama"));

    let (status, body) =
        send(&app, "POST", "/api/v1/genres", Some(json!({ "name": "Noir", "description": "Shadows" })))
            .await;
    assert_eq!(status, StatusCode::CREATED);
    let genre_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", &format!("/api/v1/genres/{genre_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["description"], "Shadows");

    let (status, body) = send(&app, "POST", "/api/v1/genres", Some(json!({ "name": "Noir" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");

    let (status, _) = send(&app, "POST", "/api/v1/directors", Some(json!({ "name": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/directors",
        Some(json!({ "name": "Billy Wilder", "birth_year": 1906 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let director_id = body["data"]["id"].as_i64().unwrap();

    let movie = json!({
        "title": "Double Indemnity",
        "director_id": director_id,
        "release_year": 1944,
        "genres": ["Noir", "Crime"],
    });
    let (status, _) = send(&app, "POST", "/api/v1/movies", Some(movie)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) =
        send(&app, "GET", &format!("/api/v1/directors/{director_id}/movies"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["genres"], json!(["Crime", "Noir"]));

    let (status, body) = send(&app, "GET", "/api/v1/directors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["birth_year"], 1906);

    let (status, _) = send(&app, "GET", "/api/v1/directors/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
