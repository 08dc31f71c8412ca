//! Integration tests for the fetch boundary, against a local stub service.
//!
//! Each failure kind is constructed deterministically: a refused connection
//! for transport errors, a 500 route for protocol errors, and a non-JSON
//! body for decode errors. The stub also captures incoming query parameters
//! so the encoding properties can be asserted end to end.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;

use reco_proto::client::{ApiClient, FetchError};
use reco_proto::model::{CatalogResponse, RecommendResponse, Track};
use reco_proto::query::{Preferences, RecommendationQuery};

fn track(id: &str, title: &str) -> Track {
    Track {
        id: id.to_string(),
        title: title.to_string(),
        artist: "Artist".to_string(),
        genre: "genre".to_string(),
        year: Some(2020),
    }
}

/// Bind the stub on an ephemeral port and return its origin.
async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

type SeenParams = Arc<Mutex<Option<HashMap<String, String>>>>;

/// A `/api/recommend` stub that records the (already percent-decoded) query
/// parameters of the last request.
fn capture_recommend(seen: SeenParams, recommendations: Vec<Track>) -> Router {
    Router::new().route(
        "/api/recommend",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let seen = seen.clone();
            let recommendations = recommendations.clone();
            async move {
                *seen.lock().unwrap() = Some(params);
                Json(RecommendResponse { recommendations })
            }
        }),
    )
}

#[tokio::test]
async fn catalog_success_preserves_server_order() {
    let tracks = vec![track("t1", "One"), track("t2", "Two"), track("t3", "Three")];
    let body = CatalogResponse {
        tracks: tracks.clone(),
    };
    let app = Router::new().route("/api/tracks", get(move || async move { Json(body) }));

    let client = ApiClient::new(serve(app).await);
    let got = client.list_catalog().await.unwrap();
    assert_eq!(got, tracks);
}

#[tokio::test]
async fn seed_parameter_round_trips_through_percent_encoding() {
    let seen: SeenParams = Arc::new(Mutex::new(None));
    let app = capture_recommend(seen.clone(), vec![track("r1", "Rec")]);

    let client = ApiClient::new(serve(app).await);
    let seed = "t/42 ?&=#%";
    let recs = client
        .recommend(&RecommendationQuery::seeded(seed))
        .await
        .unwrap();
    assert_eq!(recs.len(), 1);

    let params = seen.lock().unwrap().clone().unwrap();
    assert_eq!(params.get("seed").map(String::as_str), Some(seed));
    assert_eq!(params.get("k").map(String::as_str), Some("5"));
    assert!(!params.contains_key("danceability"));
}

#[tokio::test]
async fn preference_parameters_arrive_verbatim() {
    let seen: SeenParams = Arc::new(Mutex::new(None));
    let app = capture_recommend(seen.clone(), Vec::new());

    let client = ApiClient::new(serve(app).await);
    let prefs = Preferences {
        danceability: "0.8".into(),
        energy: "0.5".into(),
        valence: "0.3".into(),
        tempo: "120".into(),
    };
    let recs = client
        .recommend(&RecommendationQuery::preference(prefs))
        .await
        .unwrap();
    assert!(recs.is_empty());

    let params = seen.lock().unwrap().clone().unwrap();
    assert_eq!(params.get("danceability").map(String::as_str), Some("0.8"));
    assert_eq!(params.get("energy").map(String::as_str), Some("0.5"));
    assert_eq!(params.get("valence").map(String::as_str), Some("0.3"));
    assert_eq!(params.get("tempo").map(String::as_str), Some("120"));
    assert_eq!(params.get("k").map(String::as_str), Some("5"));
    assert!(!params.contains_key("seed"));
}

#[tokio::test]
async fn empty_recommendation_list_is_a_successful_outcome() {
    let app = Router::new().route(
        "/api/recommend",
        get(|| async {
            Json(RecommendResponse {
                recommendations: Vec::new(),
            })
        }),
    );

    let client = ApiClient::new(serve(app).await);
    let recs = client
        .recommend(&RecommendationQuery::seeded("t1"))
        .await
        .unwrap();
    assert!(recs.is_empty());
}

#[tokio::test]
async fn non_success_status_is_a_protocol_failure_regardless_of_body() {
    // The body is a perfectly valid catalog — the status alone decides.
    let app = Router::new().route(
        "/api/tracks",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                r#"{"tracks":[{"id":"t1"}]}"#,
            )
        }),
    );

    let client = ApiClient::new(serve(app).await);
    let err = client.list_catalog().await.unwrap_err();
    match err {
        FetchError::Protocol(status) => assert_eq!(status.as_u16(), 500),
        other => panic!("expected protocol failure, got {:?}", other),
    }
}

#[tokio::test]
async fn unparseable_body_is_a_decode_failure() {
    let app = Router::new().route("/api/tracks", get(|| async { "<html>not json</html>" }));

    let client = ApiClient::new(serve(app).await);
    let err = client.list_catalog().await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn missing_required_field_is_a_decode_failure() {
    let app = Router::new().route(
        "/api/recommend",
        get(|| async { Json(serde_json::json!({ "other": [] })) }),
    );

    let client = ApiClient::new(serve(app).await);
    let err = client
        .recommend(&RecommendationQuery::seeded("t1"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn refused_connection_is_a_transport_failure() {
    // Bind then drop to get an address nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(format!("http://{}", addr));
    let err = client.list_catalog().await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}
