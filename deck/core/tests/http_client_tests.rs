//! TheCatApi against a local mock server.

use std::time::Duration;

use catdeck_core::{ApiError, CatApi, ImageQuery, TheCatApi, VoteRequest};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> TheCatApi {
    TheCatApi::new(server.uri(), Some("test-key"), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_list_breeds_sends_paging_and_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/breeds"))
        .and(query_param("limit", "25"))
        .and(query_param("page", "0"))
        .and(header("x-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "abys",
                "name": "Abyssinian",
                "temperament": "Active, Energetic, Independent, Intelligent, Gentle",
                "life_span": "14 - 15",
                "origin": "Egypt",
                "weight": { "metric": "3 - 5" }
            },
            { "id": "aege", "name": "Aegean" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let breeds = client(&server).list_breeds(0, 25).await.unwrap();

    assert_eq!(breeds.len(), 2);
    assert_eq!(breeds[0].id, "abys");
    assert_eq!(breeds[0].life_span.as_deref(), Some("14 - 15"));
    assert_eq!(breeds[1].temperament, None);
}

#[tokio::test]
async fn test_first_image_queries_by_breed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images/search"))
        .and(query_param("breed_ids", "abys"))
        .and(query_param("limit", "1"))
        .and(query_param("has_breeds", "1"))
        .and(query_param("size", "med"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "0XYvRd7oD", "url": "https://cdn2.thecatapi.com/images/0XYvRd7oD.jpg", "width": 1204, "height": 1445 }
        ])))
        .mount(&server)
        .await;

    let image = client(&server)
        .first_image(&ImageQuery::for_breed("abys", 1))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(image.id, "0XYvRd7oD");
    assert_eq!(image.width, Some(1204));
}

#[tokio::test]
async fn test_first_image_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let image = client(&server)
        .first_image(&ImageQuery::for_breed("none", 1))
        .await
        .unwrap();
    assert_eq!(image, None);
}

#[tokio::test]
async fn test_submit_vote_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/votes"))
        .and(header("x-api-key", "test-key"))
        .and(body_json(json!({ "image_id": "img-1", "sub_id": "user-1", "value": 1 })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "message": "SUCCESS", "id": 31098 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let receipt = client(&server)
        .submit_vote(&VoteRequest {
            image_id: "img-1".to_string(),
            sub_id: Some("user-1".to_string()),
            value: 1,
        })
        .await
        .unwrap();

    assert_eq!(receipt.message, "SUCCESS");
    assert_eq!(receipt.id, Some(31098));
}

#[tokio::test]
async fn test_vote_without_subject_omits_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/votes"))
        .and(body_json(json!({ "image_id": "img-2", "value": 0 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "message": "SUCCESS" })))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = client(&server)
        .submit_vote(&VoteRequest {
            image_id: "img-2".to_string(),
            sub_id: None,
            value: 0,
        })
        .await
        .unwrap();
    assert_eq!(receipt.id, None);
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/breeds"))
        .respond_with(ResponseTemplate::new(401).set_body_string("AUTHENTICATION_ERROR"))
        .mount(&server)
        .await;

    let err = client(&server).list_breeds(0, 25).await.unwrap_err();
    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "AUTHENTICATION_ERROR");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/breeds"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server).list_breeds(0, 25).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let api = TheCatApi::new("http://127.0.0.1:9", None, Duration::from_millis(500)).unwrap();
    let err = api.list_breeds(0, 25).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
