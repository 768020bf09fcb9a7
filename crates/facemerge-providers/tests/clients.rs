//! Provider client tests against mock HTTP servers.

use std::time::Duration;

use facemerge_models::FaceAttribute;
use facemerge_providers::{AzureConfig, AzureFaceClient, FaceppClient, FaceppConfig, ProviderError};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const IMAGE: &[u8] = b"fake-jpeg-bytes";

fn facepp_client(server: &MockServer) -> FaceppClient {
    FaceppClient::new(FaceppConfig {
        api_key: "test-key".to_string(),
        api_secret: "test-secret".to_string(),
        endpoint: Url::parse(&format!("{}/facepp/v3/detect", server.uri())).unwrap(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn azure_client(server: &MockServer) -> AzureFaceClient {
    AzureFaceClient::new(AzureConfig::new(
        "azure-key",
        Url::parse(&server.uri()).unwrap(),
        Duration::from_secs(5),
    ))
    .unwrap()
}

fn facepp_face() -> serde_json::Value {
    json!({
        "face_token": "abc",
        "attributes": {
            "headpose": {"pitch_angle": 3.5, "roll_angle": -1.25, "yaw_angle": 12.0},
            "eyestatus": {
                "left_eye_status": {
                    "no_glass_eye_open": 98.1, "no_glass_eye_close": 0.2,
                    "normal_glass_eye_open": 1.5, "normal_glass_eye_close": 0.0,
                    "dark_glasses": 0.1, "occlusion": 0.1
                },
                "right_eye_status": {
                    "no_glass_eye_open": 97.0, "no_glass_eye_close": 1.0,
                    "normal_glass_eye_open": 1.0, "normal_glass_eye_close": 0.5,
                    "dark_glasses": 0.3, "occlusion": 0.2
                }
            },
            "emotion": {
                "anger": 0.1, "disgust": 0.05, "fear": 0.02, "happiness": 92.0,
                "neutral": 7.0, "sadness": 0.5, "surprise": 0.33
            }
        }
    })
}

#[tokio::test]
async fn test_facepp_first_face_attributes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/facepp/v3/detect"))
        .and(body_string_contains("name=\"api_key\""))
        .and(body_string_contains("test-secret"))
        .and(body_string_contains("headpose,eyestatus,emotion"))
        .and(body_string_contains("name=\"image_file\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "faces": [facepp_face(), {"attributes": {"emotion": {"anger": 100.0}}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let bundle = facepp_client(&server)
        .detect(IMAGE, FaceAttribute::ALL)
        .await
        .unwrap()
        .expect("face detected");

    let pose = bundle.head_pose.unwrap();
    assert_eq!(pose.yaw_angle, 12.0);
    assert!(bundle.eye_status.unwrap().left_eye_status.is_open());
    let emotion = bundle.emotion.unwrap();
    assert_eq!(emotion.len(), 7);
    assert_eq!(emotion.dominant(), Some("happiness"));
}

#[tokio::test]
async fn test_facepp_no_face() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "image_id": "x", "faces": [], "face_num": 0
        })))
        .mount(&server)
        .await;

    let result = facepp_client(&server)
        .detect(IMAGE, &[FaceAttribute::Emotion])
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_facepp_missing_faces_key_means_no_face() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"image_id": "x"})))
        .mount(&server)
        .await;

    let result = facepp_client(&server)
        .detect(IMAGE, &[FaceAttribute::Emotion])
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_facepp_non_success_is_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({"error_message": "CONCURRENCY_LIMIT_EXCEEDED"})),
        )
        .mount(&server)
        .await;

    let err = facepp_client(&server)
        .detect(IMAGE, &[FaceAttribute::Emotion])
        .await
        .unwrap_err();

    assert!(err.is_request_error());
    assert!(matches!(err, ProviderError::Status { .. }));
    assert!(err.to_string().contains("CONCURRENCY_LIMIT_EXCEEDED"));
}

#[tokio::test]
async fn test_facepp_missing_requested_attribute_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "faces": [{"attributes": {"emotion": {"happiness": 50.0}}}]
        })))
        .mount(&server)
        .await;

    let err = facepp_client(&server)
        .detect(IMAGE, &[FaceAttribute::HeadPose, FaceAttribute::Emotion])
        .await
        .unwrap_err();

    assert!(!err.is_request_error());
    assert!(err.to_string().contains("headpose"));
}

#[tokio::test]
async fn test_facepp_malformed_json_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = facepp_client(&server)
        .detect(IMAGE, &[FaceAttribute::Emotion])
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Json { .. }));
    assert!(!err.is_request_error());
}

#[tokio::test]
async fn test_facepp_connection_refused_is_request_error() {
    let client = FaceppClient::new(FaceppConfig {
        api_key: "k".to_string(),
        api_secret: "s".to_string(),
        endpoint: Url::parse("http://127.0.0.1:1/facepp/v3/detect").unwrap(),
        timeout: Duration::from_secs(2),
    })
    .unwrap();

    let err = client
        .detect(IMAGE, &[FaceAttribute::Emotion])
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Network { .. }));
    assert!(err.is_request_error());
}

#[tokio::test]
async fn test_azure_emotion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/face/v1.0/detect"))
        .and(header("Ocp-Apim-Subscription-Key", "azure-key"))
        .and(header("content-type", "application/octet-stream"))
        .and(query_param("returnFaceAttributes", "emotion"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "faceId": "c5c24a82",
                "faceRectangle": {"top": 1, "left": 2, "width": 3, "height": 4},
                "faceAttributes": {
                    "emotion": {
                        "anger": 0.0, "contempt": 0.0, "disgust": 0.0, "fear": 0.0,
                        "happiness": 0.6, "neutral": 0.4, "sadness": 0.0, "surprise": 0.0
                    }
                }
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let bundle = azure_client(&server)
        .detect(IMAGE, &[FaceAttribute::Emotion])
        .await
        .unwrap()
        .expect("face detected");

    let emotion = bundle.emotion.unwrap();
    assert_eq!(emotion.len(), 8);
    assert_eq!(emotion.get("happiness"), Some(0.6));
    assert!(bundle.eye_status.is_none());
}

#[tokio::test]
async fn test_azure_skips_eye_status_and_maps_head_pose() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(query_param("returnFaceAttributes", "headPose,emotion"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "faceAttributes": {
                    "headPose": {"pitch": 0.0, "roll": 1.5, "yaw": -4.0},
                    "emotion": {"neutral": 0.9, "sadness": 0.1}
                }
            }
        ])))
        .mount(&server)
        .await;

    let bundle = azure_client(&server)
        .detect(IMAGE, FaceAttribute::ALL)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(bundle.head_pose.unwrap().yaw_angle, -4.0);
    assert_eq!(bundle.emotion.unwrap().dominant(), Some("neutral"));
}

#[tokio::test]
async fn test_azure_no_face() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = azure_client(&server)
        .detect(IMAGE, &[FaceAttribute::Emotion])
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_azure_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": "401", "message": "Access denied due to invalid subscription key."}
        })))
        .mount(&server)
        .await;

    let err = azure_client(&server)
        .detect(IMAGE, &[FaceAttribute::Emotion])
        .await
        .unwrap_err();

    assert!(err.is_request_error());
    assert_eq!(err.provider(), "Azure");
    assert!(err.to_string().contains("invalid subscription key"));
}
