mod common;

use common::{ok, setup};
use qalpuch::{
    AudioCodec, AudioConfig, ImageConfig, ImageFormat, QalpuchError, TaskConfig, VideoCodec,
    VideoConfig,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::Mock;

#[tokio::test]
async fn test_build_and_execute_video_task() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/tasks"))
        .and(body_json(json!({
            "file_id": "test-file-id",
            "config": { "type": "video", "codec": "h264", "bitrate": 1000, "resolution": "1280x720" }
        })))
        .respond_with(ok(201, json!({ "id": "new-builder-task" })))
        .expect(1)
        .mount(&server)
        .await;

    let task = client
        .tasks()
        .build("test-file-id")
        .with_video_config(
            VideoConfig::new()
                .codec(VideoCodec::H264)
                .bitrate(1000)
                .resolution("1280x720"),
        )
        .execute()
        .await
        .unwrap();

    assert_eq!(task.id, "new-builder-task");
}

#[tokio::test]
async fn test_execute_without_config_sends_nothing() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/tasks"))
        .respond_with(ok(201, json!({ "id": "never" })))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.tasks().build("test-file-id").execute().await.unwrap_err();
    assert!(matches!(err, QalpuchError::IncompleteConfig));
    assert!(err.to_string().contains("with_video_config"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_last_config_wins() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/tasks"))
        .and(body_json(json!({
            "file_id": "test-file-id",
            "config": { "type": "image", "format": "png", "width": 640 }
        })))
        .respond_with(ok(201, json!({ "id": "image-task" })))
        .expect(1)
        .mount(&server)
        .await;

    let task = client
        .tasks()
        .build("test-file-id")
        .with_video_config(VideoConfig::new().codec(VideoCodec::Vp9).bitrate(800))
        .with_image_config(ImageConfig::new().format(ImageFormat::Png).width(640))
        .execute()
        .await
        .unwrap();

    assert_eq!(task.id, "image-task");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_audio_variant_uses_audio_tag() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/tasks"))
        .and(body_json(json!({
            "file_id": "song",
            "config": { "type": "audio", "codec": "opus", "bitrate": 128 }
        })))
        .respond_with(ok(201, json!({ "id": "audio-task" })))
        .expect(1)
        .mount(&server)
        .await;

    let builder = client
        .tasks()
        .build("song")
        .with_audio_config(AudioConfig::new().codec(AudioCodec::Opus).bitrate(128));
    assert_eq!(builder.config().map(TaskConfig::type_tag), Some("audio"));

    builder.execute().await.unwrap();
}

#[tokio::test]
async fn test_invalid_config_is_reported_at_execute() {
    let (server, client) = setup().await;

    let err = client
        .tasks()
        .build("test-file-id")
        .with_video_config(VideoConfig::new().resolution("hd"))
        .with_image_config(ImageConfig::new().format(ImageFormat::Png))
        .execute()
        .await
        .unwrap_err();

    assert!(matches!(err, QalpuchError::InvalidConfig(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_api_errors_pass_through_unchanged() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/tasks"))
        .respond_with(common::fail(403, "Quota exhausted"))
        .mount(&server)
        .await;

    let err = client
        .tasks()
        .build("test-file-id")
        .with_config(ImageConfig::new().into())
        .execute()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), Some(qalpuch::ErrorKind::Forbidden));
    assert_eq!(err.to_string(), "API error (status 403): Quota exhausted");
}
