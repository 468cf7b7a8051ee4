use qalpuch::{QalpuchClient, VideoCodec, VideoConfig};
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Reads QALPUCH_BASE_URL, e.g. http://localhost:8080/v1
    let client = QalpuchClient::new(None)?;

    if !client.is_authenticated() {
        let email = env::var("QALPUCH_EMAIL")?;
        let password = env::var("QALPUCH_PASSWORD")?;
        let session = client.auth().login(&email, &password).await?;
        client.set_token(session.token);
    }

    let video_path = env::args().nth(1).unwrap_or_else(|| "assets/clip.mp4".to_string());
    println!("Uploading '{}'...", video_path);
    let file = client.files().upload_path(&video_path, None).await?;
    println!("Uploaded file {} ({} bytes)", file.id, file.size);

    let result = client
        .tasks()
        .build(file.id)
        .with_video_config(
            VideoConfig::new()
                .codec(VideoCodec::Vp9)
                .bitrate(1500)
                .resolution("1280x720"),
        )
        .execute()
        .await;

    match result {
        Ok(task) => {
            println!("Successfully submitted task.");
            println!("Task ID: {}", task.id);
        }
        Err(e) if e.is_unauthorized() => {
            eprintln!("Session expired, log in again: {}", e);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
        }
    }

    Ok(())
}
