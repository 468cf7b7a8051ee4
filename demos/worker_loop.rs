use qalpuch::{
    CancellationToken, QalpuchClient, TaskConfig, TaskStatus, UpdateTaskStatusRequest,
};
use std::env;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let anonymous = QalpuchClient::new(None)?;

    // A worker starts from the one-time token printed when an admin created it.
    let provisioning = env::var("QALPUCH_WORKER_TOKEN")?;
    let session = anonymous.workers().register(&provisioning).await?;

    let shutdown = CancellationToken::new();
    let client = anonymous.with_cancellation(shutdown.clone());
    client.set_token(session.token);

    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    println!("Waiting for tasks... Press Ctrl+C to stop.");
    while !shutdown.is_cancelled() {
        let task = match client.tasks().pending().await {
            Ok(Some(task)) => task,
            Ok(None) => {
                tokio::time::sleep(Duration::from_secs(5)).await;
                continue;
            }
            Err(e) if e.is_cancelled() => break,
            Err(e) => {
                eprintln!("Error: {}", e);
                tokio::time::sleep(Duration::from_secs(5)).await;
                continue;
            }
        };

        println!("Claimed task {}", task.id);
        let processing = UpdateTaskStatusRequest::new(TaskStatus::Processing).message("started");
        client.tasks().update_status(&task.id, &processing).await?;

        let source = client.files().download(&task.source_file_id).await?;
        let (name, output) = match task.task_config() {
            Some(Ok(TaskConfig::Image(_))) => ("result.img", source),
            Some(Ok(TaskConfig::Video(_))) => ("result.video", source),
            Some(Ok(TaskConfig::Audio(_))) => ("result.audio", source),
            Some(Err(e)) => {
                let failed = UpdateTaskStatusRequest::new(TaskStatus::Failed)
                    .message(format!("unreadable config: {}", e));
                client.tasks().update_status(&task.id, &failed).await?;
                continue;
            }
            None => ("result.bin", source),
        };

        // A real worker would run the conversion here.
        client.tasks().upload_result(&task.id, name, output).await?;
        let done = UpdateTaskStatusRequest::new(TaskStatus::Completed);
        client.tasks().update_status(&task.id, &done).await?;
        println!("Completed task {}", task.id);
    }

    Ok(())
}
