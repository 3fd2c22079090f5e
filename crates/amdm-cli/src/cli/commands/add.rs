//! `amdm add <url>` – queue a download through the backend.

use amdm_core::bridge::{Backend, BackendEvent};
use amdm_core::classify::classify;
use amdm_core::queue::{DownloadQueue, QueueState};
use anyhow::Result;

pub async fn run_add(backend: &dyn Backend, url: &str, wait: bool) -> Result<()> {
    let classification = classify(url);
    if !classification.is_valid {
        anyhow::bail!("not an Apple Music link: {url}");
    }

    // Subscribe before enqueueing so no event can slip past us.
    let events = wait.then(|| backend.subscribe());

    let id = backend.enqueue_download(url).await?;
    println!(
        "Queued download {id}: {url} ({})",
        classification.content_type.label()
    );

    let Some(mut events) = events else {
        return Ok(());
    };

    let mut queue = DownloadQueue::new();
    queue.track(id, url);

    while let Some(event) = events.recv().await {
        queue.apply_event(&event);
        let Some(item) = queue.get(id) else { continue };

        if let BackendEvent::DownloadProgress { id: event_id, .. } = &event {
            if *event_id == id {
                match (item.fraction(), item.total_bytes) {
                    (Some(fraction), Some(total)) => {
                        let done_mib = item.bytes_done as f64 / 1_048_576.0;
                        let total_mib = total as f64 / 1_048_576.0;
                        println!(
                            "  {:.1} / {:.1} MiB ({:.1}%)",
                            done_mib,
                            total_mib,
                            fraction * 100.0
                        );
                    }
                    _ => println!("  {} bytes", item.bytes_done),
                }
            }
        }

        match &item.state {
            QueueState::Completed => {
                println!("Download {id} completed");
                return Ok(());
            }
            QueueState::Failed { message } => {
                anyhow::bail!("download {id} failed: {message}");
            }
            QueueState::Queued | QueueState::Running => {}
        }
    }

    anyhow::bail!("backend closed the event stream before download {id} finished")
}
