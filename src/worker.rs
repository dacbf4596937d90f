//! Worker thread management
//!
//! PNG export and glyph previews run on dedicated worker threads so font
//! lookup and rasterization never stall the event loop.

use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error};

use crate::export::ImageExporter;
use crate::raster::block_rows;
use crate::style::GeneratedSignature;

/// Messages sent from main thread to workers
#[derive(Debug)]
pub enum WorkerMessage {
    /// Write the signature PNG to the download directory
    Export { signature: GeneratedSignature },
    /// Rasterize for the terminal preview
    GlyphPreview {
        signature: GeneratedSignature,
        columns: u32,
        generation: u64,
    },
    /// Shutdown signal
    Shutdown,
}

/// Responses sent from workers to main thread
#[derive(Debug)]
pub enum WorkerResponse {
    ExportComplete { path: PathBuf, render_time: u64 },
    ExportFailed(String),
    GlyphPreviewComplete { rows: Vec<String>, generation: u64 },
    GlyphPreviewFailed { error: String, generation: u64 },
}

/// Handle to worker threads and channels
pub struct WorkerHandle {
    pub request_tx: Sender<WorkerMessage>,
    pub response_rx: Receiver<WorkerResponse>,
    threads: Vec<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Shutdown all worker threads
    pub fn shutdown(self) {
        for _ in &self.threads {
            let _ = self.request_tx.send(WorkerMessage::Shutdown);
        }

        for handle in self.threads {
            let _ = handle.join();
        }
    }
}

/// Spawn worker threads for export and preview rendering
pub fn spawn_workers(exporter: ImageExporter) -> std::io::Result<WorkerHandle> {
    let (request_tx, request_rx) = unbounded::<WorkerMessage>();
    let (response_tx, response_rx) = unbounded::<WorkerResponse>();

    let mut threads = Vec::new();

    // One thread for the export, one for previews queued behind it
    for id in 0..2 {
        let rx = request_rx.clone();
        let tx = response_tx.clone();
        let exporter = exporter.clone();

        let handle = thread::Builder::new()
            .name(format!("render-worker-{}", id))
            .spawn(move || worker_loop(&exporter, rx, tx))?;

        threads.push(handle);
    }

    Ok(WorkerHandle {
        request_tx,
        response_rx,
        threads,
    })
}

/// Main worker loop - processes messages until shutdown
fn worker_loop(exporter: &ImageExporter, rx: Receiver<WorkerMessage>, tx: Sender<WorkerResponse>) {
    while let Ok(msg) = rx.recv() {
        let response = match msg {
            WorkerMessage::Shutdown => break,

            WorkerMessage::Export { signature } => {
                let start = Instant::now();
                match exporter.export(Some(&signature)) {
                    Ok(Some(path)) => WorkerResponse::ExportComplete {
                        path,
                        render_time: start.elapsed().as_millis() as u64,
                    },
                    Ok(None) => continue,
                    Err(e) => {
                        error!("Signature export failed: {}", e);
                        WorkerResponse::ExportFailed(e.to_string())
                    }
                }
            }

            WorkerMessage::GlyphPreview {
                signature,
                columns,
                generation,
            } => match exporter.render_image(&signature) {
                Ok(image) => WorkerResponse::GlyphPreviewComplete {
                    rows: block_rows(&image, columns),
                    generation,
                },
                Err(e) => {
                    debug!("Glyph preview unavailable: {}", e);
                    WorkerResponse::GlyphPreviewFailed {
                        error: e.to_string(),
                        generation,
                    }
                }
            },
        };

        let _ = tx.send(response);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontBook;
    use std::sync::Arc;
    use std::time::Duration;

    fn jane() -> GeneratedSignature {
        GeneratedSignature {
            name: "Jane Doe".to_string(),
            font: "Brush Script MT, cursive".to_string(),
            color: "#ff0000".to_string(),
        }
    }

    #[test]
    fn test_spawn_and_shutdown() {
        let exporter = ImageExporter::new(Arc::new(FontBook::empty()), std::env::temp_dir());
        let workers = spawn_workers(exporter).unwrap();
        workers.shutdown();
    }

    #[test]
    fn test_export_failure_is_reported() {
        let exporter = ImageExporter::new(Arc::new(FontBook::empty()), std::env::temp_dir());
        let workers = spawn_workers(exporter).unwrap();

        workers
            .request_tx
            .send(WorkerMessage::Export { signature: jane() })
            .unwrap();

        let response = workers
            .response_rx
            .recv_timeout(Duration::from_secs(5))
            .unwrap();

        match response {
            WorkerResponse::ExportFailed(err) => assert!(err.contains("no usable font")),
            other => panic!("Unexpected response: {:?}", other),
        }

        workers.shutdown();
    }

    #[test]
    fn test_preview_failure_keeps_generation() {
        let exporter = ImageExporter::new(Arc::new(FontBook::empty()), std::env::temp_dir());
        let workers = spawn_workers(exporter).unwrap();

        workers
            .request_tx
            .send(WorkerMessage::GlyphPreview {
                signature: jane(),
                columns: 40,
                generation: 7,
            })
            .unwrap();

        match workers
            .response_rx
            .recv_timeout(Duration::from_secs(5))
            .unwrap()
        {
            WorkerResponse::GlyphPreviewFailed { generation, .. } => assert_eq!(generation, 7),
            other => panic!("Unexpected response: {:?}", other),
        }

        workers.shutdown();
    }
}
