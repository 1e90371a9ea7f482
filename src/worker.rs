//! Worker thread management
//!
//! Image decoding, preview rasterization, and PNG export all run on
//! dedicated worker threads so the event loop never blocks on pixels.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{unbounded, Receiver, Sender};
use image::DynamicImage;

use crate::asset::load_photo;
use crate::composition::PosterPlan;
use crate::export::export_poster;
use crate::fonts::FontCatalog;
use crate::render::preview::{render_preview, PreviewConfig};

/// Messages sent from main thread to workers
#[derive(Debug)]
pub enum WorkerMessage {
    /// Decode a photo from disk
    DecodeRequest {
        path: PathBuf,
        /// Upload generation the decode belongs to; stale results are
        /// discarded by the main thread when a newer upload started.
        generation: u64,
    },
    /// Rasterize the poster and convert it to ANSI half blocks
    PreviewRequest {
        plan: PosterPlan,
        config: PreviewConfig,
        sequence: u64,
    },
    /// Rasterize at export scale and write the PNG
    ExportRequest {
        plan: PosterPlan,
        scale: f32,
        path: PathBuf,
    },
    /// Shutdown signal
    Shutdown,
}

/// Responses sent from workers to main thread
#[derive(Debug)]
pub enum WorkerResponse {
    /// Photo decoded successfully
    DecodeComplete {
        image: Arc<DynamicImage>,
        path: PathBuf,
        generation: u64,
        decode_time: u64,
    },
    /// Photo decode failed
    DecodeFailed {
        path: PathBuf,
        generation: u64,
        error: String,
    },
    /// Preview rendering complete
    PreviewComplete {
        output: String,
        sequence: u64,
        render_time: u64,
    },
    /// Preview rendering failed
    PreviewFailed(String),
    /// Export written to disk
    ExportComplete { path: PathBuf, export_time: u64 },
    /// Export failed
    ExportFailed(String),
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

/// Spawn worker threads sharing one font catalog
pub fn spawn_workers(fonts: Arc<FontCatalog>) -> WorkerHandle {
    let (request_tx, request_rx) = unbounded::<WorkerMessage>();
    let (response_tx, response_rx) = unbounded::<WorkerResponse>();

    let mut threads = Vec::new();

    let num_workers = num_cpus().min(4).max(1);

    for id in 0..num_workers {
        let rx = request_rx.clone();
        let tx = response_tx.clone();
        let fonts = Arc::clone(&fonts);

        let handle = thread::Builder::new()
            .name(format!("poster-worker-{}", id))
            .spawn(move || {
                worker_loop(rx, tx, fonts);
            })
            .expect("Failed to spawn worker thread");

        threads.push(handle);
    }

    WorkerHandle {
        request_tx,
        response_rx,
        threads,
    }
}

/// Main worker loop - processes messages until shutdown
fn worker_loop(
    rx: Receiver<WorkerMessage>,
    tx: Sender<WorkerResponse>,
    fonts: Arc<FontCatalog>,
) {
    while let Ok(msg) = rx.recv() {
        match msg {
            WorkerMessage::Shutdown => break,

            WorkerMessage::DecodeRequest { path, generation } => {
                let start = Instant::now();

                let response = match load_photo(&path) {
                    Ok(image) => WorkerResponse::DecodeComplete {
                        image: Arc::new(image),
                        path,
                        generation,
                        decode_time: start.elapsed().as_millis() as u64,
                    },
                    Err(e) => WorkerResponse::DecodeFailed {
                        path,
                        generation,
                        error: e.to_string(),
                    },
                };

                let _ = tx.send(response);
            }

            WorkerMessage::PreviewRequest {
                plan,
                config,
                sequence,
            } => {
                let start = Instant::now();

                let response = match render_preview(&plan, &fonts, &config) {
                    Ok(output) => WorkerResponse::PreviewComplete {
                        output,
                        sequence,
                        render_time: start.elapsed().as_millis() as u64,
                    },
                    Err(e) => WorkerResponse::PreviewFailed(e.to_string()),
                };

                let _ = tx.send(response);
            }

            WorkerMessage::ExportRequest { plan, scale, path } => {
                let start = Instant::now();

                let response = match export_poster(&plan, &fonts, scale, &path) {
                    Ok(written) => WorkerResponse::ExportComplete {
                        path: written,
                        export_time: start.elapsed().as_millis() as u64,
                    },
                    Err(e) => WorkerResponse::ExportFailed(e.to_string()),
                };

                let _ = tx.send(response);
            }
        }
    }
}

/// Get number of CPUs (fallback to 1)
fn num_cpus() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::PhotoAsset;
    use crate::composition::CompositionModel;
    use crate::style::StyleState;
    use image::RgbImage;
    use std::time::Duration;

    #[test]
    fn test_spawn_and_shutdown() {
        let workers = spawn_workers(Arc::new(FontCatalog::empty()));
        workers.shutdown();
    }

    #[test]
    fn test_decode_failure_reports_generation() {
        let workers = spawn_workers(Arc::new(FontCatalog::empty()));

        workers
            .request_tx
            .send(WorkerMessage::DecodeRequest {
                path: PathBuf::from("/definitely/not/here.png"),
                generation: 7,
            })
            .unwrap();

        let response = workers
            .response_rx
            .recv_timeout(Duration::from_secs(5))
            .unwrap();

        match response {
            WorkerResponse::DecodeFailed { generation, .. } => {
                assert_eq!(generation, 7);
            }
            other => panic!("Unexpected response: {:?}", other),
        }

        workers.shutdown();
    }

    #[test]
    fn test_preview_request() {
        let fonts = Arc::new(FontCatalog::load());
        if fonts.is_empty() {
            return; // no system fonts in this environment
        }

        let workers = spawn_workers(Arc::clone(&fonts));

        let asset = PhotoAsset::new(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 48, image::Rgb([80, 90, 100]))),
            None,
            0,
        );
        let plan = CompositionModel::derive(Some(&asset), &StyleState::default())
            .poster
            .unwrap();

        workers
            .request_tx
            .send(WorkerMessage::PreviewRequest {
                plan,
                config: PreviewConfig::default(),
                sequence: 3,
            })
            .unwrap();

        let response = workers
            .response_rx
            .recv_timeout(Duration::from_secs(10))
            .unwrap();

        match response {
            WorkerResponse::PreviewComplete {
                output, sequence, ..
            } => {
                assert_eq!(sequence, 3);
                assert!(output.contains('\u{2580}'));
            }
            other => panic!("Unexpected response: {:?}", other),
        }

        workers.shutdown();
    }
}
