use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use super::messages::{ScreenEvent, ScreenJob};
use crate::analysis::Screener;

/// Runs the screen on its own thread and streams progress back over `tx`.
/// The thread stops early if the receiver goes away.
pub fn spawn_screen_worker(job: ScreenJob, tx: Sender<ScreenEvent>) -> JoinHandle<()> {
    thread::spawn(move || {
        let start = Instant::now();
        let screener = Screener::new(job.source.as_ref(), job.config.clone());

        let report = if job.config.parallel {
            screener.run_parallel(&job.symbols, |p| {
                let _ = tx.send(ScreenEvent::Progress(p.clone()));
            })
        } else {
            screener.run(&job.symbols, |p| {
                let _ = tx.send(ScreenEvent::Progress(p.clone()));
            })
        };

        let duration_ms = start.elapsed().as_millis();
        if tx.send(ScreenEvent::Finished { report, duration_ms }).is_err() {
            log::debug!("Screen finished after the receiver hung up");
        }
    })
}
