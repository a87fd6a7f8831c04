//! # Scan Worker
//!
//! The cooperative scan loop and its tokio wrapper.
//!
//! ## Lifecycle
//! ```text
//! spawn ──► spawn_blocking ──► run_scan_loop
//!                                  │
//!                 ┌────────────────┼──────────────────┐
//!                 ▼                ▼                  ▼
//!            Ok(Some(code))     Ok(None)        Err(Source(_))
//!            confirmation    cancel/exhausted   device failure
//! ```
//!
//! Cancellation is a flag checked before every frame pull, never a thread
//! kill: the source finishes its current blocking read and the loop exits
//! at the next check. A cancelled scan can therefore take up to one frame
//! interval to stop, and never delivers a confirmation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use carrito_core::{ScanStabilizer, STABLE_FRAME_THRESHOLD};

use crate::source::{BarcodeDecoder, FrameError, FrameSource};

// =============================================================================
// Errors
// =============================================================================

/// Scan loop failure.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The frame source failed mid-scan.
    #[error("Frame source failed: {0}")]
    Source(#[from] FrameError),

    /// The blocking task itself died (panicked or was aborted).
    #[error("Scan task failed: {0}")]
    Task(String),
}

// =============================================================================
// Scan Loop
// =============================================================================

/// Pulls frames, decodes them, and feeds the stabilizer until a code is
/// confirmed, the flag is raised, or the source runs dry.
///
/// The loop takes ownership of `source` so the capture device is released
/// on every exit path.
///
/// ## Returns
/// * `Ok(Some(code))` - a payload survived `threshold` consecutive frames
/// * `Ok(None)` - cancelled, or the source ended without a confirmation
/// * `Err(_)` - the source failed
pub fn run_scan_loop<S, D>(
    mut source: S,
    decoder: D,
    threshold: u32,
    cancel: Arc<AtomicBool>,
) -> Result<Option<String>, ScanError>
where
    S: FrameSource,
    D: BarcodeDecoder,
{
    let mut stabilizer = ScanStabilizer::with_threshold(threshold);
    let mut frames_seen: u64 = 0;

    loop {
        if cancel.load(Ordering::SeqCst) {
            debug!(frames_seen, "Scan cancelled");
            return Ok(None);
        }

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                debug!(frames_seen, "Frame source exhausted without confirmation");
                return Ok(None);
            }
            Err(err) => {
                warn!(frames_seen, error = %err, "Frame source failed");
                return Err(ScanError::Source(err));
            }
        };
        frames_seen += 1;

        let payloads = decoder.decode(&frame);
        // Best detection first; the rest are discarded.
        let observation = payloads.first().map(String::as_str);

        if let Some(code) = stabilizer.observe(observation) {
            info!(frames_seen, code = %code, "Scan confirmed");
            return Ok(Some(code));
        }
    }
}

// =============================================================================
// Worker
// =============================================================================

/// Spawns scan loops onto the blocking thread pool.
pub struct ScanWorker;

impl ScanWorker {
    /// Starts a scan with the default confirmation threshold.
    pub fn spawn<S, D>(source: S, decoder: D) -> ScanHandle
    where
        S: FrameSource + 'static,
        D: BarcodeDecoder + 'static,
    {
        Self::spawn_with_threshold(source, decoder, STABLE_FRAME_THRESHOLD)
    }

    /// Starts a scan with an explicit confirmation threshold.
    pub fn spawn_with_threshold<S, D>(source: S, decoder: D, threshold: u32) -> ScanHandle
    where
        S: FrameSource + 'static,
        D: BarcodeDecoder + 'static,
    {
        let cancel = Arc::new(AtomicBool::new(false));
        let task_cancel = Arc::clone(&cancel);

        debug!(threshold, "Spawning scan worker");
        let task = tokio::task::spawn_blocking(move || {
            run_scan_loop(source, decoder, threshold, task_cancel)
        });

        ScanHandle { cancel, task }
    }
}

/// Handle to a running scan.
///
/// Dropping the handle does not stop the scan; call [`ScanHandle::cancel`]
/// first if the session is being torn down.
pub struct ScanHandle {
    cancel: Arc<AtomicBool>,
    task: tokio::task::JoinHandle<Result<Option<String>, ScanError>>,
}

impl ScanHandle {
    /// Raises the cancel flag. The loop exits before its next frame pull.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Waits for the scan to finish and returns its outcome.
    pub async fn join(self) -> Result<Option<String>, ScanError> {
        self.task
            .await
            .map_err(|err| ScanError::Task(err.to_string()))?
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Frame;
    use std::sync::atomic::AtomicUsize;

    /// Serves a scripted sequence of observations, one per frame. The
    /// payload rides in the frame data so the decoder can recover it.
    struct ScriptedSource {
        script: Vec<Option<&'static str>>,
        cursor: usize,
        frames_served: Arc<AtomicUsize>,
        dropped: Option<Arc<AtomicBool>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Option<&'static str>>) -> (Self, Arc<AtomicUsize>) {
            let frames_served = Arc::new(AtomicUsize::new(0));
            let source = ScriptedSource {
                script,
                cursor: 0,
                frames_served: Arc::clone(&frames_served),
                dropped: None,
            };
            (source, frames_served)
        }
    }

    impl FrameSource for ScriptedSource {
        fn next_frame(&mut self) -> Result<Option<Frame>, FrameError> {
            let Some(observation) = self.script.get(self.cursor) else {
                return Ok(None);
            };
            self.cursor += 1;
            self.frames_served.fetch_add(1, Ordering::SeqCst);
            let data = observation.map(|s| s.as_bytes().to_vec()).unwrap_or_default();
            Ok(Some(Frame::new(640, 480, data)))
        }
    }

    impl Drop for ScriptedSource {
        fn drop(&mut self) {
            if let Some(flag) = &self.dropped {
                flag.store(true, Ordering::SeqCst);
            }
        }
    }

    /// Reads the payload back out of the frame data; empty data is a miss.
    struct PayloadDecoder;

    impl BarcodeDecoder for PayloadDecoder {
        fn decode(&self, frame: &Frame) -> Vec<String> {
            if frame.data.is_empty() {
                Vec::new()
            } else {
                vec![String::from_utf8_lossy(&frame.data).into_owned()]
            }
        }
    }

    /// Misses forever, with a short blocking delay per frame.
    struct EndlessMissSource;

    impl FrameSource for EndlessMissSource {
        fn next_frame(&mut self) -> Result<Option<Frame>, FrameError> {
            std::thread::sleep(std::time::Duration::from_millis(1));
            Ok(Some(Frame::new(640, 480, Vec::new())))
        }
    }

    struct FailingSource;

    impl FrameSource for FailingSource {
        fn next_frame(&mut self) -> Result<Option<Frame>, FrameError> {
            Err(FrameError::Device("read aborted".into()))
        }
    }

    fn not_cancelled() -> Arc<AtomicBool> {
        Arc::new(AtomicBool::new(false))
    }

    #[test]
    fn loop_confirms_and_stops_consuming_frames() {
        let (source, served) = ScriptedSource::new(vec![Some("7750100000001"); 10]);

        let result = run_scan_loop(source, PayloadDecoder, 5, not_cancelled()).unwrap();

        assert_eq!(result.as_deref(), Some("7750100000001"));
        // Confirmation came on the fifth frame; the other five were never pulled.
        assert_eq!(served.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn loop_tolerates_missed_frames_mid_run() {
        let (source, served) = ScriptedSource::new(vec![
            Some("A"),
            Some("A"),
            None,
            None,
            Some("A"),
            Some("A"),
            Some("A"),
        ]);

        let result = run_scan_loop(source, PayloadDecoder, 5, not_cancelled()).unwrap();

        assert_eq!(result.as_deref(), Some("A"));
        assert_eq!(served.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn exhausted_source_yields_no_confirmation() {
        let (source, _) = ScriptedSource::new(vec![Some("A"), Some("B"), Some("A")]);

        let result = run_scan_loop(source, PayloadDecoder, 5, not_cancelled()).unwrap();

        assert_eq!(result, None);
    }

    #[test]
    fn pre_raised_flag_stops_before_the_first_frame() {
        let (source, served) = ScriptedSource::new(vec![Some("A"); 10]);
        let cancel = Arc::new(AtomicBool::new(true));

        let result = run_scan_loop(source, PayloadDecoder, 5, cancel).unwrap();

        assert_eq!(result, None);
        assert_eq!(served.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn source_failure_surfaces_as_scan_error() {
        let result = run_scan_loop(FailingSource, PayloadDecoder, 5, not_cancelled());

        assert!(matches!(result, Err(ScanError::Source(FrameError::Device(_)))));
    }

    #[test]
    fn source_is_dropped_on_confirmation() {
        let (mut source, _) = ScriptedSource::new(vec![Some("A"); 5]);
        let dropped = Arc::new(AtomicBool::new(false));
        source.dropped = Some(Arc::clone(&dropped));

        let result = run_scan_loop(source, PayloadDecoder, 5, not_cancelled()).unwrap();

        assert_eq!(result.as_deref(), Some("A"));
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn worker_confirms_through_the_handle() {
        let (source, _) = ScriptedSource::new(vec![Some("7750100000002"); 6]);

        let handle = ScanWorker::spawn(source, PayloadDecoder);
        let result = handle.join().await.unwrap();

        assert_eq!(result.as_deref(), Some("7750100000002"));
    }

    #[tokio::test]
    async fn cancelled_worker_delivers_no_confirmation() {
        let handle = ScanWorker::spawn(EndlessMissSource, PayloadDecoder);

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        handle.cancel();
        let result = handle.join().await.unwrap();

        assert_eq!(result, None);
    }
}
