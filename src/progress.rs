//! Upload progress reporting
//!
//! Wraps the caller's progress callback so that every reported value is a
//! fraction in `[0, 1]` and never goes backwards within one upload.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use std::sync::{Arc, Mutex};

/// Caller-supplied progress callback receiving the fraction of bytes sent.
pub type ProgressCallback = Arc<dyn Fn(f32) + Send + Sync>;

#[derive(Clone)]
pub struct ProgressReporter {
    callback: ProgressCallback,
    last: Arc<Mutex<f32>>,
}

impl ProgressReporter {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        Self::from_callback(Arc::new(callback))
    }

    pub fn from_callback(callback: ProgressCallback) -> Self {
        Self {
            callback,
            last: Arc::new(Mutex::new(0.0)),
        }
    }

    /// A reporter that discards every update.
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    /// Reports `sent` out of `total` bytes. Values lower than the last
    /// reported fraction are dropped.
    pub fn report(&self, sent: u64, total: u64) {
        let fraction = if total == 0 {
            1.0
        } else {
            (sent as f64 / total as f64).clamp(0.0, 1.0) as f32
        };

        {
            let mut last = match self.last.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if fraction < *last {
                return;
            }
            *last = fraction;
        }

        tracing::debug!("Upload progress: {:.1}%", fraction * 100.0);
        (self.callback)(fraction);
    }
}

/// Splits `data` into chunks and reports progress as each chunk is handed to
/// the HTTP body.
///
/// A chunk counts as sent once the HTTP client polls it, not once it has left
/// the socket, so the reported fraction can lead the actual transfer by up to
/// one buffered chunk.
pub fn progress_stream(
    data: Bytes,
    chunk_size: usize,
    progress: ProgressReporter,
) -> impl Stream<Item = std::io::Result<Bytes>> + Send + Sync + 'static {
    let total = data.len();
    let chunk_size = chunk_size.max(1);
    let mut sent = 0usize;

    stream::iter((0..total).step_by(chunk_size)).map(move |start| {
        let end = (start + chunk_size).min(total);
        let chunk = data.slice(start..end);
        sent += chunk.len();
        progress.report(sent as u64, total as u64);
        Ok::<_, std::io::Error>(chunk)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_reporter() -> (ProgressReporter, Arc<Mutex<Vec<f32>>>) {
        let values = Arc::new(Mutex::new(Vec::new()));
        let sink = values.clone();
        let reporter = ProgressReporter::new(move |fraction| sink.lock().unwrap().push(fraction));
        (reporter, values)
    }

    #[test]
    fn test_report_fraction() {
        let (reporter, values) = recording_reporter();

        reporter.report(25, 100);
        reporter.report(100, 100);

        assert_eq!(*values.lock().unwrap(), vec![0.25, 1.0]);
    }

    #[test]
    fn test_report_drops_regressions() {
        let (reporter, values) = recording_reporter();

        reporter.report(50, 100);
        reporter.report(10, 100);
        reporter.report(50, 100);
        reporter.report(75, 100);

        assert_eq!(*values.lock().unwrap(), vec![0.5, 0.5, 0.75]);
    }

    #[test]
    fn test_report_clamps_to_unit_range() {
        let (reporter, values) = recording_reporter();

        reporter.report(300, 100);
        reporter.report(0, 0);

        assert_eq!(*values.lock().unwrap(), vec![1.0, 1.0]);
    }

    #[tokio::test]
    async fn test_progress_stream_chunks_and_reports() {
        let (reporter, values) = recording_reporter();
        let data = Bytes::from(vec![7u8; 10]);

        let chunks: Vec<Bytes> = progress_stream(data, 4, reporter)
            .map(|chunk| chunk.unwrap())
            .collect()
            .await;

        let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(*values.lock().unwrap(), vec![0.4, 0.8, 1.0]);
    }

    #[tokio::test]
    async fn test_progress_stream_empty_data() {
        let (reporter, values) = recording_reporter();

        let chunks: Vec<_> = progress_stream(Bytes::new(), 4, reporter).collect().await;

        assert!(chunks.is_empty());
        assert!(values.lock().unwrap().is_empty());
    }
}
