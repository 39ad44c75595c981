//! Shared history of recently played samples.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

struct TapBuffer {
    samples: VecDeque<f32>,
    capacity: usize,
    sample_rate_hz: u32,
}

/// Bounded mono sample history written by a transport and read by the analyzer.
///
/// Cloning shares the same history.
#[derive(Clone)]
pub struct SampleTap {
    inner: Arc<Mutex<TapBuffer>>,
}

impl SampleTap {
    pub fn new(capacity: usize, sample_rate_hz: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TapBuffer {
                samples: VecDeque::with_capacity(capacity),
                capacity: capacity.max(1),
                sample_rate_hz,
            })),
        }
    }

    // A panicking writer cannot leave the history in an invalid state.
    fn lock(&self) -> MutexGuard<'_, TapBuffer> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.lock().sample_rate_hz
    }

    /// Relabel the rate the samples are played at. History recorded at the
    /// old rate is dropped.
    pub fn set_sample_rate_hz(&self, sample_rate_hz: u32) {
        let mut buf = self.lock();
        if buf.sample_rate_hz != sample_rate_hz {
            buf.samples.clear();
            buf.sample_rate_hz = sample_rate_hz;
        }
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.lock().samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append samples, evicting the oldest beyond capacity
    pub fn push_slice(&self, samples: &[f32]) {
        let mut buf = self.lock();
        for &s in samples {
            if buf.samples.len() == buf.capacity {
                buf.samples.pop_front();
            }
            buf.samples.push_back(s);
        }
    }

    /// Drop all history (after a seek)
    pub fn clear(&self) {
        self.lock().samples.clear();
    }

    /// Copy the newest `out.len()` samples into `out`, zero-padding at the
    /// front when fewer are available. Returns the number of real samples.
    pub fn copy_latest(&self, out: &mut [f32]) -> usize {
        let buf = self.lock();
        let available = buf.samples.len().min(out.len());
        let pad = out.len() - available;
        out[..pad].fill(0.0);
        let skip = buf.samples.len() - available;
        for (dst, src) in out[pad..].iter_mut().zip(buf.samples.iter().skip(skip)) {
            *dst = *src;
        }
        available
    }
}

impl std::fmt::Debug for SampleTap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let buf = self.lock();
        f.debug_struct("SampleTap")
            .field("len", &buf.samples.len())
            .field("capacity", &buf.capacity)
            .field("sample_rate_hz", &buf.sample_rate_hz)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_evicts_oldest() {
        let tap = SampleTap::new(4, 44100);
        tap.push_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(tap.len(), 4);

        let mut out = [0.0; 4];
        assert_eq!(tap.copy_latest(&mut out), 4);
        assert_eq!(out, [3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_copy_latest_pads_front() {
        let tap = SampleTap::new(16, 44100);
        tap.push_slice(&[0.5, 0.25]);

        let mut out = [9.0; 4];
        assert_eq!(tap.copy_latest(&mut out), 2);
        assert_eq!(out, [0.0, 0.0, 0.5, 0.25]);
    }

    #[test]
    fn test_clones_share_history() {
        let tap = SampleTap::new(8, 48000);
        let writer = tap.clone();
        writer.push_slice(&[1.0]);
        assert_eq!(tap.len(), 1);
        tap.clear();
        assert!(writer.is_empty());
    }

    #[test]
    fn test_relabel_drops_history_only_on_change() {
        let tap = SampleTap::new(8, 22050);
        tap.push_slice(&[0.5, 0.5]);
        tap.set_sample_rate_hz(22050);
        assert_eq!(tap.len(), 2);

        tap.set_sample_rate_hz(48000);
        assert_eq!(tap.sample_rate_hz(), 48000);
        assert!(tap.is_empty());
    }
}
