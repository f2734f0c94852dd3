use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use serde::Serialize;

use super::decode::DecodedAudio;
use super::{resample, PlaybackError};

/// Lifecycle of the single allowed playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPhase {
    Idle,
    Requesting,
    Playing,
}

/// Snapshot of the controller for the UI: which phase we are in and
/// which piece of content (by logical tag) is being read aloud.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackStatus {
    pub phase: PlaybackPhase,
    pub tag: Option<String>,
}

/// The process-wide audio output. Opened lazily on the first playback
/// and reused for the lifetime of the controller; samples are fed to
/// the cpal callback through a shared queue, silence when empty.
struct OutputDevice {
    _stream: cpal::Stream,
    queue: Arc<Mutex<VecDeque<f32>>>,
    sample_rate: u32,
}

// Safety: cpal::Stream wraps a platform audio handle that is only ever
// reached through the Mutex in PlaybackController, so concurrent access
// to the stream is impossible.
unsafe impl Send for OutputDevice {}

impl OutputDevice {
    fn open() -> Result<Self, PlaybackError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| PlaybackError::Device("no output device available".into()))?;

        let config = device
            .default_output_config()
            .map_err(|e| PlaybackError::Device(format!("no default output config: {e}")))?;

        let stream_config: cpal::StreamConfig = config.into();
        let sample_rate = stream_config.sample_rate.0;
        let channels = stream_config.channels as usize;

        let queue: Arc<Mutex<VecDeque<f32>>> = Arc::new(Mutex::new(VecDeque::new()));
        let callback_queue = Arc::clone(&queue);

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut q = callback_queue.lock().unwrap();
                    // Mono source: replicate the sample across device channels.
                    for frame in data.chunks_mut(channels) {
                        let sample = q.pop_front().unwrap_or(0.0);
                        frame.fill(sample);
                    }
                },
                |err| {
                    tracing::error!("Audio output error: {}", err);
                },
                None,
            )
            .map_err(|e| PlaybackError::Device(format!("failed to build output stream: {e}")))?;

        stream
            .play()
            .map_err(|e| PlaybackError::Device(format!("failed to start output stream: {e}")))?;

        tracing::info!("Audio output opened ({}Hz, {} channels)", sample_rate, channels);

        Ok(Self {
            _stream: stream,
            queue,
            sample_rate,
        })
    }

    fn enqueue(&self, samples: &[f32]) {
        self.queue.lock().unwrap().extend(samples.iter().copied());
    }

    fn pending(&self) -> usize {
        self.queue.lock().unwrap().len()
    }
}

struct ControllerInner {
    phase: PlaybackPhase,
    tag: Option<String>,
}

/// Serializes access to the audio output: at most one playback session
/// exists at a time, identified by a logical tag. There is no stop or
/// cancel; a session runs to natural completion and concurrent
/// requests are rejected rather than queued.
pub struct PlaybackController {
    inner: Mutex<ControllerInner>,
    device: Mutex<Option<OutputDevice>>,
}

impl PlaybackController {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ControllerInner {
                phase: PlaybackPhase::Idle,
                tag: None,
            }),
            device: Mutex::new(None),
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        let inner = self.inner.lock().unwrap();
        PlaybackStatus {
            phase: inner.phase,
            tag: inner.tag.clone(),
        }
    }

    /// Try to claim the controller for a new session. Returns false if
    /// a session is already requesting or playing; the caller should
    /// drop the request (no queueing, no preemption).
    pub fn try_begin(&self, tag: &str) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.phase != PlaybackPhase::Idle {
            tracing::debug!(
                "Playback request '{}' rejected: busy with '{}'",
                tag,
                inner.tag.as_deref().unwrap_or("?")
            );
            return false;
        }
        inner.phase = PlaybackPhase::Requesting;
        inner.tag = Some(tag.to_string());
        true
    }

    /// Abandon a session that never reached playback (synthesis failed
    /// or the payload would not decode). Returns the controller to idle
    /// so the next request is not blocked.
    pub fn abort(&self) {
        let mut inner = self.inner.lock().unwrap();
        tracing::info!(
            "Playback '{}' aborted before start",
            inner.tag.as_deref().unwrap_or("?")
        );
        inner.phase = PlaybackPhase::Idle;
        inner.tag = None;
    }

    /// Hand a decoded buffer to the output device and enter `Playing`.
    /// Must follow a successful `try_begin`. Observable via `status()`
    /// as soon as this returns; on failure the controller is reset to
    /// idle instead.
    pub fn start_playing(&self, audio: DecodedAudio) -> Result<(), PlaybackError> {
        match self.start_inner(audio) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.finish();
                Err(e)
            }
        }
    }

    fn start_inner(&self, audio: DecodedAudio) -> Result<(), PlaybackError> {
        let (enqueued, device_rate) = {
            let mut guard = self.device.lock().unwrap();
            if guard.is_none() {
                *guard = Some(OutputDevice::open()?);
            }
            let device = guard.as_ref().unwrap();

            let mono = audio.downmix();
            let samples = resample::resample(&mono, audio.sample_rate, device.sample_rate)
                .map_err(|e| PlaybackError::Device(format!("resampling failed: {e}")))?;
            device.enqueue(&samples);
            (samples.len(), device.sample_rate)
        };

        let mut inner = self.inner.lock().unwrap();
        inner.phase = PlaybackPhase::Playing;
        tracing::info!(
            "Playing '{}': {} samples at {}Hz",
            inner.tag.as_deref().unwrap_or("?"),
            enqueued,
            device_rate
        );
        Ok(())
    }

    /// Wait for the active playback to run to natural completion (the
    /// output queue running dry), then return the controller to idle.
    pub async fn wait_until_idle(&self) {
        loop {
            let pending = {
                let guard = self.device.lock().unwrap();
                guard.as_ref().map(|d| d.pending()).unwrap_or(0)
            };
            if pending == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        // Grace period so the hardware flushes the tail.
        tokio::time::sleep(Duration::from_millis(100)).await;

        self.finish();
    }

    fn finish(&self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.phase == PlaybackPhase::Playing {
            tracing::info!(
                "Playback '{}' finished",
                inner.tag.as_deref().unwrap_or("?")
            );
        }
        inner.phase = PlaybackPhase::Idle;
        inner.tag = None;
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let controller = PlaybackController::new();
        let status = controller.status();
        assert_eq!(status.phase, PlaybackPhase::Idle);
        assert!(status.tag.is_none());
    }

    #[test]
    fn begins_from_idle_and_records_tag() {
        let controller = PlaybackController::new();
        assert!(controller.try_begin("commentary"));

        let status = controller.status();
        assert_eq!(status.phase, PlaybackPhase::Requesting);
        assert_eq!(status.tag.as_deref(), Some("commentary"));
    }

    #[test]
    fn rejects_concurrent_requests() {
        let controller = PlaybackController::new();
        assert!(controller.try_begin("commentary"));

        // Second request must be rejected without touching the session.
        assert!(!controller.try_begin("declaration"));
        let status = controller.status();
        assert_eq!(status.phase, PlaybackPhase::Requesting);
        assert_eq!(status.tag.as_deref(), Some("commentary"));
    }

    #[test]
    fn rejects_requests_while_playing() {
        let controller = PlaybackController::new();
        assert!(controller.try_begin("commentary"));
        controller.inner.lock().unwrap().phase = PlaybackPhase::Playing;

        assert!(!controller.try_begin("declaration"));
        let status = controller.status();
        assert_eq!(status.phase, PlaybackPhase::Playing);
        assert_eq!(status.tag.as_deref(), Some("commentary"));
    }

    #[tokio::test]
    async fn playing_phase_is_observable_until_playback_ends() {
        let controller = PlaybackController::new();
        assert!(controller.try_begin("commentary"));
        // Enter the playing phase directly; no device exists in tests,
        // so the queue counts as already drained.
        controller.inner.lock().unwrap().phase = PlaybackPhase::Playing;

        let status = controller.status();
        assert_eq!(status.phase, PlaybackPhase::Playing);
        assert_eq!(status.tag.as_deref(), Some("commentary"));

        controller.wait_until_idle().await;
        let status = controller.status();
        assert_eq!(status.phase, PlaybackPhase::Idle);
        assert!(status.tag.is_none());

        // The next request is free to proceed.
        assert!(controller.try_begin("declaration"));
    }

    #[test]
    fn abort_recovers_to_idle() {
        let controller = PlaybackController::new();
        assert!(controller.try_begin("commentary"));
        controller.abort();

        let status = controller.status();
        assert_eq!(status.phase, PlaybackPhase::Idle);
        assert!(status.tag.is_none());

        // A later request for different content succeeds normally.
        assert!(controller.try_begin("declaration"));
        assert_eq!(controller.status().tag.as_deref(), Some("declaration"));
    }
}
