//! Headless recording: renders frames offline and writes them as PNGs next
//! to the matching audio segment.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::canvas::PixmapCanvas;
use crate::error::{Result, VisualizerError};
use crate::params::{RecordingConfig, VisualizerConfig};
use crate::playback::{offline_transport, AudioClip, LoadedAudio, OfflineTransport};
use crate::spectrum::SampleTap;
use crate::visual::Mode;
use crate::visualizer::Visualizer;

/// Render `recording.total_frames()` frames of `file` and write the audio.
///
/// Returns the number of frames written.
pub fn record(
    mut config: VisualizerConfig,
    mode: Mode,
    file: &Path,
    recording: &RecordingConfig,
) -> Result<usize> {
    fs::create_dir_all(recording.frames_dir())?;

    let clip = Arc::new(AudioClip::decode_file(file)?);
    config.render.fps = recording.fps;
    let (width, height) = (config.render.canvas_width, config.render.canvas_height);

    let mut visualizer = Visualizer::with_analyzer(config, mode, offline_transport())?;
    let tap = SampleTap::new(
        visualizer.config().analyzer.history_len(),
        clip.sample_rate_hz(),
    );
    visualizer.on_file_loaded(LoadedAudio {
        transport: Box::new(OfflineTransport::new(Arc::clone(&clip), tap.clone())),
        tap,
        title: clip.title().to_string(),
    });

    let total = recording.total_frames();
    info!(
        "Recording {} frames at {} FPS to {}",
        total,
        recording.fps,
        recording.output_dir.display()
    );

    let mut canvas = PixmapCanvas::new(width, height)?;
    let report_every = recording.fps.max(1) as usize;
    for frame in 0..total {
        visualizer.render(&mut canvas);
        save_frame(&canvas, &recording.frame_path(frame))?;
        if frame % report_every == 0 {
            info!("Frame {}/{}", frame, total);
        }
    }

    clip.write_wav_segment(&recording.audio_path(), 0.0, recording.duration_secs)?;
    info!("Recording complete: {} frames", total);
    Ok(total)
}

/// Write the canvas as an RGBA PNG
pub fn save_frame(canvas: &PixmapCanvas, path: &Path) -> Result<()> {
    image::save_buffer(
        path,
        canvas.data(),
        canvas.width(),
        canvas.height(),
        image::ColorType::Rgba8,
    )
    .map_err(|e| VisualizerError::Render(format!("failed to save {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_frames_and_audio() {
        let dir = std::env::temp_dir().join(format!("vibescope-rec-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("input.wav");
        let samples: Vec<f32> = (0..8000)
            .map(|i| 0.5 * (i as f32 * 0.05).sin())
            .collect();
        AudioClip::from_samples(samples, 1, 8000, "input.wav")
            .write_wav_segment(&input, 0.0, 1.0)
            .unwrap();

        let mut recording = RecordingConfig::new(0.1);
        recording.output_dir = dir.join("out");
        let mut config = VisualizerConfig {
            seed: Some(1),
            ..Default::default()
        };
        config.render.canvas_width = 64;
        config.render.canvas_height = 48;

        let frames = record(config, Mode::Circle, &input, &recording).unwrap();
        assert_eq!(frames, 6);
        assert!(recording.frame_path(5).exists());
        assert!(recording.audio_path().exists());

        let png = image::open(recording.frame_path(0)).unwrap();
        assert_eq!((png.width(), png.height()), (64, 48));

        fs::remove_dir_all(&dir).ok();
    }
}
