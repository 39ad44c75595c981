//! Frame controller: owns the entity stores, the active mode and the
//! playback handle, and runs one update+draw pass per frame.

use std::path::Path;
use std::sync::Arc;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::canvas::{Canvas, Rgba};
use crate::error::Result;
use crate::params::VisualizerConfig;
use crate::playback::{is_audio_path, AudioClip, AudioLoader, LoadedAudio, Transport, TransportFactory};
use crate::progress::{format_time, ProgressDisplay};
use crate::spectrum::{SampleTap, SpectrumAnalyzer, SpectrumFeatures, SpectrumSource};
use crate::visual::{CellGrid, Mode, NetworkField, RingSet};

/// Entity stores and mode selection
pub struct VisualizerState {
    pub network: NetworkField,
    pub grid: CellGrid,
    pub rings: RingSet,
    /// `None` after an unrecognized mode name: only the background is drawn
    pub mode: Option<Mode>,
    pub size: Vec2,
    rng: StdRng,
}

impl VisualizerState {
    pub fn new(config: &VisualizerConfig, size: Vec2, mode: Mode) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            network: NetworkField::new(&config.network, size, &mut rng),
            grid: CellGrid::new(&config.grid, size, &mut rng),
            rings: RingSet::new(&config.circle, size),
            mode: Some(mode),
            size,
            rng,
        }
    }

    /// Fresh entities for every mode at the current size
    pub fn rebuild(&mut self, config: &VisualizerConfig) {
        self.network = NetworkField::new(&config.network, self.size, &mut self.rng);
        self.grid = CellGrid::new(&config.grid, self.size, &mut self.rng);
        self.rings = RingSet::new(&config.circle, self.size);
    }

    /// Network points keep their relative positions; grid and rings are rebuilt
    pub fn resize(&mut self, size: Vec2, config: &VisualizerConfig) {
        self.network.resize(size, &config.network);
        self.size = size;
        self.grid = CellGrid::new(&config.grid, size, &mut self.rng);
        self.rings = RingSet::new(&config.circle, size);
    }
}

pub struct Visualizer {
    config: VisualizerConfig,
    state: VisualizerState,
    spectrum: Box<dyn SpectrumSource>,
    make_transport: TransportFactory,
    loader: AudioLoader,
    transport: Option<Box<dyn Transport>>,
    /// Set once a transport is attached and playing has been requested
    loaded: bool,
    title: Option<String>,
    progress: ProgressDisplay,
    pointer: Option<Vec2>,
}

impl Visualizer {
    pub fn new(
        config: VisualizerConfig,
        mode: Mode,
        spectrum: Box<dyn SpectrumSource>,
        make_transport: TransportFactory,
    ) -> Self {
        let size = Vec2::new(
            config.render.canvas_width as f32,
            config.render.canvas_height as f32,
        );
        let state = VisualizerState::new(&config, size, mode);
        info!(
            "Visualizer ready: {}x{}, mode {}",
            size.x, size.y, mode
        );
        Self {
            config,
            state,
            spectrum,
            make_transport,
            loader: AudioLoader::new(),
            transport: None,
            loaded: false,
            title: None,
            progress: ProgressDisplay::default(),
            pointer: None,
        }
    }

    /// Visualizer backed by the FFT analyzer
    pub fn with_analyzer(
        config: VisualizerConfig,
        mode: Mode,
        make_transport: TransportFactory,
    ) -> Result<Self> {
        let analyzer = SpectrumAnalyzer::new(config.analyzer.clone())?;
        Ok(Self::new(config, mode, Box::new(analyzer), make_transport))
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn state(&self) -> &VisualizerState {
        &self.state
    }

    pub fn mode(&self) -> Option<Mode> {
        self.state.mode
    }

    pub fn progress(&self) -> &ProgressDisplay {
        &self.progress
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_pending()
    }

    pub fn is_playing(&self) -> bool {
        self.loaded && self.transport.as_ref().is_some_and(|t| t.is_playing())
    }

    pub fn volume(&self) -> Option<f32> {
        self.transport.as_ref().map(|t| t.volume())
    }

    /// One frame: pick up finished loads, advance playback, read features
    /// (silence unless loaded and playing), update progress, then draw.
    pub fn render(&mut self, canvas: &mut dyn Canvas) {
        if let Some(outcome) = self.loader.poll() {
            self.finish_load(outcome);
        }

        let frame_dt = self.config.render.frame_duration_s();
        let mut features = SpectrumFeatures::silent();
        if let (true, Some(transport)) = (self.loaded, self.transport.as_mut()) {
            transport.on_frame(frame_dt);
            if transport.is_playing() {
                features = self.spectrum.features();
            }
            self.progress
                .update(&**transport, self.config.playback.progress_blend);
        }

        self.render_frame(&features, canvas);
    }

    /// Clear and draw the active mode with the given features
    pub fn render_frame(&mut self, features: &SpectrumFeatures, canvas: &mut dyn Canvas) {
        canvas.clear(Rgba::gray(self.config.render.background_gray, 255));

        let state = &mut self.state;
        match state.mode {
            Some(Mode::Network) => {
                state
                    .network
                    .render(features.level, self.pointer, canvas, &self.config.network)
            }
            Some(Mode::Grid) => state.grid.render(features, canvas, &self.config.grid),
            Some(Mode::Circle) => state.rings.render(features, canvas, &self.config.circle),
            None => {}
        }
    }

    /// Switch renderers; other modes keep their entity state
    pub fn set_mode(&mut self, mode: Mode) {
        if self.state.mode != Some(mode) {
            info!("Mode: {}", mode);
        }
        self.state.mode = Some(mode);
    }

    /// Switch by name. Unknown names leave no mode active.
    pub fn select_mode(&mut self, name: &str) {
        match name.parse::<Mode>() {
            Ok(mode) => self.set_mode(mode),
            Err(e) => {
                warn!("{}; drawing background only", e);
                self.state.mode = None;
            }
        }
    }

    /// Rebuild every entity store at the current size
    pub fn reinitialize(&mut self) {
        self.state.rebuild(&self.config);
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            debug!("Ignoring resize to {}x{}", width, height);
            return;
        }
        let size = Vec2::new(width as f32, height as f32);
        if size == self.state.size {
            return;
        }
        debug!("Canvas resized to {}x{}", width, height);
        self.state.resize(size, &self.config);
    }

    /// Start loading `path` in the background.
    ///
    /// Non-audio files are ignored. Otherwise the current playback is
    /// released first, and the visualizer idles until the load finishes.
    pub fn select_file(&mut self, path: &Path) {
        if !is_audio_path(path) {
            warn!("Ignoring {}: not an audio file", path.display());
            return;
        }

        self.release_transport();
        if let Err(e) = self.loader.request(path) {
            warn!("Could not start loading {}: {}", path.display(), e);
        }
    }

    /// Block until the pending load finishes; returns whether audio is loaded
    pub fn wait_for_load(&mut self) -> bool {
        if let Some(outcome) = self.loader.wait() {
            self.finish_load(outcome);
        }
        self.loaded
    }

    /// Wire the analyzer to the new audio and begin playback
    pub fn on_file_loaded(&mut self, audio: LoadedAudio) {
        let LoadedAudio {
            mut transport,
            tap,
            title,
        } = audio;
        self.release_transport();

        self.spectrum.set_input(tap);
        transport.set_volume(self.config.playback.initial_volume);
        if let Err(e) = transport.play() {
            warn!("Playback did not start: {}", e);
        }
        info!(
            "Loaded '{}' ({})",
            title,
            format_time(transport.duration())
        );

        self.transport = Some(transport);
        self.title = Some(title);
        self.loaded = true;
    }

    pub fn toggle_play(&mut self) {
        let Some(transport) = self.loaded_transport() else {
            return;
        };
        let result = if transport.is_playing() {
            transport.pause()
        } else {
            transport.play()
        };
        if let Err(e) = result {
            warn!("Play/pause failed: {}", e);
        }
    }

    /// Seek relative to the current position
    pub fn seek_by(&mut self, delta_s: f32) {
        if let Some(transport) = self.loaded_transport() {
            let target = transport.current_time() + delta_s;
            transport.seek(target);
        }
    }

    /// Seek to a fraction (0-1) of the duration; ignored while unknown
    pub fn seek_to_fraction(&mut self, fraction: f32) {
        let Some(transport) = self.loaded_transport() else {
            return;
        };
        let duration = transport.duration();
        if duration.is_finite() && duration > 0.0 && fraction.is_finite() {
            transport.seek(fraction.clamp(0.0, 1.0) * duration);
        }
    }

    /// Change volume by `delta`, returning the new volume
    pub fn adjust_volume(&mut self, delta: f32) -> Option<f32> {
        let transport = self.loaded_transport()?;
        transport.set_volume((transport.volume() + delta).clamp(0.0, 1.0));
        Some(transport.volume())
    }

    /// Pointer position in canvas pixels; `None` when it leaves the window
    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        self.pointer = pointer;
    }

    /// Short status for a window title
    pub fn status_line(&self) -> String {
        match (&self.title, self.loaded) {
            (Some(title), true) => {
                let state = if self.is_playing() { "playing" } else { "paused" };
                format!(
                    "{} [{} / {}] {}",
                    title, self.progress.current_label, self.progress.duration_label, state
                )
            }
            _ if self.loader.is_pending() => "loading...".to_string(),
            _ => "drop an audio file".to_string(),
        }
    }

    fn loaded_transport(&mut self) -> Option<&mut Box<dyn Transport>> {
        if self.loaded {
            self.transport.as_mut()
        } else {
            None
        }
    }

    /// Best-effort stop of the current playback; failures are only logged
    fn release_transport(&mut self) {
        if let Some(mut old) = self.transport.take() {
            if let Err(e) = old.stop() {
                debug!("Ignoring error while releasing playback: {}", e);
            }
        }
        self.loaded = false;
        self.title = None;
        self.progress.reset();
    }

    fn finish_load(&mut self, outcome: Result<AudioClip>) {
        match outcome.and_then(|clip| self.prepare(clip)) {
            Ok(audio) => self.on_file_loaded(audio),
            Err(e) => warn!("Audio failed to load: {}", e),
        }
    }

    fn prepare(&mut self, clip: AudioClip) -> Result<LoadedAudio> {
        let clip = Arc::new(clip);
        let tap = SampleTap::new(self.config.analyzer.history_len(), clip.sample_rate_hz());
        let transport = (self.make_transport)(Arc::clone(&clip), tap.clone())?;
        Ok(LoadedAudio {
            transport,
            tap,
            title: clip.title().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{CommandRecorder, DrawCommand};
    use crate::playback::offline_transport;

    fn config() -> VisualizerConfig {
        VisualizerConfig {
            seed: Some(42),
            ..Default::default()
        }
    }

    fn visualizer() -> Visualizer {
        Visualizer::with_analyzer(config(), Mode::Network, offline_transport()).unwrap()
    }

    fn tone_file(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("vibescope-vis-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let rate = 22050;
        let samples: Vec<f32> = (0..rate * 2)
            .map(|i| 0.6 * (2.0 * std::f32::consts::PI * 80.0 * i as f32 / rate as f32).sin())
            .collect();
        AudioClip::from_samples(samples, 1, rate as u32, name)
            .write_wav_segment(&path, 0.0, 2.0)
            .unwrap();
        path
    }

    #[test]
    fn test_idle_frame_draws_network() {
        let mut vis = visualizer();
        let mut canvas = CommandRecorder::new(800.0, 800.0);
        vis.render(&mut canvas);

        assert!(matches!(canvas.commands()[0], DrawCommand::Clear(_)));
        assert_eq!(canvas.ellipses().count(), 35);
        assert!(!vis.is_loaded());
    }

    #[test]
    fn test_unknown_mode_draws_background_only() {
        let mut vis = visualizer();
        vis.select_mode("kaleidoscope");
        assert_eq!(vis.mode(), None);

        let mut canvas = CommandRecorder::new(800.0, 800.0);
        vis.render(&mut canvas);
        assert_eq!(canvas.commands().len(), 1);

        vis.select_mode("circle");
        assert_eq!(vis.mode(), Some(Mode::Circle));
    }

    #[test]
    fn test_switching_modes_keeps_other_stores() {
        let mut vis = visualizer();
        let mut canvas = CommandRecorder::new(800.0, 800.0);
        let loud = SpectrumFeatures::new(1.0, 1.0, 1.0, 1.0);

        vis.set_mode(Mode::Grid);
        vis.render_frame(&loud, &mut canvas);
        let warmed = vis.state().grid.cells()[0].bass.value;
        assert!(warmed > 0.0);

        vis.set_mode(Mode::Network);
        vis.render_frame(&loud, &mut canvas);
        vis.set_mode(Mode::Grid);
        assert_eq!(vis.state().grid.cells()[0].bass.value, warmed);
    }

    #[test]
    fn test_controls_ignored_until_loaded() {
        let mut vis = visualizer();
        vis.toggle_play();
        vis.seek_by(5.0);
        vis.seek_to_fraction(0.5);
        assert_eq!(vis.adjust_volume(0.1), None);
        assert!(!vis.is_playing());
    }

    #[test]
    fn test_non_audio_file_is_ignored() {
        let mut vis = visualizer();
        vis.select_file(Path::new("notes.txt"));
        assert!(!vis.is_loading());
        assert!(!vis.is_loaded());
    }

    #[test]
    fn test_failed_load_stays_idle() {
        let mut vis = visualizer();
        vis.select_file(Path::new("/nonexistent/vibescope/missing.wav"));
        assert!(!vis.wait_for_load());

        let mut canvas = CommandRecorder::new(800.0, 800.0);
        vis.render(&mut canvas);
        assert!(!vis.is_loaded());
        assert_eq!(vis.status_line(), "drop an audio file");
    }

    #[test]
    fn test_loaded_file_plays_and_reacts() {
        let path = tone_file("bass-tone.wav");
        let mut vis = visualizer();
        vis.select_file(&path);
        assert!(vis.wait_for_load());
        assert!(vis.is_playing());
        assert_eq!(vis.title(), Some("bass-tone.wav"));
        assert_eq!(vis.volume(), Some(0.8));

        let mut canvas = CommandRecorder::new(800.0, 800.0);
        for _ in 0..30 {
            vis.render(&mut canvas);
        }
        assert!(vis.progress().percent > 0.0);
        assert_eq!(vis.progress().duration_label, "0:02");

        vis.toggle_play();
        assert!(!vis.is_playing());
        assert_eq!(vis.adjust_volume(0.5), Some(1.0));

        vis.seek_to_fraction(0.5);
        vis.toggle_play();
        vis.render(&mut canvas);
        assert!(vis.status_line().starts_with("bass-tone.wav [0:01 / 0:02]"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_resize_rescales_and_rebuilds() {
        let mut vis = visualizer();
        vis.on_resize(400, 200);
        assert_eq!(vis.state().size, Vec2::new(400.0, 200.0));
        assert_eq!(vis.state().grid.bounds(), Vec2::new(400.0, 200.0));
        for p in vis.state().network.points() {
            assert!(p.pos.x <= 400.0 && p.pos.y <= 200.0);
        }

        // Minimized windows report zero size
        vis.on_resize(0, 0);
        assert_eq!(vis.state().size, Vec2::new(400.0, 200.0));
    }
}
