//! End-to-end frame scenarios driven by a scripted spectrum source.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

use vibescope::canvas::CommandRecorder;
use vibescope::params::VisualizerConfig;
use vibescope::playback::{offline_transport, LoadedAudio, Transport};
use vibescope::spectrum::{Band, SampleTap, SpectrumFeatures, SpectrumSource};
use vibescope::{Mode, Visualizer, VisualizerError};

/// Spectrum source that reports whatever the test sets
struct ScriptedSpectrum {
    features: Rc<Cell<SpectrumFeatures>>,
    bins: Vec<f32>,
}

impl SpectrumSource for ScriptedSpectrum {
    fn set_input(&mut self, _tap: SampleTap) {}

    fn analyze_spectrum(&mut self) -> &[f32] {
        &self.bins
    }

    fn overall_level(&self) -> f32 {
        self.features.get().level
    }

    fn band_energy(&self, band: Band) -> f32 {
        self.features.get().band(band)
    }
}

/// Transport that is always playing a 60 second clip
struct EndlessTransport {
    playing: bool,
    time: f32,
    volume: f32,
}

impl Transport for EndlessTransport {
    fn play(&mut self) -> vibescope::Result<()> {
        self.playing = true;
        Ok(())
    }
    fn pause(&mut self) -> vibescope::Result<()> {
        self.playing = false;
        Ok(())
    }
    fn stop(&mut self) -> vibescope::Result<()> {
        self.playing = false;
        Ok(())
    }
    fn seek(&mut self, time_s: f32) {
        self.time = time_s.clamp(0.0, 60.0);
    }
    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
    fn volume(&self) -> f32 {
        self.volume
    }
    fn is_playing(&self) -> bool {
        self.playing
    }
    fn current_time(&self) -> f32 {
        self.time
    }
    fn duration(&self) -> f32 {
        60.0
    }
    fn on_frame(&mut self, frame_dt_s: f32) {
        if self.playing {
            self.time += frame_dt_s;
        }
    }
}

/// Transport whose device refuses to stop
struct StuckTransport {
    stop_attempts: Rc<Cell<u32>>,
}

impl Transport for StuckTransport {
    fn play(&mut self) -> vibescope::Result<()> {
        Ok(())
    }
    fn pause(&mut self) -> vibescope::Result<()> {
        Ok(())
    }
    fn stop(&mut self) -> vibescope::Result<()> {
        self.stop_attempts.set(self.stop_attempts.get() + 1);
        Err(VisualizerError::Stream("device vanished".to_string()))
    }
    fn seek(&mut self, _time_s: f32) {}
    fn set_volume(&mut self, _volume: f32) {}
    fn volume(&self) -> f32 {
        1.0
    }
    fn is_playing(&self) -> bool {
        true
    }
    fn current_time(&self) -> f32 {
        0.0
    }
    fn duration(&self) -> f32 {
        30.0
    }
}

fn playing_visualizer(mode: Mode) -> (Visualizer, Rc<Cell<SpectrumFeatures>>) {
    let features = Rc::new(Cell::new(SpectrumFeatures::silent()));
    let spectrum = ScriptedSpectrum {
        features: Rc::clone(&features),
        bins: vec![0.0; 128],
    };
    let config = VisualizerConfig {
        seed: Some(2024),
        ..Default::default()
    };
    let mut vis = Visualizer::new(config, mode, Box::new(spectrum), offline_transport());
    vis.on_file_loaded(LoadedAudio {
        transport: Box::new(EndlessTransport {
            playing: false,
            time: 0.0,
            volume: 1.0,
        }),
        tap: SampleTap::new(1024, 44100),
        title: "scripted".to_string(),
    });
    assert!(vis.is_playing());
    (vis, features)
}

#[test]
fn silent_network_never_links_beyond_base_distance() {
    let (mut vis, _features) = playing_visualizer(Mode::Network);
    vis.reinitialize();
    let base = vis.config().network.base_connect_distance;

    let mut canvas = CommandRecorder::new(800.0, 800.0);
    for _ in 0..240 {
        canvas.take();
        vis.render(&mut canvas);
        for (from, to, _) in canvas.lines() {
            assert!(from.distance(to) < base, "line of {} px", from.distance(to));
        }
    }
}

#[test]
fn switching_to_grid_resumes_stale_intensities() {
    let (mut vis, features) = playing_visualizer(Mode::Grid);
    let mut canvas = CommandRecorder::new(800.0, 800.0);

    features.set(SpectrumFeatures::new(0.9, 1.0, 0.8, 0.6));
    for _ in 0..20 {
        vis.render(&mut canvas);
    }
    let stale: Vec<f32> = vis.state().grid.cells().iter().map(|c| c.bass.value).collect();

    // Network mid-playback, with different audio
    vis.set_mode(Mode::Network);
    features.set(SpectrumFeatures::silent());
    for _ in 0..20 {
        vis.render(&mut canvas);
    }
    let untouched: Vec<f32> = vis.state().grid.cells().iter().map(|c| c.bass.value).collect();
    assert_eq!(stale, untouched);

    vis.set_mode(Mode::Grid);
    canvas.take();
    vis.render(&mut canvas);
    assert_eq!(canvas.rects().filter(|(_, _, s)| s.stroke.is_some()).count(), 100);
    let blend = vis.config().grid.channel_blend;
    for (cell, before) in vis.state().grid.cells().iter().zip(&stale) {
        assert!((cell.bass.value - before * (1.0 - blend)).abs() < 1e-5);
    }
}

#[test]
fn resize_repositions_points_proportionally() {
    let (mut vis, features) = playing_visualizer(Mode::Network);
    features.set(SpectrumFeatures::new(0.4, 0.5, 0.5, 0.5));
    let mut canvas = CommandRecorder::new(800.0, 800.0);
    for _ in 0..10 {
        vis.render(&mut canvas);
    }

    let before: Vec<Vec2> = vis.state().network.points().iter().map(|p| p.pos).collect();
    vis.on_resize(400, 400);
    for (old, p) in before.iter().zip(vis.state().network.points()) {
        let expected = (*old / 800.0 * 400.0).clamp(Vec2::ZERO, Vec2::splat(400.0));
        assert!((p.pos - expected).length() < 1e-3);
        assert!(p.pos.x >= 0.0 && p.pos.x <= 400.0);
        assert!(p.pos.y >= 0.0 && p.pos.y <= 400.0);
    }
}

#[test]
fn silence_settles_grid_and_rings() {
    for mode in [Mode::Grid, Mode::Circle] {
        let (mut vis, features) = playing_visualizer(mode);
        let mut canvas = CommandRecorder::new(800.0, 800.0);

        features.set(SpectrumFeatures::new(1.0, 1.0, 1.0, 1.0));
        for _ in 0..30 {
            vis.render(&mut canvas);
        }
        features.set(SpectrumFeatures::silent());
        for _ in 0..400 {
            vis.render(&mut canvas);
        }

        for cell in vis.state().grid.cells() {
            assert!(cell.bass.value < 1e-4 && cell.mid.value < 1e-4 && cell.treble.value < 1e-4);
        }
        for ring in vis.state().rings.rings() {
            assert!(ring.opacity < 1e-2);
            assert!((ring.radius - ring.base_radius).abs() < 1e-2);
        }
    }
}

#[test]
fn paused_playback_reads_silence() {
    let (mut vis, features) = playing_visualizer(Mode::Circle);
    features.set(SpectrumFeatures::new(1.0, 1.0, 1.0, 1.0));
    vis.toggle_play();
    assert!(!vis.is_playing());

    let mut canvas = CommandRecorder::new(800.0, 800.0);
    vis.render(&mut canvas);
    assert!(vis.state().rings.rings().iter().all(|r| r.opacity == 0.0));
}

#[test]
fn failed_release_does_not_block_next_file() {
    let (mut vis, _features) = playing_visualizer(Mode::Circle);
    let stop_attempts = Rc::new(Cell::new(0));
    vis.on_file_loaded(LoadedAudio {
        transport: Box::new(StuckTransport {
            stop_attempts: Rc::clone(&stop_attempts),
        }),
        tap: SampleTap::new(1024, 44100),
        title: "stuck".to_string(),
    });
    assert_eq!(vis.title(), Some("stuck"));

    vis.on_file_loaded(LoadedAudio {
        transport: Box::new(EndlessTransport {
            playing: false,
            time: 0.0,
            volume: 1.0,
        }),
        tap: SampleTap::new(1024, 44100),
        title: "next".to_string(),
    });

    assert_eq!(stop_attempts.get(), 1);
    assert!(vis.is_loaded());
    assert!(vis.is_playing());
    assert_eq!(vis.title(), Some("next"));

    let mut canvas = CommandRecorder::new(800.0, 800.0);
    vis.render(&mut canvas);
    assert_eq!(vis.progress().duration_label, "1:00");
}
