//! Decoded audio clips.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use crate::error::{Result, VisualizerError};

/// Extensions treated as audio when a file is selected
const AUDIO_EXTENSIONS: &[&str] = &[
    "wav", "wave", "mp3", "ogg", "oga", "flac", "m4a", "aac", "aif", "aiff",
];

/// Whether a path looks like an audio file (by extension)
pub fn is_audio_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Interleaved f32 PCM held in memory
#[derive(Debug, Clone)]
pub struct AudioClip {
    samples: Vec<f32>,
    channels: u16,
    sample_rate_hz: u32,
    title: String,
}

impl AudioClip {
    pub fn from_samples(
        samples: Vec<f32>,
        channels: u16,
        sample_rate_hz: u32,
        title: impl Into<String>,
    ) -> Self {
        let channels = channels.max(1);
        let frames = samples.len() / channels as usize;
        let mut samples = samples;
        samples.truncate(frames * channels as usize);
        Self {
            samples,
            channels,
            sample_rate_hz: sample_rate_hz.max(1),
            title: title.into(),
        }
    }

    /// Decode the default track of an audio file (any container and codec
    /// symphonia reads) into interleaved f32.
    pub fn decode_file(path: &Path) -> Result<Self> {
        let decode_err = |source| VisualizerError::Decode {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(|e| decode_err(SymphoniaError::IoError(e)))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // The extension is only a hint; the format is detected from the content
        let mut hint = Hint::new();
        if let Some(ext) = path.extension() {
            hint.with_extension(&ext.to_string_lossy());
        }

        let detected = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(decode_err)?;
        let mut format = detected.format;

        let track = format
            .default_track()
            .ok_or_else(|| decode_err(SymphoniaError::Unsupported("no audio track")))?;
        let track_id = track.id;
        let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(0);
        let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(decode_err)?;

        let mut samples: Vec<f32> = Vec::new();
        let mut sample_buf: Option<SampleBuffer<f32>> = None;
        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => return Err(decode_err(e)),
            };
            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                // Corrupt packet: skip it and keep going
                Err(SymphoniaError::DecodeError(e)) => {
                    warn!("Skipping undecodable packet in {}: {}", path.display(), e);
                    continue;
                }
                Err(e) => return Err(decode_err(e)),
            };

            let spec = *decoded.spec();
            channels = spec.channels.count();
            sample_rate = spec.rate;
            let needed = decoded.capacity() * channels;
            if sample_buf.as_ref().map_or(true, |buf| buf.capacity() < needed) {
                sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
            }
            if let Some(buf) = sample_buf.as_mut() {
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
        }

        let title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if channels == 0 || sample_rate == 0 {
            return Err(VisualizerError::EmptyClip(path.to_path_buf()));
        }
        let clip = Self::from_samples(samples, channels as u16, sample_rate, title);
        if clip.frames() == 0 {
            return Err(VisualizerError::EmptyClip(path.to_path_buf()));
        }

        debug!(
            "Decoded {}: {} ch @ {} Hz, {:.2}s",
            clip.title,
            clip.channels,
            clip.sample_rate_hz,
            clip.duration_s()
        );
        Ok(clip)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    /// Number of sample frames (one sample per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration_s(&self) -> f32 {
        self.frames() as f32 / self.sample_rate_hz as f32
    }

    /// Sample at `frame` on `channel` (channels beyond the clip reuse the last one)
    pub fn sample(&self, frame: usize, channel: usize) -> f32 {
        let channels = self.channels as usize;
        self.samples
            .get(frame * channels + channel.min(channels - 1))
            .copied()
            .unwrap_or(0.0)
    }

    /// Channel average at `frame`
    pub fn mono(&self, frame: usize) -> f32 {
        let channels = self.channels as usize;
        let start = frame * channels;
        match self.samples.get(start..start + channels) {
            Some(slice) => slice.iter().sum::<f32>() / channels as f32,
            None => 0.0,
        }
    }

    /// Write `[start_s, start_s + duration_s)` to a 32-bit float WAV file
    pub fn write_wav_segment(&self, path: &Path, start_s: f32, duration_s: f32) -> Result<()> {
        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate_hz,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let encode_err = |source| VisualizerError::Encode {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = hound::WavWriter::create(path, spec).map_err(encode_err)?;

        let rate = self.sample_rate_hz as f32;
        let first = ((start_s.max(0.0) * rate) as usize).min(self.frames());
        let last = (((start_s.max(0.0) + duration_s.max(0.0)) * rate) as usize).min(self.frames());
        let channels = self.channels as usize;
        for &sample in &self.samples[first * channels..last * channels] {
            writer.write_sample(sample).map_err(encode_err)?;
        }
        writer.finalize().map_err(encode_err)?;
        Ok(())
    }
}
