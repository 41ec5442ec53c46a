//! WAV file I/O on planar stereo buffers.

use std::path::Path;

use anyhow::{Context, bail};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

/// Decoded audio, always two channels.
pub struct StereoAudio {
    pub left: Vec<f32>,
    pub right: Vec<f32>,
    pub sample_rate: u32,
}

impl StereoAudio {
    pub fn frames(&self) -> usize {
        self.left.len()
    }

    pub fn duration_secs(&self) -> f32 {
        self.frames() as f32 / self.sample_rate as f32
    }
}

/// Read a mono or stereo WAV file.
///
/// Mono is duplicated to both channels. Integer formats are scaled to
/// `[-1, 1)`. Files with more than two channels keep the first two.
pub fn read_stereo(path: &Path) -> anyhow::Result<StereoAudio> {
    let reader = WavReader::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels);
    if channels == 0 {
        bail!("{} has no channels", path.display());
    }

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()
            .with_context(|| format!("failed to decode {}", path.display()))?,
        SampleFormat::Int => {
            if !(1..=32).contains(&spec.bits_per_sample) {
                bail!("{} has unsupported bit depth {}", path.display(), spec.bits_per_sample);
            }
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .with_context(|| format!("failed to decode {}", path.display()))?
        }
    };

    let (left, right) = if channels == 1 {
        (samples.clone(), samples)
    } else {
        samples
            .chunks_exact(channels)
            .map(|frame| (frame[0], frame[1]))
            .unzip()
    };

    Ok(StereoAudio {
        left,
        right,
        sample_rate: spec.sample_rate,
    })
}

/// Write a 32-bit float stereo WAV file.
pub fn write_stereo(path: &Path, audio: &StereoAudio) -> anyhow::Result<()> {
    let spec = WavSpec {
        channels: 2,
        sample_rate: audio.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec).with_context(|| format!("failed to create {}", path.display()))?;
    for (&l, &r) in audio.left.iter().zip(&audio.right) {
        writer.write_sample(l)?;
        writer.write_sample(r)?;
    }
    writer.finalize()?;
    Ok(())
}
