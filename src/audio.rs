use anyhow::{bail, Context, Result};
use hound::{SampleFormat as WavSampleFormat, WavSpec, WavWriter};
use rodio::{Decoder, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Whisper expects 16 kHz mono f32 PCM.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Decode an audio file (mp3/m4a/wav) into mono f32 PCM at 16 kHz.
pub fn load_audio_file(path: &Path) -> Result<Vec<f32>> {
    let file =
        File::open(path).with_context(|| format!("open audio file: {}", path.display()))?;
    let decoder = Decoder::new(BufReader::new(file))
        .with_context(|| format!("decode audio file: {}", path.display()))?;

    // Read stream parameters before the decoder is consumed below
    let channels = decoder.channels().max(1) as usize;
    let src_rate = decoder.sample_rate();
    let samples: Vec<f32> = decoder.convert_samples::<f32>().collect();
    if samples.is_empty() {
        bail!("audio file contains no samples: {}", path.display());
    }

    let mono = downmix_to_mono(&samples, channels);
    let mut pcm = Vec::new();
    resample_into(&mono, src_rate, TARGET_SAMPLE_RATE, &mut pcm);

    tracing::info!(
        "Decoded {}: {} ch @ {} Hz -> {} samples @ {} Hz ({:.1}s)",
        path.display(),
        channels,
        src_rate,
        pcm.len(),
        TARGET_SAMPLE_RATE,
        pcm.len() as f32 / TARGET_SAMPLE_RATE as f32
    );

    // Debug: dump decoded audio to WAV (16k/mono) if requested
    if std::env::var("WORDSCOUNTER_DEBUG_DUMP_AUDIO").ok().as_deref() == Some("1") {
        dump_debug_wav(&pcm);
    }

    Ok(pcm)
}

/// Average interleaved frames down to a single channel.
fn downmix_to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

// Linear interpolation is sufficient for speech recognition input.
fn resample_into(input: &[f32], src_rate: u32, dst_rate: u32, output: &mut Vec<f32>) {
    output.clear();
    if src_rate == dst_rate {
        output.extend_from_slice(input);
        return;
    }
    let ratio = src_rate as f32 / dst_rate as f32;
    let output_len = (input.len() as f32 / ratio) as usize;
    output.reserve(output_len);
    for i in 0..output_len {
        let src_idx = i as f32 * ratio;
        let idx = src_idx as usize;
        let frac = src_idx - idx as f32;
        if idx + 1 < input.len() {
            let sample = input[idx] * (1.0 - frac) + input[idx + 1] * frac;
            output.push(sample);
        } else if idx < input.len() {
            output.push(input[idx]);
        }
    }
}

fn dump_debug_wav(pcm: &[f32]) {
    let path = Path::new("debug_last.wav");
    if let Ok(mut writer) = WavWriter::create(
        path,
        WavSpec {
            channels: 1,
            sample_rate: TARGET_SAMPLE_RATE,
            bits_per_sample: 32,
            sample_format: WavSampleFormat::Float,
        },
    ) {
        for &s in pcm {
            let _ = writer.write_sample::<f32>(s);
        }
        let _ = writer.finalize();
        tracing::info!(
            "Saved decoded audio: {} ({} samples)",
            path.display(),
            pcm.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{downmix_to_mono, resample_into};

    #[test]
    fn downmix_averages_stereo_frames() {
        let stereo = [1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        assert_eq!(downmix_to_mono(&stereo, 2), vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn downmix_passes_mono_through() {
        let mono = [0.1, 0.2, 0.3];
        assert_eq!(downmix_to_mono(&mono, 1), mono.to_vec());
    }

    #[test]
    fn resample_same_rate_is_identity() {
        let input = [0.0, 0.25, 0.5];
        let mut out = Vec::new();
        resample_into(&input, 16_000, 16_000, &mut out);
        assert_eq!(out, input.to_vec());
    }

    #[test]
    fn resample_halves_length_when_downsampling_2x() {
        let input: Vec<f32> = (0..32_000).map(|i| (i % 100) as f32 / 100.0).collect();
        let mut out = Vec::new();
        resample_into(&input, 32_000, 16_000, &mut out);
        assert!((out.len() as i64 - 16_000).abs() <= 1);
    }
}
