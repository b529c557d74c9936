use anyhow::{Context, Result};
use std::time::Instant;
use unicode_categories::UnicodeCategories;
use whisper_rs::{FullParams, SamplingStrategy, WhisperState};

use crate::analysis::Segment;

/// Run Whisper over the full recording and return timed segments in
/// chronological order. Punctuation-only and probable non-speech segments
/// are skipped so the analyzer only sees real text.
pub fn transcribe(
    state: &mut WhisperState,
    pcm: &[f32],
    language: Option<&str>,
) -> Result<Vec<Segment>> {
    // Small beam search for stable output on pre-recorded files
    let mut params = FullParams::new(SamplingStrategy::BeamSearch {
        beam_size: 3,
        patience: 1.0,
    });

    // Language (auto-detect if None)
    params.set_language(language);

    // Prefer physical cores (HT often doesn't help); cap at 4
    let n_threads = (num_cpus::get_physical() as i32).min(4);
    params.set_n_threads(n_threads.max(1));
    params.set_translate(false);

    // Segment start times drive the gap analysis
    params.set_no_timestamps(false);
    params.set_token_timestamps(false);
    params.set_single_segment(false);

    params.set_temperature(0.0);
    // Enable temperature fallback to mitigate decoding loops/repetitions
    params.set_temperature_inc(0.2);
    // Reduce blank token influence
    params.set_suppress_blank(true);
    // Non-speech token suppression + confidence filter
    params.set_suppress_nst(true);
    params.set_logprob_thold(-0.7);
    params.set_entropy_thold(2.4);
    params.set_no_speech_thold(0.90);

    let start = Instant::now();
    state.full(params, pcm).context("whisper inference failed")?;
    let duration = start.elapsed();

    let mut segments = Vec::new();
    for seg in state.as_iter() {
        // Whisper timestamps are in centiseconds
        let seg_start = seg.start_timestamp() as f32 / 100.0;
        let text = seg.to_string();
        if is_punct_or_space_only(&text) || seg.no_speech_probability() >= 0.85 {
            continue;
        }
        segments.push(Segment {
            start: seg_start,
            text,
        });
    }

    let audio_sec = pcm.len() as f32 / 16_000.0;
    let rtf = if audio_sec > 0.0 {
        duration.as_secs_f32() / audio_sec
    } else {
        0.0
    };
    tracing::info!(
        "Transcribed {:.1}s of audio in {:.2}s (RTF {:.2}x), {} segments",
        audio_sec,
        duration.as_secs_f32(),
        rtf,
        segments.len()
    );

    Ok(segments)
}

// Whether the string consists only of punctuation/whitespace
fn is_punct_or_space_only(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_whitespace() || c.is_ascii_punctuation() || c.is_punctuation())
}
