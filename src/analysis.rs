use strsim::normalized_levenshtein;

/// A time-stamped span of recognized speech, as produced by transcription.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Segment start in seconds from the beginning of the recording.
    pub start: f32,
    pub text: String,
}

/// Per-target occurrence timestamps and the derived gaps between them.
#[derive(Debug, Clone, PartialEq)]
pub struct WordStats {
    pub word: String,
    /// Segment start times at which the word was judged present (ascending).
    pub timestamps: Vec<f32>,
    /// Consecutive differences between adjacent timestamps; len = timestamps.len() - 1.
    pub gaps: Vec<f32>,
}

/// Split a comma-separated word list into normalized targets.
/// Entries are trimmed and lower-cased; empties are dropped; duplicates are
/// removed while preserving first-seen order.
pub fn parse_target_words(input: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for raw in input.split(',') {
        let w = raw.trim().to_lowercase();
        if !w.is_empty() && !words.contains(&w) {
            words.push(w);
        }
    }
    words
}

/// Normalized edit similarity between two strings on a 0..=100 scale.
pub fn similarity(a: &str, b: &str) -> u8 {
    (normalized_levenshtein(a, b) * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Scan segments in transcript order and collect occurrence timestamps for
/// each target word, then derive the gap list per target.
///
/// Without a threshold a target matches when it appears as a contiguous
/// substring of the lower-cased segment text. With a threshold the segment
/// text is split into whitespace tokens and the target matches when any
/// token scores at least `threshold`; scanning stops at the first matching
/// token, so a segment contributes at most one timestamp per target.
pub fn analyze(segments: &[Segment], targets: &[String], threshold: Option<u8>) -> Vec<WordStats> {
    let mut stats: Vec<WordStats> = targets
        .iter()
        .map(|w| WordStats {
            word: w.clone(),
            timestamps: Vec::new(),
            gaps: Vec::new(),
        })
        .collect();

    for segment in segments {
        let text = segment.text.to_lowercase();
        let tokens: Vec<&str> = match threshold {
            Some(_) => text.split_whitespace().collect(),
            None => Vec::new(),
        };
        for entry in stats.iter_mut() {
            let matched = match threshold {
                None => text.contains(entry.word.as_str()),
                Some(t) => tokens.iter().any(|tok| similarity(tok, &entry.word) >= t),
            };
            if matched {
                entry.timestamps.push(segment.start);
            }
        }
    }

    for entry in stats.iter_mut() {
        entry.gaps = entry.timestamps.windows(2).map(|w| w[1] - w[0]).collect();
    }
    stats
}

/// Render the human-readable report, one section per target in supply order.
pub fn render_report(stats: &[WordStats]) -> String {
    let mut out = String::new();
    for entry in stats {
        out.push_str(&format!("\n--- {} ---\n", entry.word.to_uppercase()));
        if entry.timestamps.is_empty() {
            out.push_str("No occurrences found.\n");
            continue;
        }

        out.push_str(&format!("Total occurrences: {}\n", entry.timestamps.len()));
        out.push_str("Occurrences at times:\n");
        for t in &entry.timestamps {
            out.push_str(&format!("- {:.2} s\n", t));
        }

        if entry.gaps.is_empty() {
            out.push_str("Occurred only once, no gaps.\n");
        } else {
            out.push_str("Time gaps (seconds):\n");
            for g in &entry.gaps {
                out.push_str(&format!("- {:.2} s\n", g));
            }
            let avg = entry.gaps.iter().sum::<f32>() / entry.gaps.len() as f32;
            let shortest = entry.gaps.iter().copied().fold(f32::INFINITY, f32::min);
            let longest = entry.gaps.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            out.push_str(&format!("Average gap: {:.2} s\n", avg));
            out.push_str(&format!("Shortest gap: {:.2} s\n", shortest));
            out.push_str(&format!("Longest gap: {:.2} s\n", longest));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{analyze, parse_target_words, render_report, similarity, Segment};

    fn seg(start: f32, text: &str) -> Segment {
        Segment {
            start,
            text: text.to_string(),
        }
    }

    fn sample_segments() -> Vec<Segment> {
        vec![
            seg(0.0, "hello world"),
            seg(5.0, "world again"),
            seg(12.5, "say hello"),
        ]
    }

    #[test]
    fn exact_match_collects_timestamps_and_gaps() {
        let stats = analyze(&sample_segments(), &["hello".to_string()], None);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].timestamps, vec![0.0, 12.5]);
        assert_eq!(stats[0].gaps, vec![12.5]);
    }

    #[test]
    fn exact_match_is_case_insensitive_substring() {
        let stats = analyze(&[seg(3.0, "Say HELLO!")], &["hello".to_string()], None);
        assert_eq!(stats[0].timestamps, vec![3.0]);
    }

    #[test]
    fn missing_word_reports_no_occurrences() {
        let stats = analyze(&sample_segments(), &["missing".to_string()], None);
        assert!(stats[0].timestamps.is_empty());
        let report = render_report(&stats);
        assert!(report.contains("--- MISSING ---"));
        assert!(report.contains("No occurrences found."));
    }

    #[test]
    fn fuzzy_match_above_threshold() {
        // "helo" vs "hello": one edit over five chars -> similarity 80
        let stats = analyze(&[seg(1.0, "helo there")], &["hello".to_string()], Some(80));
        assert_eq!(stats[0].timestamps, vec![1.0]);
        assert!(stats[0].gaps.is_empty());
    }

    #[test]
    fn fuzzy_match_below_threshold() {
        let stats = analyze(&[seg(1.0, "helo there")], &["hello".to_string()], Some(95));
        assert!(stats[0].timestamps.is_empty());
    }

    #[test]
    fn fuzzy_mode_counts_a_segment_once() {
        let stats = analyze(
            &[seg(2.0, "hello hello hello")],
            &["hello".to_string()],
            Some(80),
        );
        assert_eq!(stats[0].timestamps, vec![2.0]);
    }

    #[test]
    fn timestamps_are_monotonic_and_gaps_nonnegative() {
        let segments = vec![
            seg(0.5, "tick"),
            seg(0.5, "tick tock"),
            seg(4.25, "tick"),
            seg(9.0, "a tick"),
        ];
        let stats = analyze(&segments, &["tick".to_string()], None);
        let ts = &stats[0].timestamps;
        assert!(ts.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(stats[0].gaps.len(), ts.len() - 1);
        assert!(stats[0].gaps.iter().all(|&g| g >= 0.0));
    }

    #[test]
    fn gap_statistics_match_extremes_and_average() {
        let segments = vec![seg(0.0, "go"), seg(2.0, "go"), seg(7.0, "go")];
        let stats = analyze(&segments, &["go".to_string()], None);
        assert_eq!(stats[0].gaps, vec![2.0, 5.0]);
        let report = render_report(&stats);
        assert!(report.contains("Average gap: 3.50 s"));
        assert!(report.contains("Shortest gap: 2.00 s"));
        assert!(report.contains("Longest gap: 5.00 s"));
    }

    #[test]
    fn single_occurrence_reports_no_gaps() {
        let stats = analyze(&[seg(1.0, "hello")], &["hello".to_string()], None);
        let report = render_report(&stats);
        assert!(report.contains("Total occurrences: 1"));
        assert!(report.contains("- 1.00 s"));
        assert!(report.contains("Occurred only once, no gaps."));
        assert!(!report.contains("Average gap"));
    }

    #[test]
    fn report_sections_follow_supply_order() {
        let targets = vec!["world".to_string(), "hello".to_string()];
        let report = render_report(&analyze(&sample_segments(), &targets, None));
        let world = report.find("--- WORLD ---").unwrap();
        let hello = report.find("--- HELLO ---").unwrap();
        assert!(world < hello);
    }

    #[test]
    fn full_report_matches_expected_layout() {
        let stats = analyze(&sample_segments(), &["hello".to_string()], None);
        let expected = "\n--- HELLO ---\n\
                        Total occurrences: 2\n\
                        Occurrences at times:\n\
                        - 0.00 s\n\
                        - 12.50 s\n\
                        Time gaps (seconds):\n\
                        - 12.50 s\n\
                        Average gap: 12.50 s\n\
                        Shortest gap: 12.50 s\n\
                        Longest gap: 12.50 s\n";
        assert_eq!(render_report(&stats), expected);
    }

    #[test]
    fn parse_targets_trims_lowercases_and_dedupes() {
        assert_eq!(
            parse_target_words(" Hello, world ,HELLO,, foo "),
            vec!["hello".to_string(), "world".to_string(), "foo".to_string()]
        );
        assert!(parse_target_words(" , ,").is_empty());
    }

    #[test]
    fn similarity_scale_matches_expectations() {
        assert_eq!(similarity("hello", "hello"), 100);
        assert_eq!(similarity("helo", "hello"), 80);
        assert_eq!(similarity("", ""), 100);
        assert_eq!(similarity("abc", "xyz"), 0);
    }
}
