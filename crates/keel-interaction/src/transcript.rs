//! Meeting transcript parsing and search.
//!
//! Transcripts arrive as plain text with one utterance per line in the form
//! `Speaker 0: text` (or `Name: text` once speakers are identified). Lines
//! without a speaker label continue the previous utterance.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// One speaker turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Utterance {
    /// Zero-based line the utterance starts on
    pub line: usize,
    /// Speaker label, `None` for unlabelled leading text
    pub speaker: Option<String>,
    /// Spoken text
    pub text: String,
}

/// A search hit inside a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptMatch {
    /// Index into the utterance list
    pub utterance: usize,
    /// Speaker of the matching utterance
    pub speaker: Option<String>,
    /// Byte offsets of each occurrence within the utterance text
    pub ranges: Vec<(usize, usize)>,
}

fn speaker_line() -> &'static Regex {
    static SPEAKER_REGEX: OnceLock<Regex> = OnceLock::new();
    SPEAKER_REGEX.get_or_init(|| {
        Regex::new(r"^([A-Z][\w .'-]{0,60}?):\s+(.*)$").expect("valid regex")
    })
}

/// Split transcript text into utterances.
pub fn parse_transcript(text: &str) -> Vec<Utterance> {
    let mut utterances: Vec<Utterance> = Vec::new();

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = speaker_line().captures(line) {
            utterances.push(Utterance {
                line: line_no,
                speaker: Some(caps[1].trim().to_string()),
                text: caps[2].trim().to_string(),
            });
        } else if let Some(last) = utterances.last_mut() {
            last.text.push(' ');
            last.text.push_str(line);
        } else {
            utterances.push(Utterance {
                line: line_no,
                speaker: None,
                text: line.to_string(),
            });
        }
    }

    utterances
}

/// Case-insensitive search over utterance text.
///
/// A blank query matches nothing.
pub fn search_transcript(utterances: &[Utterance], query: &str) -> Vec<TranscriptMatch> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    utterances
        .iter()
        .enumerate()
        .filter_map(|(idx, utterance)| {
            let haystack = utterance.text.to_lowercase();
            let ranges: Vec<(usize, usize)> = haystack
                .match_indices(&needle)
                .map(|(start, m)| (start, start + m.len()))
                .collect();
            if ranges.is_empty() {
                None
            } else {
                Some(TranscriptMatch {
                    utterance: idx,
                    speaker: utterance.speaker.clone(),
                    ranges,
                })
            }
        })
        .collect()
}
