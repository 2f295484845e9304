//! Fallback highlighting for text whose offsets cannot be trusted.
//!
//! When the displayed text is not the text the classifier saw, offsets are
//! useless and only the quote is left. The quote is tried verbatim, then as
//! progressively shorter word runs, then as any quoted sub-phrase inside it.
//! The first occurrence of the first candidate that matches wins, so a
//! common short phrase can anchor on the wrong occurrence.

use crate::annotation::model::{Annotation, RawAnnotation};
use crate::annotation::text_index::{unit_len, TextIndex};
use crate::annotation::validator::validate_with_report;
use crate::color::palette::Palette;
use crate::diagnostics::event::{DropReason, DropRecord};
use crate::error::{CoreError, CoreResult};
use crate::render::runs::{render_segments, RenderedRun};
use crate::resolve::partition::partition;
use crate::resolve::scoring::ScoringWeights;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyWindows {
    pub max_words: usize,
    pub min_words: usize,
    pub short_run_words: usize,
}

impl Default for FuzzyWindows {
    fn default() -> Self {
        FuzzyWindows {
            max_words: 8,
            min_words: 4,
            short_run_words: 3,
        }
    }
}

impl FuzzyWindows {
    pub fn validate(&self) -> CoreResult<()> {
        if self.short_run_words == 0
            || self.min_words == 0
            || self.min_words > self.max_words
        {
            return Err(CoreError::Config(format!(
                "invalid fuzzy windows max={} min={} short={}",
                self.max_words, self.min_words, self.short_run_words
            )));
        }
        Ok(())
    }
}

/// Candidate phrases for `quote`, most specific first, without duplicates.
pub fn candidate_phrases(quote: &str, windows: &FuzzyWindows) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |s: String| {
        if !s.is_empty() && !out.contains(&s) {
            out.push(s);
        }
    };

    push(quote.to_string());
    push(quote.trim().to_string());

    let words: Vec<&str> = quote.split_whitespace().collect();
    let mut sizes: Vec<usize> = (windows.min_words..=windows.max_words).rev().collect();
    sizes.push(windows.short_run_words);
    for n in sizes {
        if n == 0 || n > words.len() {
            continue;
        }
        for w in words.windows(n) {
            push(w.join(" "));
        }
    }

    for phrase in quoted_sub_phrases(quote) {
        push(phrase);
    }
    out
}

fn quoted_sub_phrases(quote: &str) -> Vec<String> {
    let re = match Regex::new(r#""([^"]+)"|“([^”]+)”|'([^']+)'"#) {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };
    re.captures_iter(quote)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

/// Char range of the first candidate phrase found in the indexed text.
pub fn fuzzy_locate(
    index: &TextIndex<'_>,
    quote: &str,
    windows: &FuzzyWindows,
) -> Option<(usize, usize, String)> {
    candidate_phrases(quote, windows)
        .into_iter()
        .find_map(|phrase| {
            index
                .find(&phrase)
                .map(|start| (start, start + unit_len(&phrase), phrase))
        })
}

#[derive(Debug, Clone, Serialize)]
pub struct FuzzyOutcome {
    pub runs: Vec<RenderedRun>,
    pub located: Vec<Annotation>,
    pub dropped: Vec<DropRecord>,
}

/// Highlight `annotations` in `display_text` by quote search alone.
///
/// A located annotation keeps its label, severity and explanation; its
/// quote becomes the phrase that actually matched. Misses produce no
/// highlight and a `NO_MATCH_IN_RENDER_TARGET` record; anchored annotations
/// the validator rejects keep its drop record. Record indices refer to
/// `annotations`.
pub fn fuzzy_highlight(
    display_text: &str,
    annotations: &[RawAnnotation],
    windows: &FuzzyWindows,
    palette: &Palette,
    weights: &ScoringWeights,
) -> CoreResult<FuzzyOutcome> {
    let index = TextIndex::new(display_text);
    let mut anchored: Vec<RawAnnotation> = Vec::with_capacity(annotations.len());
    // input index of each anchored annotation
    let mut origin: Vec<usize> = Vec::with_capacity(annotations.len());
    let mut dropped = Vec::new();

    for (i, raw) in annotations.iter().enumerate() {
        match fuzzy_locate(&index, &raw.quote, windows) {
            Some((start, end, phrase)) => {
                let mut a = raw.clone();
                a.start = start as i64;
                a.end = end as i64;
                a.quote = phrase;
                anchored.push(a);
                origin.push(i);
            }
            None => {
                warn!(id = %raw.id, "no match for annotation quote in render target");
                dropped.push(DropRecord {
                    index: i,
                    annotation_id: Some(raw.id.clone()),
                    reason: DropReason::NO_MATCH_IN_RENDER_TARGET,
                    detail: "no candidate phrase found in displayed text".to_string(),
                });
            }
        }
    }

    let (located, report) = validate_with_report(display_text, &anchored);
    dropped.extend(report.dropped.into_iter().map(|mut d| {
        d.index = origin[d.index];
        d
    }));
    dropped.sort_by_key(|d| d.index);
    let segments = partition(index.len_units(), &located, weights);
    let runs = render_segments(display_text, &segments, palette)?;
    Ok(FuzzyOutcome {
        runs,
        located,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_shrink_from_eight_words() {
        let quote = "one two three four five six seven eight nine";
        let c = candidate_phrases(quote, &FuzzyWindows::default());
        assert_eq!(c[0], quote);
        assert_eq!(c[1], "one two three four five six seven eight");
        assert!(c.contains(&"seven eight nine".to_string()));
    }

    #[test]
    fn quoted_phrase_is_last_resort() {
        let c = candidate_phrases("he said \"never again\" loudly", &FuzzyWindows::default());
        assert_eq!(c.last().unwrap(), "never again");
    }

    fn raw(id: &str, confidence: f64, quote: &str) -> RawAnnotation {
        RawAnnotation {
            id: id.to_string(),
            category: crate::annotation::model::Category::Tactic,
            category_id: String::new(),
            label: id.to_string(),
            severity: crate::annotation::model::Severity::Low,
            confidence,
            start: 0,
            end: 0,
            quote: quote.to_string(),
            explanation: String::new(),
            suggestion: None,
        }
    }

    #[test]
    fn every_input_is_located_or_dropped() {
        let display = "Buy now, stocks are running out fast.";
        let anns = [
            raw("miss", 0.5, "nothing like this"),
            raw("bad", 1.5, "Buy now"),
            raw("ok", 0.6, "running out fast"),
        ];
        let out = fuzzy_highlight(
            display,
            &anns,
            &FuzzyWindows::default(),
            &Palette::default(),
            &ScoringWeights::default(),
        )
        .unwrap();
        assert_eq!(out.located.len(), 1);
        let dropped: Vec<(usize, DropReason)> =
            out.dropped.iter().map(|d| (d.index, d.reason)).collect();
        assert_eq!(
            dropped,
            vec![
                (0, DropReason::NO_MATCH_IN_RENDER_TARGET),
                (1, DropReason::INVALID_CONFIDENCE),
            ]
        );
        assert_eq!(out.located.len() + out.dropped.len(), anns.len());
    }

    #[test]
    fn locates_on_first_occurrence() {
        let idx = TextIndex::new("a cat sat. a cat sat again.");
        let (s, e, _) = fuzzy_locate(&idx, "a cat sat", &FuzzyWindows::default()).unwrap();
        assert_eq!((s, e), (0, 9));
    }
}
