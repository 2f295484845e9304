use crate::annotation::model::Annotation;
use crate::annotation::text_index::TextIndex;
use crate::color::blend::{blend, BlendedColor};
use crate::color::palette::Palette;
use crate::error::{CoreError, CoreResult};
use crate::resolve::partition::Segment;
use serde::Serialize;
use std::ops::Range;

/// One inline run of output text, in document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderedRun {
    Plain {
        start: usize,
        end: usize,
        text: String,
    },
    Highlight {
        start: usize,
        end: usize,
        text: String,
        color: BlendedColor,
        /// Primary annotation id; what a click on this run selects.
        annotation_id: String,
        tooltip: String,
        covering_ids: Vec<String>,
    },
}

impl RenderedRun {
    pub fn start(&self) -> usize {
        match self {
            RenderedRun::Plain { start, .. } | RenderedRun::Highlight { start, .. } => *start,
        }
    }

    pub fn end(&self) -> usize {
        match self {
            RenderedRun::Plain { end, .. } | RenderedRun::Highlight { end, .. } => *end,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            RenderedRun::Plain { text, .. } | RenderedRun::Highlight { text, .. } => text,
        }
    }

    pub fn annotation_id(&self) -> Option<&str> {
        match self {
            RenderedRun::Plain { .. } => None,
            RenderedRun::Highlight { annotation_id, .. } => Some(annotation_id),
        }
    }

    /// True when `id` is any of the annotations behind this run, not only the primary.
    pub fn covers(&self, id: &str) -> bool {
        match self {
            RenderedRun::Plain { .. } => false,
            RenderedRun::Highlight { covering_ids, .. } => covering_ids.iter().any(|c| c == id),
        }
    }

    pub fn covering_ids(&self) -> &[String] {
        match self {
            RenderedRun::Plain { .. } => &[],
            RenderedRun::Highlight { covering_ids, .. } => covering_ids,
        }
    }

    pub fn is_highlight(&self) -> bool {
        matches!(self, RenderedRun::Highlight { .. })
    }
}

/// Turn resolved segments and their colors into inline runs.
///
/// `colors[i]` belongs to `segments[i]`. Segments must partition the whole
/// text. A covered segment without a color is rendered as plain text.
pub fn render(
    text: &str,
    segments: &[Segment],
    colors: &[Option<BlendedColor>],
) -> CoreResult<Vec<RenderedRun>> {
    if colors.len() != segments.len() {
        return Err(CoreError::InvalidInput(format!(
            "{} colors for {} segments",
            colors.len(),
            segments.len()
        )));
    }
    let index = TextIndex::new(text);
    check_partition(segments, index.len_units())?;

    let mut runs = Vec::with_capacity(segments.len());
    for (seg, color) in segments.iter().zip(colors) {
        let slice = seg.text(&index).to_string();
        match (&seg.primary, color) {
            (Some(primary), Some(color)) if !seg.is_plain() => {
                runs.push(RenderedRun::Highlight {
                    start: seg.start,
                    end: seg.end,
                    text: slice,
                    color: *color,
                    annotation_id: primary.id().to_string(),
                    tooltip: tooltip(primary, &seg.covering),
                    covering_ids: seg.covering.iter().map(|a| a.id().to_string()).collect(),
                });
            }
            _ => runs.push(RenderedRun::Plain {
                start: seg.start,
                end: seg.end,
                text: slice,
            }),
        }
    }
    Ok(runs)
}

/// Blend every segment with `palette`, then [`render`].
pub fn render_segments(
    text: &str,
    segments: &[Segment],
    palette: &Palette,
) -> CoreResult<Vec<RenderedRun>> {
    let colors: Vec<Option<BlendedColor>> = segments
        .iter()
        .map(|s| blend(&s.covering, palette))
        .collect();
    render(text, segments, &colors)
}

fn check_partition(segments: &[Segment], text_len: usize) -> CoreResult<()> {
    let mut cursor = 0;
    for seg in segments {
        if seg.start != cursor || seg.end <= seg.start {
            return Err(CoreError::InvalidInput(format!(
                "segments must partition the text: expected segment at {}, got [{}, {})",
                cursor, seg.start, seg.end
            )));
        }
        cursor = seg.end;
    }
    if cursor != text_len {
        return Err(CoreError::InvalidInput(format!(
            "segments end at {} but text has {} UTF-16 units",
            cursor, text_len
        )));
    }
    Ok(())
}

fn tooltip(primary: &Annotation, covering: &[Annotation]) -> String {
    let mut out = String::new();
    if covering.len() > 1 {
        let labels: Vec<&str> = covering.iter().map(|a| a.label()).collect();
        out.push_str("Overlaps: ");
        out.push_str(&labels.join(", "));
        out.push('\n');
    }
    out.push_str(primary.label());
    if !primary.explanation().is_empty() {
        out.push_str(": ");
        out.push_str(primary.explanation());
    }
    out
}

/// Concatenate the run texts; equals the source text for a valid render.
pub fn concat_text(runs: &[RenderedRun]) -> String {
    runs.iter().map(|r| r.text()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunGroup {
    pub runs: Range<usize>,
    pub selected: bool,
}

/// Group maximal stretches of consecutive runs that cover `selected_id`, so a
/// target can draw one emphasis outline around a selection that spans
/// several runs. Every other run is its own group.
pub fn group_selected(runs: &[RenderedRun], selected_id: Option<&str>) -> Vec<RunGroup> {
    let mut groups = Vec::new();
    let mut i = 0;
    while i < runs.len() {
        let hit = selected_id.map(|id| runs[i].covers(id)).unwrap_or(false);
        if !hit {
            groups.push(RunGroup {
                runs: i..i + 1,
                selected: false,
            });
            i += 1;
            continue;
        }
        let start = i;
        while i < runs.len() && selected_id.map(|id| runs[i].covers(id)).unwrap_or(false) {
            i += 1;
        }
        groups.push(RunGroup {
            runs: start..i,
            selected: true,
        });
    }
    groups
}
