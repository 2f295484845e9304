use crate::annotation::model::Annotation;
use crate::diagnostics::event::{DropReason, DropRecord};
use crate::resolve::scoring::ScoringWeights;
use tracing::debug;

/// Reduce validated annotations to a strictly non-overlapping set of at most
/// `max` findings, returned in document order.
///
/// Sweep in `(start asc, end desc)` order; when a candidate overlaps the last
/// kept finding, the higher canonical score survives (the kept one on ties).
/// If more than `max` survive, the lowest scoring are truncated.
pub fn canonicalize(
    annotations: &[Annotation],
    max: usize,
    weights: &ScoringWeights,
) -> (Vec<Annotation>, Vec<DropRecord>) {
    let mut order: Vec<usize> = (0..annotations.len()).collect();
    sort_sweep_order(&mut order, annotations);

    let mut kept: Vec<usize> = Vec::new();
    let mut dropped = Vec::new();

    for i in order {
        let cand = &annotations[i];
        let last = match kept.last() {
            Some(&l) => l,
            None => {
                kept.push(i);
                continue;
            }
        };
        let prev = &annotations[last];
        if cand.start() >= prev.end() {
            kept.push(i);
            continue;
        }

        let (loser, winner) = if weights.canonical_score(cand) > weights.canonical_score(prev) {
            if let Some(slot) = kept.last_mut() {
                *slot = i;
            }
            (last, i)
        } else {
            (i, last)
        };
        debug!(
            loser = %annotations[loser].id(),
            winner = %annotations[winner].id(),
            "overlapping finding superseded"
        );
        dropped.push(drop_record(
            loser,
            &annotations[loser],
            DropReason::OVERLAP_SUPERSEDED,
            format!("overlaps {}", annotations[winner].id()),
        ));
    }

    if kept.len() > max {
        // stable: equal scores keep document order
        let mut ranked = kept.clone();
        ranked.sort_by(|&a, &b| {
            weights
                .canonical_score(&annotations[b])
                .total_cmp(&weights.canonical_score(&annotations[a]))
        });
        for &i in &ranked[max..] {
            dropped.push(drop_record(
                i,
                &annotations[i],
                DropReason::OVER_CAPACITY,
                format!("more than {} findings", max),
            ));
        }
        ranked.truncate(max);
        kept = ranked;
        sort_sweep_order(&mut kept, annotations);
    }

    dropped.sort_by_key(|d| d.index);
    let out = kept.into_iter().map(|i| annotations[i].clone()).collect();
    (out, dropped)
}

fn sort_sweep_order(order: &mut [usize], annotations: &[Annotation]) {
    order.sort_by(|&a, &b| {
        let (x, y) = (&annotations[a], &annotations[b]);
        x.start().cmp(&y.start()).then(y.end().cmp(&x.end()))
    });
}

fn drop_record(index: usize, a: &Annotation, reason: DropReason, detail: String) -> DropRecord {
    DropRecord {
        index,
        annotation_id: Some(a.id().to_string()),
        reason,
        detail,
    }
}
