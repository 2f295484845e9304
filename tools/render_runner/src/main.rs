use highlight_core::annotation::text_index::TextIndex;
use highlight_core::annotation::{validate, RawAnnotation};
use highlight_core::color::blend::blend_categories;
use highlight_core::color::Palette;
use highlight_core::determinism::fingerprint::fingerprint;
use highlight_core::diagnostics::event::DiagnosticEvent;
use highlight_core::diagnostics::log::{verify_chain, DiagnosticsLog};
use highlight_core::render::html::HtmlTarget;
use highlight_core::render::runs::{concat_text, render_segments};
use highlight_core::render::{RenderPass, RenderedRun};
use highlight_core::resolve::{CategoryFilter, OverlapResolver, ResolveMode, Segment};
use highlight_core::selection::SelectionCorrelator;
use highlight_core::{Annotation, Category, CoreResult, Severity};
use serde_json::json;

const SAMPLE: &str = "Experts agree the new policy is a disaster, and anyone who supports it \
clearly hates this country. Act now before it is too late!";

struct Check {
    id: &'static str,
    passed: bool,
    message: String,
}

impl Check {
    fn new(id: &'static str, passed: bool, message: impl Into<String>) -> Self {
        Check {
            id,
            passed,
            message: message.into(),
        }
    }
}

fn main() {
    // Self-check: renders a fixed sample twice and prints one CHECK line per
    // property; exits non-zero if any fails.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let checks = match run_checks() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("render_runner error: {}", e);
            std::process::exit(1);
        }
    };

    let mut any_fail = false;
    for c in &checks {
        println!(
            "CHECK {} {} {}",
            c.id,
            if c.passed { "PASS" } else { "FAIL" },
            c.message
        );
        any_fail |= !c.passed;
    }
    if any_fail {
        std::process::exit(1);
    }
}

fn sample_findings() -> CoreResult<Vec<RawAnnotation>> {
    let raw = json!([
        {"id": "f1", "category": "fallacy", "categoryId": "appeal_to_authority", "label": "Appeal to authority",
         "severity": "medium", "confidence": 0.82, "start": 0, "end": 13, "quote": "Experts agree",
         "explanation": "Unnamed experts are cited as proof."},
        {"id": "f2", "category": "bias", "categoryId": "loaded_language", "label": "Loaded language",
         "severity": "low", "confidence": 0.7, "start": 33, "end": 43, "quote": "a disaster",
         "explanation": "Emotionally charged wording."},
        {"id": "f3", "category": "fallacy", "categoryId": "ad_hominem", "label": "Ad hominem",
         "severity": "high", "confidence": 0.9, "start": 49, "end": 102,
         "quote": "anyone who supports it clearly hates this country",
         "explanation": "Attacks supporters instead of arguments."},
        {"id": "f4", "category": "tactic", "categoryId": "false_urgency", "label": "False urgency",
         "severity": "medium", "confidence": 0.75, "start": 0, "end": 0, "quote": "Act now before it is too late!",
         "explanation": "Pressure to act without thinking."},
        {"id": "f5", "category": "bias", "categoryId": "us_vs_them", "label": "Us versus them",
         "severity": "medium", "confidence": 0.6, "start": 76, "end": 102, "quote": "clearly hates this country",
         "explanation": "Frames disagreement as disloyalty."},
        {"id": "f6", "category": "factcheck", "label": "Unverifiable", "severity": "low",
         "confidence": 0.5, "start": 5, "end": 9, "quote": "not in the sample"}
    ]);
    Ok(serde_json::from_value(raw)?)
}

fn render_once(annotations: &[Annotation]) -> CoreResult<(Vec<Segment>, Vec<RenderedRun>)> {
    let out = OverlapResolver::default().resolve(SAMPLE, annotations, ResolveMode::Partition)?;
    let runs = render_segments(SAMPLE, &out.segments, &Palette::default())?;
    Ok((out.segments, runs))
}

fn run_checks() -> CoreResult<Vec<Check>> {
    let mut checks = Vec::new();
    let raw = sample_findings()?;
    let annotations = validate(SAMPLE, &raw);
    let index = TextIndex::new(SAMPLE);

    let quotes_ok = annotations
        .iter()
        .all(|a| index.slice(a.start(), a.end()) == a.quote());
    checks.push(Check::new(
        "VALIDATED_QUOTES_MATCH",
        quotes_ok && annotations.len() == raw.len() - 1,
        format!("{} of {} annotations kept", annotations.len(), raw.len()),
    ));

    let (segments, runs) = render_once(&annotations)?;
    let (segments2, runs2) = render_once(&annotations)?;
    let exhaustive = segments.first().map(|s| s.start) == Some(0)
        && segments.last().map(|s| s.end) == Some(index.len_units())
        && segments.windows(2).all(|w| w[0].end == w[1].start);
    checks.push(Check::new(
        "PARTITION_EXHAUSTIVE",
        exhaustive && concat_text(&runs) == SAMPLE,
        format!("{} segments", segments.len()),
    ));

    let (fa, fb) = (fingerprint(&segments)?, fingerprint(&segments2)?);
    checks.push(Check::new("RESOLVE_IDEMPOTENT", fa == fb, format!("sha256 {}", fa)));
    let (ra, rb) = (fingerprint(&runs)?, fingerprint(&runs2)?);
    checks.push(Check::new("RENDER_IDEMPOTENT", ra == rb, format!("sha256 {}", ra)));

    let palette = Palette::default();
    let ab = blend_categories(
        &[(Category::Bias, Severity::Medium), (Category::Fallacy, Severity::High)],
        &palette,
    );
    let ba = blend_categories(
        &[(Category::Fallacy, Severity::High), (Category::Bias, Severity::Medium)],
        &palette,
    );
    checks.push(Check::new(
        "BLEND_COMMUTATIVE",
        ab.is_some() && ab == ba,
        ab.map(|c| c.css()).unwrap_or_default(),
    ));

    let stack = [
        (Category::Bias, Severity::Low),
        (Category::Fallacy, Severity::Low),
        (Category::Tactic, Severity::Medium),
        (Category::FactCheck, Severity::High),
    ];
    let alphas: Vec<f64> = (1..=stack.len())
        .filter_map(|n| blend_categories(&stack[..n], &palette).map(|c| c.alpha))
        .collect();
    let monotone = alphas.windows(2).all(|w| w[0] <= w[1]);
    let capped = alphas.iter().all(|a| *a <= palette.alpha_cap);
    checks.push(Check::new(
        "ALPHA_MONOTONIC_CAPPED",
        alphas.len() == stack.len() && monotone && capped,
        format!("{:?}", alphas),
    ));

    let (canonical, _) = OverlapResolver::default().canonicalize(&annotations);
    let disjoint = canonical.windows(2).all(|w| w[0].end() <= w[1].start());
    checks.push(Check::new(
        "CANONICAL_NON_OVERLAPPING",
        disjoint && canonical.len() <= 12,
        format!("{} canonical findings", canonical.len()),
    ));

    let mut selection = SelectionCorrelator::default();
    selection.set_annotations(&annotations);
    selection.select("f3", 0);
    let cleared = selection
        .set_enabled_categories(CategoryFilter::all_enabled().with_disabled(Category::Fallacy));
    checks.push(Check::new(
        "SELECTION_CLEARED_ON_DISABLE",
        selection.selected().is_none() && cleared.len() == 1,
        format!("{} effects", cleared.len()),
    ));

    let mut target = HtmlTarget::new();
    let mut pass = RenderPass::new();
    pass.apply(&mut target, &runs)?;
    let first = target.html().to_string();
    let report = pass.apply(&mut target, &runs2)?;
    checks.push(Check::new(
        "RENDER_PASS_REPLACES",
        target.html() == first && report.generation == 2,
        format!("pass {}", report.pass_id),
    ));

    let tmp = tempfile::tempdir()?;
    let log_path = tmp.path().join("diagnostics.ndjson");
    let mut log = DiagnosticsLog::open_or_create(&log_path)?;
    let (_, validation) = highlight_core::annotation::validate_with_report(SAMPLE, &raw);
    let mut events: Vec<DiagnosticEvent> = validation
        .dropped
        .iter()
        .map(DiagnosticEvent::from_drop)
        .collect();
    events.push(report.to_event());
    for c in &cleared {
        events.extend(c.to_event());
    }
    let written = log.append_all(events)?;
    let verified = verify_chain(&log_path)?;
    checks.push(Check::new(
        "DIAGNOSTICS_CHAIN",
        written == verified && written > 0,
        format!("{} events", verified),
    ));

    Ok(checks)
}
