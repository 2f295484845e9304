use highlight_core::color::blend::blend_categories;
use highlight_core::color::Palette;
use highlight_core::{Category, Severity};

#[test]
fn blend_ignores_input_order() {
    let p = Palette::default();
    let ab = blend_categories(
        &[(Category::Bias, Severity::High), (Category::Fallacy, Severity::Low)],
        &p,
    )
    .unwrap();
    let ba = blend_categories(
        &[(Category::Fallacy, Severity::Low), (Category::Bias, Severity::High)],
        &p,
    )
    .unwrap();
    assert_eq!(ab, ba);
    assert_eq!(ab.css(), ba.css());
}

#[test]
fn alpha_grows_with_each_category_up_to_the_cap() {
    let p = Palette::default();
    let all = [
        (Category::Tactic, Severity::Low),
        (Category::Bias, Severity::Low),
        (Category::Fallacy, Severity::Medium),
        (Category::FactCheck, Severity::High),
    ];
    let mut prev = 0.0;
    for n in 1..=all.len() {
        let c = blend_categories(&all[..n], &p).unwrap();
        assert!(c.alpha >= prev, "alpha dropped at {} contributors", n);
        assert!(c.alpha <= p.alpha_cap);
        prev = c.alpha;
    }
    assert_eq!(prev, p.alpha_cap);
}

#[test]
fn unknown_category_takes_factcheck_color() {
    let p = Palette::default();
    let other = blend_categories(&[(Category::from("satire"), Severity::Low)], &p).unwrap();
    let fact = blend_categories(&[(Category::FactCheck, Severity::Low)], &p).unwrap();
    assert_eq!((other.r, other.g, other.b), (fact.r, fact.g, fact.b));
}

#[test]
fn mixed_color_lies_between_its_sources() {
    let p = Palette::default();
    let bias = blend_categories(&[(Category::Bias, Severity::Medium)], &p).unwrap();
    let tactic = blend_categories(&[(Category::Tactic, Severity::Medium)], &p).unwrap();
    let both = blend_categories(
        &[(Category::Bias, Severity::Medium), (Category::Tactic, Severity::Medium)],
        &p,
    )
    .unwrap();
    assert_ne!((both.r, both.g, both.b), (bias.r, bias.g, bias.b));
    assert_ne!((both.r, both.g, both.b), (tactic.r, tactic.g, tactic.b));
}
