use crate::annotation::model::{Annotation, Category, Severity};
use crate::color::oklab::Oklab;
use crate::color::palette::Palette;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

impl BlendedColor {
    pub fn css(&self) -> String {
        self.css_with_alpha(self.alpha)
    }

    /// Opaque form, for swatches in the findings list.
    pub fn rgb_css(&self) -> String {
        format!("rgb({} {} {})", self.r, self.g, self.b)
    }

    /// Same color at another opacity, e.g. the dimmed hover state.
    pub fn css_with_alpha(&self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }
}

/// Blend the colors of every annotation covering one segment.
///
/// Colors are mixed in OKLab, weighted by severity; opacity combines as
/// independent partial coverage, `1 - Π(1 - w)`, capped at `palette.alpha_cap`.
/// Returns `None` for an empty covering set.
pub fn blend(covering: &[Annotation], palette: &Palette) -> Option<BlendedColor> {
    let mut contributors: Vec<(&Category, Severity)> = covering
        .iter()
        .map(|a| (a.category(), a.severity()))
        .collect();
    blend_contributors(&mut contributors, palette)
}

pub fn blend_categories(
    contributors: &[(Category, Severity)],
    palette: &Palette,
) -> Option<BlendedColor> {
    let mut refs: Vec<(&Category, Severity)> =
        contributors.iter().map(|(c, s)| (c, *s)).collect();
    blend_contributors(&mut refs, palette)
}

fn blend_contributors(
    contributors: &mut [(&Category, Severity)],
    palette: &Palette,
) -> Option<BlendedColor> {
    if contributors.is_empty() {
        return None;
    }
    // fixed accumulation order keeps the float sums identical for any input order
    contributors.sort();

    let mut w_sum = 0.0;
    let (mut l_sum, mut a_sum, mut b_sum) = (0.0, 0.0, 0.0);
    let mut alpha_comp = 1.0;

    for (category, severity) in contributors.iter() {
        let lab = palette.base_color(category).to_oklab();
        let w = palette.weight(*severity);
        w_sum += w;
        l_sum += lab.l * w;
        a_sum += lab.a * w;
        b_sum += lab.b * w;
        alpha_comp *= 1.0 - w;
    }

    let mix = Oklab {
        l: l_sum / w_sum,
        a: a_sum / w_sum,
        b: b_sum / w_sum,
    };
    let [r, g, b] = mix.to_srgb8();
    let alpha = palette.alpha_cap.min(1.0 - alpha_comp);

    Some(BlendedColor { r, g, b, alpha })
}
