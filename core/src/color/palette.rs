use crate::annotation::model::{Category, Severity};
use crate::color::oklab::Oklch;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Per-severity weight, used both as highlight opacity and as blend mixing weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityWeights {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        SeverityWeights {
            low: 0.14,
            medium: 0.26,
            high: 0.40,
        }
    }
}

impl SeverityWeights {
    pub fn weight(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Low => self.low,
            Severity::Medium => self.medium,
            Severity::High => self.high,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub bias: Oklch,
    pub fallacy: Oklch,
    pub tactic: Oklch,
    /// Also used for categories the palette does not know.
    pub factcheck: Oklch,
    pub weights: SeverityWeights,
    pub alpha_cap: f64,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            bias: Oklch::new(0.72, 0.14, 340.0),
            fallacy: Oklch::new(0.74, 0.13, 75.0),
            tactic: Oklch::new(0.74, 0.12, 210.0),
            factcheck: Oklch::new(0.72, 0.13, 280.0),
            weights: SeverityWeights::default(),
            alpha_cap: 0.40,
        }
    }
}

impl Palette {
    pub fn base_color(&self, category: &Category) -> Oklch {
        match category {
            Category::Bias => self.bias,
            Category::Fallacy => self.fallacy,
            Category::Tactic => self.tactic,
            Category::FactCheck | Category::Other(_) => self.factcheck,
        }
    }

    pub fn weight(&self, severity: Severity) -> f64 {
        self.weights.weight(severity)
    }

    /// Solid `rgb(r g b)` form of a category color, for legends and list badges.
    pub fn solid_css(&self, category: &Category) -> String {
        let [r, g, b] = self.base_color(category).to_srgb8();
        format!("rgb({} {} {})", r, g, b)
    }

    pub fn validate(&self) -> CoreResult<()> {
        let w = &self.weights;
        for (name, v) in [("low", w.low), ("medium", w.medium), ("high", w.high)] {
            if !(v > 0.0 && v < 1.0) {
                return Err(CoreError::Config(format!(
                    "severity weight {} must be in (0, 1), got {}",
                    name, v
                )));
            }
        }
        if !(w.low <= w.medium && w.medium <= w.high) {
            return Err(CoreError::Config(
                "severity weights must not decrease with severity".to_string(),
            ));
        }
        if !(self.alpha_cap > 0.0 && self.alpha_cap <= 1.0) {
            return Err(CoreError::Config(format!(
                "alpha_cap must be in (0, 1], got {}",
                self.alpha_cap
            )));
        }
        for c in [self.bias, self.fallacy, self.tactic, self.factcheck] {
            if !(0.0..=1.0).contains(&c.l) || c.c < 0.0 || !c.h.is_finite() {
                return Err(CoreError::Config(format!(
                    "invalid OKLCH color L={} C={} h={}",
                    c.l, c.c, c.h
                )));
            }
        }
        Ok(())
    }
}
