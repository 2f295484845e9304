//! OKLCH / OKLab / sRGB conversions (Björn Ottosson's OKLab matrices).

use serde::{Deserialize, Serialize};

/// Cylindrical OKLab: lightness, chroma, hue in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oklch {
    #[serde(rename = "L")]
    pub l: f64,
    #[serde(rename = "C")]
    pub c: f64,
    pub h: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oklab {
    #[serde(rename = "L")]
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Oklch {
    pub const fn new(l: f64, c: f64, h: f64) -> Self {
        Oklch { l, c, h }
    }

    pub fn to_oklab(self) -> Oklab {
        let hr = self.h.to_radians();
        Oklab {
            l: self.l,
            a: self.c * hr.cos(),
            b: self.c * hr.sin(),
        }
    }

    pub fn to_srgb8(self) -> [u8; 3] {
        self.to_oklab().to_srgb8()
    }
}

impl Oklab {
    pub fn to_linear_srgb(self) -> LinearRgb {
        let l_ = self.l + 0.396_337_777_4 * self.a + 0.215_803_757_3 * self.b;
        let m_ = self.l - 0.105_561_345_8 * self.a - 0.063_854_172_8 * self.b;
        let s_ = self.l - 0.089_484_177_5 * self.a - 1.291_485_548_0 * self.b;

        let l = l_ * l_ * l_;
        let m = m_ * m_ * m_;
        let s = s_ * s_ * s_;

        LinearRgb {
            r: 4.076_741_662_1 * l - 3.307_711_591_3 * m + 0.230_969_929_2 * s,
            g: -1.268_438_004_6 * l + 2.609_757_401_1 * m - 0.341_319_396_5 * s,
            b: -0.004_196_086_3 * l - 0.703_418_614_7 * m + 1.707_614_701_0 * s,
        }
    }

    pub fn to_srgb8(self) -> [u8; 3] {
        let lin = self.to_linear_srgb();
        [
            encode_channel(lin.r),
            encode_channel(lin.g),
            encode_channel(lin.b),
        ]
    }
}

/// sRGB transfer function on a linear channel clamped to [0, 1].
pub fn linear_to_srgb(x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    if x <= 0.003_130_8 {
        12.92 * x
    } else {
        1.055 * x.powf(1.0 / 2.4) - 0.055
    }
}

fn encode_channel(x: f64) -> u8 {
    (255.0 * linear_to_srgb(x)).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_grey_has_equal_channels() {
        let rgb = Oklab { l: 0.6, a: 0.0, b: 0.0 }.to_srgb8();
        assert_eq!(rgb[0], rgb[1]);
        assert_eq!(rgb[1], rgb[2]);
    }

    #[test]
    fn white_and_black_endpoints() {
        assert_eq!(Oklab { l: 1.0, a: 0.0, b: 0.0 }.to_srgb8(), [255, 255, 255]);
        assert_eq!(Oklab { l: 0.0, a: 0.0, b: 0.0 }.to_srgb8(), [0, 0, 0]);
    }

    #[test]
    fn bias_hue_is_magenta_leaning() {
        let [r, g, b] = Oklch::new(0.72, 0.14, 340.0).to_srgb8();
        assert!(r > g && b > g);
    }
}
