//! Color values and conversions
//!
//! RGBA value type with hex parsing, alpha compositing, and terminal
//! color quantization for the live preview.

use palette::{blend::Compose, LinSrgba, Srgba};

use crate::terminal_capabilities::ColorSupport;

/// RGBA color with 8-bit channels. Alpha 255 is fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rgb`, `#rrggbb`, or `#rrggbbaa` (leading `#` optional).
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        match hex.len() {
            3 => {
                let channel = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .ok()
                        .map(|v| v * 17)
                };
                Some(Self::opaque(channel(0)?, channel(1)?, channel(2)?))
            }
            6 | 8 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                let a = if hex.len() == 8 { channel(6)? } else { 255 };
                Some(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
            }
            _ => None,
        }
    }

    /// Format as `#rrggbb` for opaque colors, `#rrggbbaa` otherwise.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Composite `self` over `below` (both with alpha), returning the blended
    /// color. Blending happens in linear light.
    pub fn over(&self, below: Rgba) -> Rgba {
        let fg: LinSrgba<f32> = Srgba::new(self.r, self.g, self.b, self.a)
            .into_format::<f32, f32>()
            .into_linear();
        let bg: LinSrgba<f32> = Srgba::new(below.r, below.g, below.b, below.a)
            .into_format::<f32, f32>()
            .into_linear();

        let out: Srgba<u8> = Srgba::<f32>::from_linear(fg.over(bg)).into_format();
        Rgba::new(out.red, out.green, out.blue, out.alpha)
    }

}

/// Convert RGB to perceptual luminance (0.0 to 1.0)
///
/// Uses ITU-R BT.709 (HDTV) coefficients for perceptually accurate grayscale.
pub fn rgb_to_luminance(r: u8, g: u8, b: u8) -> f32 {
    0.2126 * (r as f32 / 255.0) + 0.7152 * (g as f32 / 255.0) + 0.0722 * (b as f32 / 255.0)
}

/// Quantize RGB to the ANSI 256-color palette
pub fn quantize_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    // Check if it's close to a grayscale value (232-255)
    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let gray_diff = (r as i16 - avg as i16).abs().max(
        (g as i16 - avg as i16)
            .abs()
            .max((b as i16 - avg as i16).abs()),
    );

    if gray_diff < 10 {
        // Use grayscale ramp (232-255, 24 levels)
        let gray_index = (avg as f32 / 255.0 * 23.0).round() as u8;
        return 232 + gray_index;
    }

    // Use 6x6x6 color cube (16-231)
    let r_index = (r as f32 / 255.0 * 5.0).round() as u8;
    let g_index = (g as f32 / 255.0 * 5.0).round() as u8;
    let b_index = (b as f32 / 255.0 * 5.0).round() as u8;

    16 + 36 * r_index + 6 * g_index + b_index
}

/// Quantize RGB to the ANSI 16-color palette
pub fn quantize_to_ansi16(r: u8, g: u8, b: u8) -> u8 {
    let luminance = rgb_to_luminance(r, g, b);
    let bright = luminance > 0.5;

    let rf = r as f32 / 255.0;
    let gf = g as f32 / 255.0;
    let bf = b as f32 / 255.0;

    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let saturation = if max > 0.0 { (max - min) / max } else { 0.0 };

    // If low saturation, use black/white/gray
    if saturation < 0.2 {
        return if luminance > 0.7 {
            15 // Bright white
        } else if luminance > 0.3 {
            7 // White (light gray)
        } else {
            0 // Black
        };
    }

    let color_base = if rf >= gf && rf >= bf {
        if gf > bf {
            3 // Yellow
        } else {
            1 // Red
        }
    } else if gf >= rf && gf >= bf {
        if bf > rf {
            6 // Cyan
        } else {
            2 // Green
        }
    } else if rf > gf {
        5 // Magenta
    } else {
        4 // Blue
    };

    if bright {
        color_base + 8 // Bright variant
    } else {
        color_base
    }
}

/// ANSI reset sequence
pub const ANSI_RESET: &str = "\x1b[0m";

/// Format a foreground color escape sequence for the given support level
pub fn format_fg_color(r: u8, g: u8, b: u8, support: ColorSupport) -> String {
    match support {
        ColorSupport::NoColor => String::new(),
        ColorSupport::Color16 => {
            let code = quantize_to_ansi16(r, g, b);
            if code < 8 {
                format!("\x1b[{}m", 30 + code)
            } else {
                format!("\x1b[{}m", 90 + (code - 8))
            }
        }
        ColorSupport::Color256 => format!("\x1b[38;5;{}m", quantize_to_ansi256(r, g, b)),
        ColorSupport::TrueColor => format!("\x1b[38;2;{};{};{}m", r, g, b),
    }
}

/// Format a background color escape sequence for the given support level
pub fn format_bg_color(r: u8, g: u8, b: u8, support: ColorSupport) -> String {
    match support {
        ColorSupport::NoColor => String::new(),
        ColorSupport::Color16 => {
            let code = quantize_to_ansi16(r, g, b);
            if code < 8 {
                format!("\x1b[{}m", 40 + code)
            } else {
                format!("\x1b[{}m", 100 + (code - 8))
            }
        }
        ColorSupport::Color256 => format!("\x1b[48;5;{}m", quantize_to_ansi256(r, g, b)),
        ColorSupport::TrueColor => format!("\x1b[48;2;{};{};{}m", r, g, b),
    }
}
