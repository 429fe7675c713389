//! Color names as they appear in scene documents.

/// Linear RGBA, the layout renderers upload directly.
pub type Rgba = [f32; 4];

const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

pub(crate) const RED: Rgba = rgb(230, 41, 55);
pub(crate) const GREEN: Rgba = rgb(0, 228, 48);
pub(crate) const BLUE: Rgba = rgb(0, 121, 241);

const NAMED: [(&str, Rgba); 13] = [
    ("black", rgb(0, 0, 0)),
    ("white", rgb(255, 255, 255)),
    ("gray", rgb(130, 130, 130)),
    ("grey", rgb(130, 130, 130)),
    ("red", RED),
    ("green", GREEN),
    ("blue", BLUE),
    ("yellow", rgb(253, 249, 0)),
    ("orange", rgb(255, 161, 0)),
    ("purple", rgb(200, 122, 255)),
    ("pink", rgb(255, 109, 194)),
    ("brown", rgb(127, 106, 79)),
    ("magenta", rgb(255, 0, 255)),
];

/// Parses a color name (case-insensitive) or `#rrggbb` / `#rrggbbaa`.
pub fn parse(spec: &str) -> Option<Rgba> {
    let spec = spec.trim();
    if let Some(hex) = spec.strip_prefix('#') {
        return parse_hex(hex);
    }
    NAMED
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(spec))
        .map(|(_, rgba)| *rgba)
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    let [r, g, b] = [channel(0)?, channel(2)?, channel(4)?];
    Some([
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        alpha as f32 / 255.0,
    ])
}
