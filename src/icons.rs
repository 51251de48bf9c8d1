//! OpenWeatherMap icon codes mapped to display glyphs.
//!
//! The table is data: supporting a new code means adding a row.

/// Glyph used for any code missing from [`ICON_GLYPHS`]
pub const FALLBACK_GLYPH: &str = "🌍";

/// Day (`d`) and night (`n`) variants of every documented condition code
const ICON_GLYPHS: &[(&str, &str)] = &[
    ("01d", "☀️"),
    ("01n", "🌙"),
    ("02d", "⛅"),
    ("02n", "☁️"),
    ("03d", "☁️"),
    ("03n", "☁️"),
    ("04d", "☁️"),
    ("04n", "☁️"),
    ("09d", "🌧️"),
    ("09n", "🌧️"),
    ("10d", "🌦️"),
    ("10n", "🌦️"),
    ("11d", "⛈️"),
    ("11n", "⛈️"),
    ("13d", "❄️"),
    ("13n", "❄️"),
    ("50d", "🌫️"),
    ("50n", "🌫️"),
];

/// Resolve an icon code to its glyph. Total: unknown codes get [`FALLBACK_GLYPH`].
pub fn glyph_for(code: &str) -> &'static str {
    ICON_GLYPHS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, glyph)| *glyph)
        .unwrap_or(FALLBACK_GLYPH)
}
