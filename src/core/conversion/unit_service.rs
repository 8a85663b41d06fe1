//! Spots imperial lengths in chat and converts them to meters.

use once_cell::sync::Lazy;
use regex::Regex;

const METERS_PER_FOOT: f64 = 0.3048;
const METERS_PER_INCH: f64 = 0.0254;

// Feet with optional trailing inches ("5'11\"", "6 ft 2 in", "5 feet and 3
// inches"), or inches alone. The combined alternative comes first so a
// height like 5'11" is one match, not two.
static IMPERIAL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(\d+(?:\.\d+)?)\s*(?:'|ft\b|foot\b|feet\b)(?:\s*(?:and\s*)?(\d+(?:\.\d+)?)\s*(?:"|in\b|inch\b|inches\b))?|(\d+(?:\.\d+)?)\s*(?:"|in\b|inch\b|inches\b)"#,
    )
    .expect("imperial pattern compiles")
});

/// One detected measurement and its metric equivalent.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub matched: String,
    pub meters: f64,
}

#[derive(Debug, Default)]
pub struct UnitConversionService;

impl UnitConversionService {
    pub fn new() -> Self {
        Self
    }

    /// Scan free-form text for imperial lengths, in order of appearance.
    pub fn scan(&self, text: &str) -> Vec<Conversion> {
        IMPERIAL_PATTERN
            .captures_iter(text)
            .filter_map(|caps| {
                let feet = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok());
                let inches = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .and_then(|m| m.as_str().parse::<f64>().ok());
                if feet.is_none() && inches.is_none() {
                    return None;
                }
                let meters = feet.unwrap_or(0.0) * METERS_PER_FOOT
                    + inches.unwrap_or(0.0) * METERS_PER_INCH;
                Some(Conversion {
                    matched: caps.get(0)?.as_str().trim().to_string(),
                    meters,
                })
            })
            .collect()
    }
}
