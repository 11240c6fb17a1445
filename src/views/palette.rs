use crate::pipeline::normalize::UNKNOWN_PARTY_CODE;
use fnv::FnvHasher;
use std::hash::Hasher;

const KNOWN_COLORS: &[(&str, &str)] = &[
    ("BJP", "#FF5722"),
    ("INC", "#1976D2"),
    ("INLD", "#4CAF50"),
    ("AAP", "#FFC107"),
    ("JJP", "#E91E63"),
    (UNKNOWN_PARTY_CODE, "#CCCCCC"),
];

/// Chart colour for a party code. Unlisted parties get a colour derived from
/// the code itself, so it is the same on every call and in every process.
pub fn party_color(code: &str) -> String {
    if let Some((_, color)) = KNOWN_COLORS.iter().find(|(known, _)| *known == code) {
        return color.to_string();
    }
    // Unseeded, so a code maps to the same colour in every process.
    let mut hasher = FnvHasher::default();
    hasher.write(code.as_bytes());
    format!("#{:06X}", hasher.finish() & 0xFF_FFFF)
}
