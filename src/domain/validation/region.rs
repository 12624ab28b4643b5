//! Brazilian federative units (UF): validation and normalization.

use std::fmt;

const STATES: [(&str, &str); 27] = [
    ("AC", "Acre"),
    ("AL", "Alagoas"),
    ("AP", "Amapá"),
    ("AM", "Amazonas"),
    ("BA", "Bahia"),
    ("CE", "Ceará"),
    ("DF", "Distrito Federal"),
    ("ES", "Espírito Santo"),
    ("GO", "Goiás"),
    ("MA", "Maranhão"),
    ("MT", "Mato Grosso"),
    ("MS", "Mato Grosso do Sul"),
    ("MG", "Minas Gerais"),
    ("PA", "Pará"),
    ("PB", "Paraíba"),
    ("PR", "Paraná"),
    ("PE", "Pernambuco"),
    ("PI", "Piauí"),
    ("RJ", "Rio de Janeiro"),
    ("RN", "Rio Grande do Norte"),
    ("RS", "Rio Grande do Sul"),
    ("RO", "Rondônia"),
    ("RR", "Roraima"),
    ("SC", "Santa Catarina"),
    ("SP", "São Paulo"),
    ("SE", "Sergipe"),
    ("TO", "Tocantins"),
];

/// All 27 units as `(code, display name)`.
pub fn brazilian_states() -> &'static [(&'static str, &'static str)] {
    &STATES
}

/// A validated two-letter state code.
///
/// The only way to obtain one is `parse`, so holding a `RegionCode` means
/// the input matched a real state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionCode {
    code: &'static str,
    name: &'static str,
}

impl RegionCode {
    /// Matches a code (`"sp"`) or full name (`" São Paulo "`), ignoring case
    /// and surrounding whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_uppercase();
        if wanted.is_empty() {
            return None;
        }
        STATES
            .iter()
            .find(|(code, name)| *code == wanted || name.to_uppercase() == wanted)
            .map(|&(code, name)| Self { code, name })
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// True when `raw` names one of the 27 units by code or name.
pub fn validate_region_code(raw: &str) -> bool {
    RegionCode::parse(raw).is_some()
}

/// Maps a code or name to its two-letter code.
///
/// Unmatched input comes back trimmed and uppercased so callers never see an
/// empty value. Call `validate_region_code` first, or use `RegionCode::parse`
/// which does both.
pub fn normalize_region_code(raw: &str) -> String {
    match RegionCode::parse(raw) {
        Some(region) => region.code().to_string(),
        None => raw.trim().to_uppercase(),
    }
}
