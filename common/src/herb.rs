use serde::{Deserialize, Serialize};
use std::fmt;

/// Herb varieties accepted by the platform. Registration of anything outside
/// this set is a validation error, so downstream code never sees an unknown
/// category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HerbCategory {
    Tulsi,
    Ashwagandha,
    Turmeric,
    Neem,
    AloeVera,
    Brahmi,
    Shankhpushpi,
    Giloy,
    Amla,
    Arjuna,
}

impl HerbCategory {
    pub fn all() -> &'static [HerbCategory] {
        &[
            HerbCategory::Tulsi,
            HerbCategory::Ashwagandha,
            HerbCategory::Turmeric,
            HerbCategory::Neem,
            HerbCategory::AloeVera,
            HerbCategory::Brahmi,
            HerbCategory::Shankhpushpi,
            HerbCategory::Giloy,
            HerbCategory::Amla,
            HerbCategory::Arjuna,
        ]
    }

    /// Display label, matching what registration forms show.
    pub fn label(&self) -> &'static str {
        match self {
            HerbCategory::Tulsi => "Tulsi (Holy Basil)",
            HerbCategory::Ashwagandha => "Ashwagandha",
            HerbCategory::Turmeric => "Turmeric",
            HerbCategory::Neem => "Neem",
            HerbCategory::AloeVera => "Aloe Vera",
            HerbCategory::Brahmi => "Brahmi",
            HerbCategory::Shankhpushpi => "Shankhpushpi",
            HerbCategory::Giloy => "Giloy",
            HerbCategory::Amla => "Amla",
            HerbCategory::Arjuna => "Arjuna",
        }
    }

    /// Parse a form label back into a category. Accepts the full display
    /// label or the bare variant name ("Turmeric", "Aloe Vera").
    pub fn from_label(label: &str) -> Option<HerbCategory> {
        let trimmed = label.trim();
        Self::all()
            .iter()
            .find(|h| {
                h.label().eq_ignore_ascii_case(trimmed)
                    || short_name(**h).eq_ignore_ascii_case(trimmed)
            })
            .copied()
    }
}

fn short_name(herb: HerbCategory) -> &'static str {
    match herb {
        HerbCategory::Tulsi => "Tulsi",
        other => other.label(),
    }
}

impl fmt::Display for HerbCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Quantity unit for a harvest lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    Kg,
    Tons,
    Pounds,
}

impl Unit {
    pub fn all() -> &'static [Unit] {
        &[Unit::Kg, Unit::Tons, Unit::Pounds]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::Tons => "tons",
            Unit::Pounds => "pounds",
        }
    }

    pub fn from_label(label: &str) -> Option<Unit> {
        Self::all()
            .iter()
            .find(|u| u.label().eq_ignore_ascii_case(label.trim()))
            .copied()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
