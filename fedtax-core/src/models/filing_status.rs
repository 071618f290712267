use serde::{Deserialize, Serialize};

/// Federal filing status.
///
/// Parsing is strict: an unrecognized code yields `None`, never a default
/// status. Callers that read codes from external data must treat `None` as an
/// error rather than substituting a fallback bracket set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingStatusCode {
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
    QualifyingSurvivingSpouse,
}

impl FilingStatusCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedFilingJointly => "MFJ",
            Self::MarriedFilingSeparately => "MFS",
            Self::HeadOfHousehold => "HOH",
            Self::QualifyingSurvivingSpouse => "QSS",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "S" => Some(Self::Single),
            "MFJ" => Some(Self::MarriedFilingJointly),
            "MFS" => Some(Self::MarriedFilingSeparately),
            "HOH" => Some(Self::HeadOfHousehold),
            "QSS" => Some(Self::QualifyingSurvivingSpouse),
            _ => None,
        }
    }

    /// True for married-filing-separately, which halves the mortgage debt
    /// ceilings.
    pub fn is_separate(&self) -> bool {
        matches!(self, Self::MarriedFilingSeparately)
    }

    /// True when a spouse appears on the same return (joint filing).
    pub fn is_joint(&self) -> bool {
        matches!(
            self,
            Self::MarriedFilingJointly | Self::QualifyingSurvivingSpouse
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingStatus {
    pub id: i32,
    pub status_code: FilingStatusCode,
    pub status_name: String,
}
