//! Water-quality characteristics offered by the dashboard.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A named water-quality parameter. `Aluminum` is always charted first; the
/// rest are the selectable comparison series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Characteristic {
    Aluminum,
    #[default]
    Ammonium,
    Ph,
    DissolvedOxygen,
    EscherichiaColi,
    Nitrate,
    Chloride,
}

impl Characteristic {
    /// Fixed first series of every comparison.
    pub const PRIMARY: Characteristic = Characteristic::Aluminum;

    /// Choices for the second series, in menu order.
    pub const COMPARISONS: [Characteristic; 6] = [
        Characteristic::Ammonium,
        Characteristic::Ph,
        Characteristic::DissolvedOxygen,
        Characteristic::EscherichiaColi,
        Characteristic::Nitrate,
        Characteristic::Chloride,
    ];

    /// Spelling used in `CharacteristicName` cells.
    pub fn label(self) -> &'static str {
        match self {
            Characteristic::Aluminum => "Aluminum",
            Characteristic::Ammonium => "Ammonium",
            Characteristic::Ph => "pH",
            Characteristic::DissolvedOxygen => "Dissolved oxygen (DO)",
            Characteristic::EscherichiaColi => "Escherichia coli",
            Characteristic::Nitrate => "Nitrate",
            Characteristic::Chloride => "Chloride",
        }
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown characteristic '{0}' (expected one of: Ammonium, pH, Dissolved oxygen (DO), Escherichia coli, Nitrate, Chloride)")]
pub struct UnknownCharacteristic(pub String);

impl FromStr for Characteristic {
    type Err = UnknownCharacteristic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        std::iter::once(Characteristic::PRIMARY)
            .chain(Characteristic::COMPARISONS)
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCharacteristic(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!("ph".parse::<Characteristic>(), Ok(Characteristic::Ph));
        assert_eq!(
            "dissolved oxygen (do)".parse::<Characteristic>(),
            Ok(Characteristic::DissolvedOxygen)
        );
        assert!("Radon".parse::<Characteristic>().is_err());
    }

    #[test]
    fn default_comparison_is_ammonium() {
        assert_eq!(Characteristic::default(), Characteristic::COMPARISONS[0]);
    }
}
