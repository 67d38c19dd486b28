use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::CoreError;

/// A tracked denomination. The order of `ALL` is the display order used
/// everywhere (delta groups, CSV columns, breakdowns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Denomination {
    /// US dollars (foreign fiat)
    Usd,
    /// Egyptian pounds (local fiat)
    Egp,
    /// Grams of 18 karat gold
    Gold18,
    /// Grams of 21 karat gold
    Gold21,
    /// Grams of 24 karat gold (reference purity)
    Gold24,
}

impl Denomination {
    pub const ALL: [Denomination; 5] = [
        Denomination::Usd,
        Denomination::Egp,
        Denomination::Gold18,
        Denomination::Gold21,
        Denomination::Gold24,
    ];

    /// Stable field name used in stored records and exports.
    pub fn key(&self) -> &'static str {
        match self {
            Denomination::Usd => "usd",
            Denomination::Egp => "egp",
            Denomination::Gold18 => "gold18",
            Denomination::Gold21 => "gold21",
            Denomination::Gold24 => "gold24",
        }
    }

    pub fn is_gold(&self) -> bool {
        matches!(
            self,
            Denomination::Gold18 | Denomination::Gold21 | Denomination::Gold24
        )
    }
}

impl std::fmt::Display for Denomination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Denomination::Usd => write!(f, "USD"),
            Denomination::Egp => write!(f, "EGP"),
            Denomination::Gold18 => write!(f, "Gold 18K"),
            Denomination::Gold21 => write!(f, "Gold 21K"),
            Denomination::Gold24 => write!(f, "Gold 24K"),
        }
    }
}

/// Holdings at a point in time, one quantity per denomination.
///
/// Missing or `null` fields in stored data read as zero. A snapshot is
/// replaced wholesale on every edit; `with` only builds new values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "zero_if_null")]
    pub usd: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub egp: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub gold18: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub gold21: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub gold24: f64,
}

fn zero_if_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with one quantity replaced.
    #[must_use]
    pub fn with(mut self, denomination: Denomination, amount: f64) -> Self {
        match denomination {
            Denomination::Usd => self.usd = amount,
            Denomination::Egp => self.egp = amount,
            Denomination::Gold18 => self.gold18 = amount,
            Denomination::Gold21 => self.gold21 = amount,
            Denomination::Gold24 => self.gold24 = amount,
        }
        self
    }

    pub fn get(&self, denomination: Denomination) -> f64 {
        match denomination {
            Denomination::Usd => self.usd,
            Denomination::Egp => self.egp,
            Denomination::Gold18 => self.gold18,
            Denomination::Gold21 => self.gold21,
            Denomination::Gold24 => self.gold24,
        }
    }

    /// True when every quantity is zero.
    pub fn is_empty(&self) -> bool {
        Denomination::ALL.iter().all(|d| self.get(*d) == 0.0)
    }

    /// Every quantity must be finite and non-negative.
    pub fn validate(&self) -> Result<(), CoreError> {
        for denomination in Denomination::ALL {
            let amount = self.get(denomination);
            if !amount.is_finite() || amount < 0.0 {
                return Err(CoreError::ValidationError(format!(
                    "{denomination} amount must be a non-negative number, got {amount}"
                )));
            }
        }
        Ok(())
    }
}
