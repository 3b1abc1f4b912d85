// 💰 Assets - What a family member owns
//
// Three kinds of wealth, each with its own unit price:
// - Cash:        1 unit = 1
// - Land:        1 unit (square meter) = 300
// - Real estate: 1 unit (property) = 1,000,000
//
// A member holds at most one aggregated Asset per kind.

use crate::error::{HeritageError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Value of one square meter of land
pub const LAND_UNIT_VALUE: u64 = 300;

/// Value of one property
pub const REAL_ESTATE_UNIT_VALUE: u64 = 1_000_000;

// ============================================================================
// ASSET KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Money, valued unit per unit
    Cash,

    /// Square meters of land
    Land,

    /// Whole properties (houses, flats, buildings)
    RealEstate,
}

impl AssetKind {
    /// All recognised kinds, in ledger order
    pub const ALL: [AssetKind; 3] = [AssetKind::Cash, AssetKind::Land, AssetKind::RealEstate];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Cash => "cash",
            AssetKind::Land => "land",
            AssetKind::RealEstate => "real estate",
        }
    }

    /// Monetary value of a single unit of this kind
    pub fn unit_value(&self) -> u64 {
        match self {
            AssetKind::Cash => 1,
            AssetKind::Land => LAND_UNIT_VALUE,
            AssetKind::RealEstate => REAL_ESTATE_UNIT_VALUE,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = HeritageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "money" => Ok(AssetKind::Cash),
            "land" | "lands" => Ok(AssetKind::Land),
            "real_estate" | "realestate" | "real estate" | "property" => {
                Ok(AssetKind::RealEstate)
            }
            _ => Err(HeritageError::InvalidAssetKind(s.to_string())),
        }
    }
}

// ============================================================================
// ASSET
// ============================================================================

/// A quantity of one kind of wealth.
///
/// The value is always derived from the units, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    kind: AssetKind,
    units: u64,
}

impl Asset {
    pub fn new(kind: AssetKind, units: u64) -> Self {
        Asset { kind, units }
    }

    /// Empty asset of the given kind
    pub fn zero(kind: AssetKind) -> Self {
        Asset::new(kind, 0)
    }

    pub fn cash(units: u64) -> Self {
        Asset::new(AssetKind::Cash, units)
    }

    pub fn land(units: u64) -> Self {
        Asset::new(AssetKind::Land, units)
    }

    pub fn real_estate(units: u64) -> Self {
        Asset::new(AssetKind::RealEstate, units)
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn units(&self) -> u64 {
        self.units
    }

    /// Monetary value (units × unit price), capped at `u64::MAX`
    pub fn value(&self) -> u64 {
        self.units.saturating_mul(self.kind.unit_value())
    }

    /// Monetary value, or None when it does not fit in a `u64`
    pub fn checked_value(&self) -> Option<u64> {
        self.units.checked_mul(self.kind.unit_value())
    }

    /// Merge another asset of the same kind into this one.
    ///
    /// On a kind mismatch or an overflowing total `self` is left untouched.
    pub fn add(&mut self, other: &Asset) -> Result<&mut Self> {
        if self.kind != other.kind {
            return Err(HeritageError::DifferentAssetKinds {
                left: self.to_string(),
                right: other.to_string(),
            });
        }

        let merged = self
            .units
            .checked_add(other.units)
            .map(|units| Asset::new(self.kind, units))
            .filter(|merged| merged.checked_value().is_some())
            .ok_or_else(|| HeritageError::AmountOverflow {
                held: self.to_string(),
                added: other.to_string(),
            })?;

        self.units = merged.units;
        Ok(self)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.units, self.kind)
    }
}

// ============================================================================
// ASSET COLLECTION
// ============================================================================

/// Per-member ledger: one aggregated asset per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCollection {
    assets: BTreeMap<AssetKind, Asset>,
}

impl AssetCollection {
    pub fn new() -> Self {
        AssetCollection::default()
    }

    /// Build a collection, merging repeated kinds
    pub fn from_assets<I>(assets: I) -> Result<Self>
    where
        I: IntoIterator<Item = Asset>,
    {
        let mut collection = AssetCollection::new();
        collection.add_multiple(assets)?;
        Ok(collection)
    }

    /// Insert a new kind or merge into the existing entry of that kind.
    ///
    /// Every stored asset keeps a value that fits in a `u64`.
    pub fn add(&mut self, asset: Asset) -> Result<&mut Self> {
        match self.assets.get_mut(&asset.kind()) {
            Some(existing) => {
                existing.add(&asset)?;
            }
            None => {
                let mut fresh = Asset::zero(asset.kind());
                fresh.add(&asset)?;
                self.assets.insert(asset.kind(), fresh);
            }
        }
        Ok(self)
    }

    pub fn add_multiple<I>(&mut self, assets: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = Asset>,
    {
        for asset in assets {
            self.add(asset)?;
        }
        Ok(self)
    }

    pub fn clear(&mut self) -> &mut Self {
        self.assets.clear();
        self
    }

    /// Stored asset of this kind, or an empty one
    pub fn get(&self, kind: AssetKind) -> Asset {
        self.assets.get(&kind).copied().unwrap_or_else(|| Asset::zero(kind))
    }

    /// Lookup by kind name (e.g. "land"), failing on unknown kinds
    pub fn get_by_name(&self, kind: &str) -> Result<Asset> {
        Ok(self.get(kind.parse()?))
    }

    pub fn value_of(&self, kind: AssetKind) -> u64 {
        self.get(kind).value()
    }

    /// Sum of the values of every kind held, capped at `u64::MAX`
    pub fn total_value(&self) -> u64 {
        self.assets
            .values()
            .fold(0u64, |total, asset| total.saturating_add(asset.value()))
    }

    /// Value of one kind, or of the whole collection when no kind is given
    pub fn get_value(&self, kind: Option<AssetKind>) -> u64 {
        match kind {
            Some(kind) => self.value_of(kind),
            None => self.total_value(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
