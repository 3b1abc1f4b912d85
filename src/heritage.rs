// ⚖️ Succession Engine - What each member inherits from their ancestors
//
// Every asset kind walks the lineage from the family head down to the heir,
// but each one splits differently on the way:
//
// - Cash:        split between siblings (extra units to the oldest), and every
//                living parent keeps half of what reaches them
// - Real estate: only moves once the holder is dead; the remainder of a split
//                alternates direction with the parity of the quotient
// - Land:        only moves once the holder is dead, and only to the oldest son
//
// The walk is a fold over the lineage (root first), so no recursion is
// involved and deep families cannot overflow the stack.

use crate::assets::AssetKind;
use crate::family::MemberRef;
use chrono::NaiveDate;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

// ============================================================================
// CALCULATOR TRAIT
// ============================================================================

/// Succession rules injected into `MemberRef::get_heritage` / `get_patrimony`.
pub trait HeritageCalculator {
    /// Value inherited by `member` from its ancestors at `when`,
    /// not counting what the member owns.
    fn heritage(&self, member: MemberRef<'_>, when: NaiveDate) -> u64;
}

// ============================================================================
// SHARING RULES
// ============================================================================

/// Share of `amount` for the sibling at `position` (0 = oldest) among `siblings`.
///
/// Leftover units go one by one to the oldest siblings:
/// 50 among 3 → [17, 17, 16]
pub fn split_cash_among_siblings(amount: u64, position: usize, siblings: usize) -> u64 {
    let siblings = siblings.max(1) as u64;
    let share = amount / siblings;
    let leftover = amount % siblings;

    if (position as u64) < leftover {
        share + 1
    } else {
        share
    }
}

/// Units of real estate for the sibling at `position` (0 = oldest) among `siblings`.
///
/// Leftover units are handed out from the oldest when the quotient is odd and
/// from the youngest when it is even:
/// 10 among 3 → [4, 3, 3], 14 among 3 → [4, 5, 5]
pub fn share_units_among_siblings(units: u64, position: usize, siblings: usize) -> u64 {
    let siblings = siblings.max(1);
    let share = units / siblings as u64;
    let leftover = units % siblings as u64;

    if leftover == 0 {
        return share;
    }

    let rank = if share % 2 == 0 {
        siblings - 1 - position.min(siblings - 1)
    } else {
        position
    };

    if (rank as u64) < leftover {
        share + 1
    } else {
        share
    }
}

// ============================================================================
// HERITAGE BREAKDOWN
// ============================================================================

/// Inherited value per asset kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeritageBreakdown {
    pub cash: u64,
    pub land: u64,
    pub real_estate: u64,
}

impl HeritageBreakdown {
    pub fn total(&self) -> u64 {
        self.cash
            .saturating_add(self.land)
            .saturating_add(self.real_estate)
    }
}

// ============================================================================
// SUCCESSION ENGINE
// ============================================================================

/// Default succession rules
#[derive(Debug, Clone, Copy, Default)]
pub struct SuccessionEngine;

impl SuccessionEngine {
    pub fn new() -> Self {
        SuccessionEngine
    }

    /// Inherited value of each asset kind; all zero for the dead
    pub fn breakdown(&self, member: MemberRef<'_>, when: NaiveDate) -> HeritageBreakdown {
        if member.is_dead(when) {
            trace!("{} is dead on {}, inherits nothing", member.name(), when);
            return HeritageBreakdown::default();
        }

        let breakdown = HeritageBreakdown {
            cash: self
                .cash_from_ancestors(member, when)
                .saturating_mul(AssetKind::Cash.unit_value()),
            land: self
                .land_units_from_ancestors(member, when)
                .saturating_mul(AssetKind::Land.unit_value()),
            real_estate: self
                .real_estate_units_from_ancestors(member, when)
                .saturating_mul(AssetKind::RealEstate.unit_value()),
        };

        debug!(
            "Heritage of {} on {}: cash={} land={} real_estate={}",
            member.name(),
            when,
            breakdown.cash,
            breakdown.land,
            breakdown.real_estate
        );
        breakdown
    }

    /// Cash reaching `heir` from the family head.
    ///
    /// A living member with children keeps only half of their share. The heir
    /// being queried rounds that half up; ancestors on the way round it down
    /// before passing it on.
    pub fn cash_from_ancestors(&self, heir: MemberRef<'_>, when: NaiveDate) -> u64 {
        let lineage = heir.lineage();
        let Some((head, descendants)) = lineage.split_first() else {
            return 0;
        };

        let mut amount = head.assets().get(AssetKind::Cash).units();

        for member in descendants {
            let position = member.position_among_siblings().unwrap_or(0);
            amount = split_cash_among_siblings(amount, position, member.sibling_count());

            // The dead pass everything down, the childless keep everything
            if member.is_dead(when) || !member.has_children() {
                trace!("cash: {} passes {} through", member.name(), amount);
                continue;
            }

            amount = if member == &heir {
                amount.div_ceil(2)
            } else {
                amount / 2
            };
            trace!("cash: {} keeps {}", member.name(), amount);
        }

        amount
    }

    /// Land units reaching `heir`, accumulated along the oldest-son line.
    pub fn land_units_from_ancestors(&self, heir: MemberRef<'_>, when: NaiveDate) -> u64 {
        let lineage = heir.lineage();
        let mut units = lineage
            .first()
            .map_or(0, |head| head.assets().get(AssetKind::Land).units());

        for pair in lineage.windows(2) {
            let (parent, member) = (&pair[0], &pair[1]);

            if !parent.is_dead(when) {
                units = 0;
                continue;
            }

            if member.is_dead(when) {
                units = units.saturating_add(member.assets().get(AssetKind::Land).units());
            }

            if !member.is_the_oldest_son() {
                units = 0;
            }
            trace!("land: {} holds {} units", member.name(), units);
        }

        units
    }

    /// Real-estate units reaching `heir`, shared out generation by generation.
    pub fn real_estate_units_from_ancestors(&self, heir: MemberRef<'_>, when: NaiveDate) -> u64 {
        let lineage = heir.lineage();
        let mut units = lineage
            .first()
            .map_or(0, |head| head.assets().get(AssetKind::RealEstate).units());

        for pair in lineage.windows(2) {
            let (parent, member) = (&pair[0], &pair[1]);

            if !parent.is_dead(when) {
                units = 0;
                continue;
            }

            let position = member.position_among_siblings().unwrap_or(0);
            units = share_units_among_siblings(units, position, member.sibling_count());

            if member.is_dead(when) {
                units = units.saturating_add(member.assets().get(AssetKind::RealEstate).units());
            }
            trace!("real estate: {} holds {} units", member.name(), units);
        }

        units
    }
}

impl HeritageCalculator for SuccessionEngine {
    fn heritage(&self, member: MemberRef<'_>, when: NaiveDate) -> u64 {
        self.breakdown(member, when).total()
    }
}

// ============================================================================
// TESTS
// ============================================================================
