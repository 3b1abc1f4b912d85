// Heritage - Core Library
// Family tree, asset ledger and succession engine, used by the CLI and tests

pub mod assets;
pub mod document;
pub mod error;
pub mod family;
pub mod heritage;
pub mod names;

// Re-export commonly used types
pub use assets::{Asset, AssetCollection, AssetKind, LAND_UNIT_VALUE, REAL_ESTATE_UNIT_VALUE};
pub use document::FamilyDocument;
pub use error::{HeritageError, Result};
pub use family::{FamilyMember, FamilyTree, MemberId, MemberRef, LIFESPAN_YEARS};
pub use heritage::{
    share_units_among_siblings, split_cash_among_siblings, HeritageBreakdown, HeritageCalculator,
    SuccessionEngine,
};
pub use names::UniqueNameChecker;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
