// 📄 Family Documents - Describe a family as JSON
//
// Input format for the command-line driver. A document is read, never
// written: the tree is rebuilt through `born` / `give_birth`, so every
// birth is validated exactly as if it were done by hand.
//
// {
//   "name": "A", "born": "1920-02-02",
//   "assets": { "cash": 100000, "land": 5000, "real_estate": 7 },
//   "children": [ { "name": "B", "born": "1950-05-05" } ]
// }

use crate::assets::{Asset, AssetKind};
use crate::family::{FamilyTree, MemberId};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyDocument {
    pub name: String,

    pub born: NaiveDate,

    /// Units held, per asset kind
    #[serde(default)]
    pub assets: BTreeMap<AssetKind, u64>,

    /// Children in any order (the tree sorts them)
    #[serde(default)]
    pub children: Vec<FamilyDocument>,
}

impl FamilyDocument {
    /// Load a family from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read family file: {:?}", path.as_ref()))?;

        FamilyDocument::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse family JSON")
    }

    /// Build and validate the tree described by this document
    pub fn build(&self) -> Result<FamilyTree> {
        let mut tree = FamilyTree::born(&self.name, self.born);
        let head = tree.head();
        self.attach(&mut tree, head)?;
        Ok(tree)
    }

    fn attach(&self, tree: &mut FamilyTree, id: MemberId) -> Result<()> {
        let assets = self.assets.iter().map(|(kind, units)| Asset::new(*kind, *units));
        tree.add_assets(id, assets)?;

        // Explicit stack: documents may be arbitrarily deep
        let mut pending: Vec<(MemberId, &FamilyDocument)> =
            self.children.iter().map(|child| (id, child)).collect();

        while let Some((parent, doc)) = pending.pop() {
            let child = tree
                .give_birth(parent, &doc.name, doc.born)
                .with_context(|| format!("Invalid member '{}'", doc.name))?;

            let assets = doc.assets.iter().map(|(kind, units)| Asset::new(*kind, *units));
            tree.add_assets(child, assets)?;

            pending.extend(doc.children.iter().map(|grandchild| (child, grandchild)));
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
