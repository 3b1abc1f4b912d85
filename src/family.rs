// 🌳 Family Tree - Append-only genealogy with owned assets
//
// The tree owns every member. A parent owns its children through an ordered
// list of ids; the parent link on a child is a plain id, used for lookups only.
//
// Invariants (checked once, at birth time):
// - names are unique across the whole family
// - a child is never born before its parent
// - children stay sorted by (birth date, name), oldest first

use crate::assets::{Asset, AssetCollection};
use crate::error::{HeritageError, Result};
use crate::heritage::HeritageCalculator;
use crate::names::UniqueNameChecker;
use chrono::{Local, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Whole years after which a member is considered dead
pub const LIFESPAN_YEARS: u32 = 100;

/// Source of family identifiers, so ids never resolve in the wrong tree
static NEXT_FAMILY: AtomicU64 = AtomicU64::new(1);

// ============================================================================
// MEMBER ID
// ============================================================================

/// Handle of a member inside its `FamilyTree`.
///
/// Carries the identifier of the family that issued it; a handle from
/// another family is rejected even when its index is in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MemberId {
    family: u64,
    index: usize,
}

impl MemberId {
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} (family {})", self.index, self.family)
    }
}

// ============================================================================
// FAMILY MEMBER
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct FamilyMember {
    name: String,
    birth_date: NaiveDate,

    /// Non-owning back-reference (None for the family head)
    parent: Option<MemberId>,

    /// Sorted oldest first, ties broken by name
    children: Vec<MemberId>,

    assets: AssetCollection,
}

impl FamilyMember {
    fn new(name: &str, birth_date: NaiveDate, parent: Option<MemberId>) -> Self {
        FamilyMember {
            name: name.to_string(),
            birth_date,
            parent,
            children: Vec::new(),
            assets: AssetCollection::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    /// Dead once `LIFESPAN_YEARS` whole years have passed since birth.
    /// Nobody is dead before being born.
    pub fn is_dead(&self, when: NaiveDate) -> bool {
        when.years_since(self.birth_date)
            .map_or(false, |years| years >= LIFESPAN_YEARS)
    }
}

impl fmt::Display for FamilyMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.name, self.birth_date.format("%d/%m/%Y"))
    }
}

// ============================================================================
// FAMILY TREE
// ============================================================================

/// Arena holding a whole family. Members are never removed or re-parented.
#[derive(Debug, Clone, Serialize)]
pub struct FamilyTree {
    family: u64,
    members: Vec<FamilyMember>,
}

impl FamilyTree {
    /// Start a new family from its head
    pub fn born(name: &str, birth_date: NaiveDate) -> Self {
        debug!("{} born as family head on {}", name, birth_date);
        FamilyTree {
            family: NEXT_FAMILY.fetch_add(1, Ordering::Relaxed),
            members: vec![FamilyMember::new(name, birth_date, None)],
        }
    }

    fn id_at(&self, index: usize) -> MemberId {
        MemberId {
            family: self.family,
            index,
        }
    }

    /// Id of the root ancestor
    pub fn head(&self) -> MemberId {
        self.id_at(0)
    }

    /// Add a child to `parent`, keeping the children sorted
    pub fn give_birth(
        &mut self,
        parent: MemberId,
        name: &str,
        birth_date: NaiveDate,
    ) -> Result<MemberId> {
        let parent_member = self.member(parent)?;

        if !UniqueNameChecker::from_family_head(parent_member).check_is_unique(name) {
            return Err(HeritageError::NotUniqueName(name.to_string()));
        }

        let child = FamilyMember::new(name, birth_date, Some(parent));

        if parent_member.birth_date() > birth_date {
            return Err(HeritageError::InvalidBirthDate {
                parent: parent_member.to_string(),
                child: child.to_string(),
            });
        }

        let id = self.id_at(self.members.len());
        self.members.push(child);

        let mut children = std::mem::take(&mut self.members[parent.index].children);
        children.push(id);
        children.sort_by(|a, b| {
            let (a, b) = (&self.members[a.index], &self.members[b.index]);
            a.birth_date
                .cmp(&b.birth_date)
                .then_with(|| a.name.cmp(&b.name))
        });
        self.members[parent.index].children = children;

        debug!("{} born to {} on {}", name, self.members[parent.index].name, birth_date);
        Ok(id)
    }

    /// Same as `give_birth`, born today
    pub fn give_birth_today(&mut self, parent: MemberId, name: &str) -> Result<MemberId> {
        self.give_birth(parent, name, Local::now().date_naive())
    }

    pub fn add_asset(&mut self, id: MemberId, asset: Asset) -> Result<&mut Self> {
        let member = self.member_mut(id)?;
        member.assets.add(asset)?;
        debug!("{} now holds {}", member.name, member.assets.get(asset.kind()));
        Ok(self)
    }

    pub fn add_assets<I>(&mut self, id: MemberId, assets: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = Asset>,
    {
        for asset in assets {
            self.add_asset(id, asset)?;
        }
        Ok(self)
    }

    /// Read-only view of a member
    pub fn member(&self, id: MemberId) -> Result<MemberRef<'_>> {
        if self.contains(id) {
            Ok(MemberRef { tree: self, id })
        } else {
            Err(HeritageError::UnknownMember(id))
        }
    }

    fn member_mut(&mut self, id: MemberId) -> Result<&mut FamilyMember> {
        if !self.contains(id) {
            return Err(HeritageError::UnknownMember(id));
        }
        Ok(&mut self.members[id.index])
    }

    /// True when `id` was issued by this family
    pub fn contains(&self, id: MemberId) -> bool {
        id.family == self.family && id.index < self.members.len()
    }

    pub fn find_by_name(&self, name: &str) -> Option<MemberRef<'_>> {
        self.members
            .iter()
            .position(|m| m.name == name)
            .map(|index| MemberRef { tree: self, id: self.id_at(index) })
    }

    /// All members, in order of registration
    pub fn members(&self) -> impl Iterator<Item = MemberRef<'_>> {
        (0..self.members.len()).map(move |index| MemberRef {
            tree: self,
            id: self.id_at(index),
        })
    }

    /// Depth-first walk from the head, children oldest first.
    /// Yields (generation, member) with the head at generation 0.
    pub fn walk(&self) -> Vec<(usize, MemberRef<'_>)> {
        let mut visited = Vec::with_capacity(self.members.len());
        let mut stack = vec![(0, self.head())];

        while let Some((depth, id)) = stack.pop() {
            visited.push((depth, MemberRef { tree: self, id }));
            for child in self.members[id.index].children.iter().rev() {
                stack.push((depth + 1, *child));
            }
        }

        visited
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

// ============================================================================
// MEMBER VIEW
// ============================================================================

/// Borrowed view of one member, able to navigate the tree
#[derive(Clone, Copy)]
pub struct MemberRef<'a> {
    tree: &'a FamilyTree,
    id: MemberId,
}

impl<'a> MemberRef<'a> {
    fn data(&self) -> &'a FamilyMember {
        &self.tree.members[self.id.index]
    }

    fn at(&self, id: MemberId) -> MemberRef<'a> {
        MemberRef { tree: self.tree, id }
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.data().birth_date
    }

    pub fn parent(&self) -> Option<MemberRef<'a>> {
        self.data().parent.map(|id| self.at(id))
    }

    /// Children, oldest first
    pub fn children(&self) -> Vec<MemberRef<'a>> {
        self.data().children.iter().map(|id| self.at(*id)).collect()
    }

    pub fn has_children(&self) -> bool {
        !self.data().children.is_empty()
    }

    pub fn assets(&self) -> &'a AssetCollection {
        &self.data().assets
    }

    pub fn is_dead(&self, when: NaiveDate) -> bool {
        self.data().is_dead(when)
    }

    /// Index in the parent's sorted child list (None for the family head)
    pub fn position_among_siblings(&self) -> Option<usize> {
        let parent = self.data().parent?;
        self.tree.members[parent.index]
            .children
            .iter()
            .position(|id| *id == self.id)
    }

    /// Number of children of the parent, this member included
    pub fn sibling_count(&self) -> usize {
        match self.data().parent {
            Some(parent) => self.tree.members[parent.index].children.len(),
            None => 1,
        }
    }

    pub fn is_the_oldest_son(&self) -> bool {
        self.position_among_siblings() == Some(0)
    }

    /// Root ancestor reached by following parent links
    pub fn family_head(&self) -> MemberRef<'a> {
        let mut current = *self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Ancestor chain from the family head down to this member (inclusive)
    pub fn lineage(&self) -> Vec<MemberRef<'a>> {
        let mut chain = vec![*self];
        let mut current = *self;
        while let Some(parent) = current.parent() {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    /// Value inherited from ancestors under the given succession rules
    pub fn get_heritage<C>(&self, calculator: &C, when: NaiveDate) -> u64
    where
        C: HeritageCalculator + ?Sized,
    {
        calculator.heritage(*self, when)
    }

    /// Heritage plus own assets; nothing for the dead
    pub fn get_patrimony<C>(&self, calculator: &C, when: NaiveDate) -> u64
    where
        C: HeritageCalculator + ?Sized,
    {
        if self.is_dead(when) {
            return 0;
        }
        self.get_heritage(calculator, when)
            .saturating_add(self.assets().total_value())
    }
}

impl PartialEq for MemberRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for MemberRef<'_> {}

impl fmt::Debug for MemberRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}

impl fmt::Display for MemberRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.data(), f)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_family_head_is_born() {
        let tree = FamilyTree::born("Josep", date(1920, 2, 2));
        let josep = tree.member(tree.head()).unwrap();

        assert_eq!(josep.name(), "Josep");
        assert_eq!(josep.birth_date(), date(1920, 2, 2));
        assert!(josep.parent().is_none());
        assert!(josep.children().is_empty());
        assert!(!josep.has_children());
        assert!(!josep.is_the_oldest_son());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_display() {
        let tree = FamilyTree::born("Josep", date(1920, 2, 2));
        let josep = tree.member(tree.head()).unwrap();

        assert_eq!(josep.to_string(), "Josep, 02/02/1920");
    }

    #[test]
    fn test_give_birth() {
        let mut tree = FamilyTree::born("Josep", date(1920, 2, 2));
        let head = tree.head();
        let joan = tree.give_birth(head, "Joan", date(1950, 5, 5)).unwrap();

        let child = tree.member(joan).unwrap();
        let parent = tree.member(head).unwrap();
        assert_eq!(child.parent(), Some(parent));
        assert_eq!(child.name(), "Joan");
        assert_eq!(child.birth_date(), date(1950, 5, 5));
        assert!(parent.has_children());
        assert_eq!(parent.children(), vec![child]);
    }

    #[test]
    fn test_child_older_than_parent_rejected() {
        let mut tree = FamilyTree::born("Josep", date(1950, 1, 1));
        let head = tree.head();
        let result = tree.give_birth(head, "Joan", date(1949, 12, 31));

        assert_eq!(
            result,
            Err(HeritageError::InvalidBirthDate {
                parent: "Josep, 01/01/1950".to_string(),
                child: "Joan, 31/12/1949".to_string(),
            })
        );
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_same_birth_date_as_parent_allowed() {
        let mut tree = FamilyTree::born("Josep", date(1950, 1, 1));
        let head = tree.head();

        assert!(tree.give_birth(head, "Joan", date(1950, 1, 1)).is_ok());
    }

    #[test]
    fn test_repeated_names_anywhere_rejected() {
        let mut tree = FamilyTree::born("Josep", date(1920, 2, 2));
        let head = tree.head();
        let joan = tree.give_birth(head, "Joan", date(1950, 5, 5)).unwrap();
        let pere = tree.give_birth(head, "Pere", date(1952, 6, 6)).unwrap();
        tree.give_birth(joan, "Jordi", date(1980, 8, 8)).unwrap();

        // Cousin with the same name
        let result = tree.give_birth(pere, "Jordi", date(1981, 1, 1));
        assert_eq!(result, Err(HeritageError::NotUniqueName("Jordi".to_string())));

        // Grandchild named after the head
        let result = tree.give_birth(joan, "Josep", date(1982, 1, 1));
        assert_eq!(result, Err(HeritageError::NotUniqueName("Josep".to_string())));
    }

    #[test]
    fn test_children_are_sorted() {
        let mut tree = FamilyTree::born("Parent", date(1920, 1, 1));
        let head = tree.head();
        let second = tree.give_birth(head, "Second", date(1952, 1, 1)).unwrap();
        let third = tree.give_birth(head, "Third", date(1955, 1, 1)).unwrap();
        let first = tree.give_birth(head, "First", date(1950, 1, 1)).unwrap();

        let ids: Vec<MemberId> = tree.member(head).unwrap().children().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![first, second, third]);
        assert!(tree.member(first).unwrap().is_the_oldest_son());
        assert!(!tree.member(second).unwrap().is_the_oldest_son());

        // A newly born older sibling takes the first place
        let previous = tree.give_birth(head, "Previous", date(1945, 1, 1)).unwrap();
        let ids: Vec<MemberId> = tree.member(head).unwrap().children().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![previous, first, second, third]);
        assert!(tree.member(previous).unwrap().is_the_oldest_son());
        assert!(!tree.member(first).unwrap().is_the_oldest_son());
    }

    #[test]
    fn test_twins_sorted_by_name() {
        let mut tree = FamilyTree::born("Parent", date(1920, 1, 1));
        let head = tree.head();
        let bernat = tree.give_birth(head, "Bernat", date(1950, 1, 1)).unwrap();
        let arnau = tree.give_birth(head, "Arnau", date(1950, 1, 1)).unwrap();

        let parent = tree.member(head).unwrap();
        assert_eq!(parent.children()[0].id(), arnau);
        assert_eq!(parent.children()[1].id(), bernat);
        assert_eq!(tree.member(bernat).unwrap().position_among_siblings(), Some(1));
        assert_eq!(tree.member(bernat).unwrap().sibling_count(), 2);
    }

    #[test]
    fn test_they_die_at_100_years_old() {
        let tree = FamilyTree::born("Josep", date(1920, 2, 2));
        let josep = tree.member(tree.head()).unwrap();

        assert!(!josep.is_dead(date(2020, 2, 1)));
        assert!(josep.is_dead(date(2020, 2, 2)));
        assert!(josep.is_dead(date(2060, 1, 1)));
        assert!(!josep.is_dead(date(1900, 1, 1)));
    }

    #[test]
    fn test_assets_are_merged() {
        let mut tree = FamilyTree::born("Josep", date(1920, 2, 2));
        let head = tree.head();
        tree.add_asset(head, Asset::cash(100)).unwrap();
        tree.add_assets(head, [Asset::cash(50), Asset::land(10)]).unwrap();

        let assets = tree.member(head).unwrap().assets();
        assert_eq!(assets.get(AssetKind::Cash).units(), 150);
        assert_eq!(assets.get(AssetKind::Land).units(), 10);
    }

    #[test]
    fn test_unknown_member() {
        let mut tree = FamilyTree::born("Josep", date(1920, 2, 2));
        let mut other = FamilyTree::born("Other", date(1920, 2, 2));
        let stranger = other.give_birth(other.head(), "Stranger", date(1950, 1, 1)).unwrap();

        assert_eq!(
            tree.member(stranger).unwrap_err(),
            HeritageError::UnknownMember(stranger)
        );
        assert!(tree.add_asset(stranger, Asset::cash(1)).is_err());
        assert!(tree.give_birth(stranger, "Nobody", date(1990, 1, 1)).is_err());
    }

    #[test]
    fn test_member_from_another_family_rejected() {
        let mut mine = FamilyTree::born("Mine", date(1920, 2, 2));
        let my_kid = mine.give_birth(mine.head(), "MyKid", date(1950, 1, 1)).unwrap();
        let mut other = FamilyTree::born("Other", date(1920, 2, 2));
        let stranger = other.give_birth(other.head(), "Stranger", date(1950, 1, 1)).unwrap();

        // Same index, different family
        assert_eq!(stranger.index(), my_kid.index());
        assert!(!mine.contains(stranger));
        assert!(!mine.contains(other.head()));
        assert_eq!(
            mine.member(stranger).unwrap_err(),
            HeritageError::UnknownMember(stranger)
        );

        assert!(mine.add_asset(stranger, Asset::cash(1)).is_err());
        assert!(mine.give_birth(stranger, "Nobody", date(1990, 1, 1)).is_err());
        assert!(mine.member(my_kid).unwrap().assets().is_empty());
        assert!(!mine.member(my_kid).unwrap().has_children());
        assert_eq!(mine.len(), 2);

        // A copy of a family keeps accepting its own ids
        let copy = mine.clone();
        assert_eq!(copy.member(my_kid).unwrap().name(), "MyKid");
    }

    #[test]
    fn test_give_birth_today() {
        let mut tree = FamilyTree::born("Parent", date(1920, 1, 1));
        let head = tree.head();
        let older = tree.give_birth(head, "Older", date(2000, 1, 1)).unwrap();
        let newborn = tree.give_birth_today(head, "Newborn").unwrap();

        let today = Local::now().date_naive();
        let child = tree.member(newborn).unwrap();
        assert!(child.birth_date() >= today.pred_opt().unwrap());
        assert!(child.birth_date() <= today.succ_opt().unwrap());
        assert!(!child.is_dead(today));

        let ids: Vec<MemberId> = tree.member(head).unwrap().children().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![older, newborn]);
        assert!(tree.give_birth_today(head, "Older").is_err());
    }

    #[test]
    fn test_overflowing_asset_rejected() {
        let mut tree = FamilyTree::born("Josep", date(1920, 2, 2));
        let head = tree.head();
        tree.add_asset(head, Asset::real_estate(5)).unwrap();

        let result = tree.add_asset(head, Asset::real_estate(20_000_000_000_000));
        assert!(matches!(result, Err(HeritageError::AmountOverflow { .. })));
        assert_eq!(
            tree.member(head).unwrap().assets().get(AssetKind::RealEstate).units(),
            5
        );
    }

    #[test]
    fn test_lineage_and_family_head() {
        let mut tree = FamilyTree::born("A", date(1920, 1, 1));
        let b = tree.give_birth(tree.head(), "B", date(1950, 1, 1)).unwrap();
        let c = tree.give_birth(b, "C", date(1980, 1, 1)).unwrap();

        let member = tree.member(c).unwrap();
        let names: Vec<&str> = member.lineage().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(member.family_head().id(), tree.head());
    }

    #[test]
    fn test_walk_and_find() {
        let mut tree = FamilyTree::born("A", date(1920, 1, 1));
        let head = tree.head();
        let c = tree.give_birth(head, "C", date(1955, 1, 1)).unwrap();
        let b = tree.give_birth(head, "B", date(1950, 1, 1)).unwrap();
        tree.give_birth(b, "D", date(1980, 1, 1)).unwrap();
        tree.give_birth(c, "E", date(1985, 1, 1)).unwrap();

        let walked: Vec<(usize, &str)> = tree.walk().iter().map(|(d, m)| (*d, m.name())).collect();
        assert_eq!(walked, vec![(0, "A"), (1, "B"), (2, "D"), (1, "C"), (2, "E")]);

        assert_eq!(tree.find_by_name("E").map(|m| m.birth_date()), Some(date(1985, 1, 1)));
        assert!(tree.find_by_name("Z").is_none());
        assert_eq!(tree.members().count(), 5);
    }
}
