// 🏷️ Name Uniqueness - No two members of a family share a name
//
// The check is a plain structural query: walk up to the family head, then
// search its whole subtree. No registry, no global state.

use crate::family::MemberRef;

pub struct UniqueNameChecker<'a> {
    member: MemberRef<'a>,
}

impl<'a> UniqueNameChecker<'a> {
    /// Checker over the subtree rooted at `member`
    pub fn new(member: MemberRef<'a>) -> Self {
        UniqueNameChecker { member }
    }

    /// Checker over the whole family `member` belongs to
    pub fn from_family_head(member: MemberRef<'a>) -> Self {
        UniqueNameChecker::new(member.family_head())
    }

    /// Member the search starts from
    pub fn root(&self) -> MemberRef<'a> {
        self.member
    }

    /// True when nobody in the subtree is called `name`
    pub fn check_is_unique(&self, name: &str) -> bool {
        let mut pending = vec![self.member];

        while let Some(member) = pending.pop() {
            if member.name() == name {
                return false;
            }
            pending.extend(member.children());
        }

        true
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::{FamilyTree, MemberId};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Three family nuclei under one grandparent.
    /// Returns the tree and the parent of the first nucleus.
    fn create_test_family() -> (FamilyTree, MemberId) {
        let mut tree = FamilyTree::born("Josep", date(1920, 2, 2));
        let head = tree.head();

        let joan = tree.give_birth(head, "Joan", date(1950, 5, 5)).unwrap();
        tree.give_birth(joan, "Jordi", date(1980, 8, 8)).unwrap();
        tree.give_birth(joan, "Paula", date(1981, 9, 9)).unwrap();
        tree.give_birth(joan, "Maria", date(1982, 10, 10)).unwrap();

        let pere = tree.give_birth(head, "Pere", date(1952, 6, 6)).unwrap();
        tree.give_birth(pere, "Miquel", date(1980, 3, 3)).unwrap();
        tree.give_birth(pere, "Ferran", date(1981, 4, 4)).unwrap();

        let francesc = tree.give_birth(head, "Francesc", date(1953, 7, 7)).unwrap();
        tree.give_birth(francesc, "Adrià", date(1980, 5, 5)).unwrap();

        (tree, joan)
    }

    #[test]
    fn test_detects_repeated_names_in_family_nucleus() {
        let (tree, joan) = create_test_family();
        let checker = UniqueNameChecker::new(tree.member(joan).unwrap());

        for name in ["Joan", "Jordi", "Paula", "Maria"] {
            assert!(!checker.check_is_unique(name), "{} should be taken", name);
        }

        // Relatives outside the nucleus are invisible from here
        for name in ["Josep", "Pere", "Miquel", "Ferran", "Francesc", "Adrià"] {
            assert!(checker.check_is_unique(name), "{} should be free", name);
        }

        assert!(checker.check_is_unique("Antoni"));
        assert!(checker.check_is_unique("Carla"));
    }

    #[test]
    fn test_detects_repeated_names_in_whole_family() {
        let (tree, joan) = create_test_family();
        let checker = UniqueNameChecker::from_family_head(tree.member(joan).unwrap());

        assert_eq!(checker.root().id(), tree.head());

        for name in [
            "Josep", "Joan", "Jordi", "Paula", "Maria", "Pere", "Miquel", "Ferran", "Francesc",
            "Adrià",
        ] {
            assert!(!checker.check_is_unique(name), "{} should be taken", name);
        }

        assert!(checker.check_is_unique("Antoni"));
        assert!(checker.check_is_unique("Carla"));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let (tree, _) = create_test_family();
        let checker = UniqueNameChecker::from_family_head(tree.member(tree.head()).unwrap());

        assert!(checker.check_is_unique("josep"));
        assert!(!checker.check_is_unique("Josep"));
    }
}
