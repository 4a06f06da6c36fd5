//! Containment forest built from owners and `contained-in` relations.

use std::collections::HashMap;

use astrolabe_core::identifier::Id;

/// Parent and child links between elements.
///
/// Every element has at most one parent. Children are kept in the order
/// their containment was assigned, which follows declaration order.
#[derive(Debug, Default)]
pub(crate) struct Hierarchy {
    parent: HashMap<Id, Id>,
    children: HashMap<Id, Vec<Id>>,
}

impl Hierarchy {
    pub(crate) fn parent(&self, id: Id) -> Option<Id> {
        self.parent.get(&id).copied()
    }

    pub(crate) fn children(&self, id: Id) -> &[Id] {
        self.children.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Places `child` in `parent` unless it already has one.
    ///
    /// Returns the parent already assigned when it differs from `parent`.
    pub(crate) fn assign(&mut self, child: Id, parent: Id) -> Result<(), Id> {
        match self.parent.get(&child) {
            Some(existing) if *existing == parent => Ok(()),
            Some(existing) => Err(*existing),
            None => {
                self.parent.insert(child, parent);
                self.children.entry(parent).or_default().push(child);
                Ok(())
            }
        }
    }

    /// Finds the first containment cycle, walking from `roots` in order.
    ///
    /// The cycle is returned closed, i.e. starting and ending with the same
    /// id: `[a, b, a]`.
    pub(crate) fn find_cycle(&self, roots: impl IntoIterator<Item = Id>) -> Option<Vec<Id>> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            OnPath,
            Done,
        }

        let mut marks: HashMap<Id, Mark> = HashMap::new();

        for root in roots {
            let mut path = Vec::new();
            let mut current = Some(root);

            while let Some(id) = current {
                match marks.get(&id) {
                    Some(Mark::Done) => break,
                    Some(Mark::OnPath) => {
                        let start = path.iter().position(|p| *p == id).unwrap_or(0);
                        let mut cycle = path[start..].to_vec();
                        cycle.push(id);
                        return Some(cycle);
                    }
                    None => {
                        marks.insert(id, Mark::OnPath);
                        path.push(id);
                        current = self.parent(id);
                    }
                }
            }

            for id in path {
                marks.insert(id, Mark::Done);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<Id> {
        names.iter().map(|n| Id::new(n)).collect()
    }

    #[test]
    fn test_assign_keeps_first_parent() {
        let mut hierarchy = Hierarchy::default();
        let [child, first, second] = [Id::new("c"), Id::new("p1"), Id::new("p2")];

        assert_eq!(hierarchy.assign(child, first), Ok(()));
        assert_eq!(hierarchy.assign(child, first), Ok(()));
        assert_eq!(hierarchy.assign(child, second), Err(first));

        assert_eq!(hierarchy.parent(child), Some(first));
        assert_eq!(hierarchy.children(first), [child]);
        assert!(hierarchy.children(second).is_empty());
    }

    #[test]
    fn test_no_cycle_in_chain() {
        let mut hierarchy = Hierarchy::default();
        hierarchy.assign(Id::new("c"), Id::new("b")).unwrap();
        hierarchy.assign(Id::new("b"), Id::new("a")).unwrap();

        assert_eq!(hierarchy.find_cycle(ids(&["a", "b", "c"])), None);
    }

    #[test]
    fn test_cycle_is_reported_closed() {
        let mut hierarchy = Hierarchy::default();
        hierarchy.assign(Id::new("x"), Id::new("y")).unwrap();
        hierarchy.assign(Id::new("y"), Id::new("z")).unwrap();
        hierarchy.assign(Id::new("z"), Id::new("x")).unwrap();

        let cycle = hierarchy.find_cycle(ids(&["x", "y", "z"])).unwrap();
        assert_eq!(cycle, ids(&["x", "y", "z", "x"]));
    }

    #[test]
    fn test_cycle_reached_through_tail() {
        let mut hierarchy = Hierarchy::default();
        hierarchy.assign(Id::new("leaf"), Id::new("m")).unwrap();
        hierarchy.assign(Id::new("m"), Id::new("n")).unwrap();
        hierarchy.assign(Id::new("n"), Id::new("m")).unwrap();

        let cycle = hierarchy.find_cycle(ids(&["leaf", "m", "n"])).unwrap();
        assert_eq!(cycle, ids(&["m", "n", "m"]));
    }
}
