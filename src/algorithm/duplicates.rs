use crate::model::{Record, TraitAssignment};
use std::collections::{HashMap, HashSet};

/// Records sharing one trait assignment, anchor first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup<'a> {
    /// First record carrying the assignment
    pub anchor: &'a Record,
    /// Later records with the same assignment, in input order
    pub matches: Vec<&'a Record>,
}

impl<'a> DuplicateGroup<'a> {
    /// Shared assignment of every member
    pub const fn assignment(&self) -> &'a TraitAssignment {
        &self.anchor.assignment
    }

    /// Every member in report order: the anchor, then the matches
    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        std::iter::once(self.anchor).chain(self.matches.iter().copied())
    }

    /// Identifiers of every member in report order
    pub fn files(&self) -> Vec<&'a str> {
        self.records().map(|r| r.file.as_str()).collect()
    }

    /// Number of members, anchor included
    pub fn len(&self) -> usize {
        self.matches.len() + 1
    }

    /// Groups always hold at least the anchor
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// Outcome of a duplicate scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateReport<'a> {
    /// Groups in order of their anchor's position
    pub groups: Vec<DuplicateGroup<'a>>,
    /// Number of distinct assignments that occur more than once
    pub images_with_duplicates: usize,
    /// Number of extra copies beyond each anchor, i.e. records needing new traits
    pub images_requiring_reassignment: usize,
}

impl<'a> DuplicateReport<'a> {
    fn from_groups(groups: Vec<DuplicateGroup<'a>>) -> Self {
        let images_requiring_reassignment = groups.iter().map(|g| g.matches.len()).sum();
        Self {
            images_with_duplicates: groups.len(),
            images_requiring_reassignment,
            groups,
        }
    }

    /// True when no assignment is repeated
    pub fn is_clean(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Group records whose trait assignments are identical
///
/// Builds equivalence classes keyed by assignment in first-occurrence order,
/// so every record lands in at most one group, groups are ordered by anchor
/// position and members by input position. The result is identical to
/// [`find_duplicates_pairwise`].
pub fn find_duplicates(records: &[Record]) -> DuplicateReport<'_> {
    let mut class_of: HashMap<&TraitAssignment, usize> = HashMap::with_capacity(records.len());
    let mut classes: Vec<DuplicateGroup<'_>> = Vec::new();

    for record in records {
        if let Some(&class) = class_of.get(&record.assignment) {
            if let Some(group) = classes.get_mut(class) {
                group.matches.push(record);
            }
        } else {
            class_of.insert(&record.assignment, classes.len());
            classes.push(DuplicateGroup {
                anchor: record,
                matches: Vec::new(),
            });
        }
    }

    classes.retain(|group| !group.matches.is_empty());
    DuplicateReport::from_groups(classes)
}

/// Reference quadratic scan comparing each unreported record with every later one
///
/// Kept as the baseline [`find_duplicates`] is checked against.
pub fn find_duplicates_pairwise(records: &[Record]) -> DuplicateReport<'_> {
    let mut reported: HashSet<&TraitAssignment> = HashSet::new();
    let mut groups = Vec::new();

    for (x, anchor) in records.iter().enumerate() {
        // Later copies were already folded into the anchor's group
        if reported.contains(&anchor.assignment) {
            continue;
        }

        let matches: Vec<&Record> = records
            .iter()
            .skip(x + 1)
            .filter(|other| other.assignment == anchor.assignment)
            .collect();

        if !matches.is_empty() {
            reported.insert(&anchor.assignment);
            groups.push(DuplicateGroup { anchor, matches });
        }
    }

    DuplicateReport::from_groups(groups)
}
