//! Parent -> children index over a flat slice of location records.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, instrument};

use crate::domain::entities::{LocationRecord, ReferenceParser};

/// Adjacency index built once per snapshot of records.
///
/// Children are stored as positions into the borrowed slice, in input order,
/// so sibling order always follows the order the records were supplied in.
#[derive(Debug)]
pub struct LocationIndex<'a> {
    records: &'a [LocationRecord],
    by_id: HashMap<&'a str, usize>,
    children: HashMap<&'a str, Vec<usize>>,
    parents: Vec<Option<&'a str>>,
}

impl<'a> LocationIndex<'a> {
    /// Index using the default `Location/<id>` reference form.
    pub fn new(records: &'a [LocationRecord]) -> Self {
        Self::with_parser(records, &ReferenceParser::default())
    }

    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn with_parser(records: &'a [LocationRecord], parser: &ReferenceParser) -> Self {
        let mut by_id = HashMap::with_capacity(records.len());
        let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut parents = Vec::with_capacity(records.len());

        for (pos, record) in records.iter().enumerate() {
            // first occurrence wins for duplicate ids
            by_id.entry(record.id.as_str()).or_insert(pos);

            let parent = parser.parent_of(record);
            if let Some(parent_id) = parent {
                children.entry(parent_id).or_default().push(pos);
            }
            parents.push(parent);
        }
        debug!("indexed {} records under {} parents", records.len(), children.len());

        Self {
            records,
            by_id,
            children,
            parents,
        }
    }

    pub fn records(&self) -> &'a [LocationRecord] {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&'a LocationRecord> {
        self.by_id.get(id).map(|&pos| &self.records[pos])
    }

    /// Parent id as written in the record's reference, resolvable or not.
    pub fn parent_id(&self, id: &str) -> Option<&'a str> {
        self.by_id.get(id).and_then(|&pos| self.parents[pos])
    }

    pub fn parent_of(&self, id: &str) -> Option<&'a LocationRecord> {
        self.parent_id(id).and_then(|parent| self.get(parent))
    }

    /// Direct children in input order.
    pub fn children_of(&self, id: &str) -> impl Iterator<Item = &'a LocationRecord> + '_ {
        let records = self.records;
        self.children
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&pos| &records[pos])
    }

    /// All descendants of `root` in level order, excluding `root` itself.
    ///
    /// An unknown root yields nothing. Each id is visited at most once, so
    /// cyclic input terminates and never yields the root.
    #[instrument(level = "debug", skip(self))]
    pub fn descendants(&self, root: &str) -> Vec<&'a LocationRecord> {
        let mut result = Vec::new();
        if !self.contains(root) {
            debug!("root {} not among records", root);
            return result;
        }

        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(root);
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(root);

        while let Some(current) = queue.pop_front() {
            for child in self.children_of(current) {
                let child_id = child.id.as_str();
                if !visited.insert(child_id) {
                    debug!("skipping already visited location {}", child_id);
                    continue;
                }
                result.push(child);
                queue.push_back(child_id);
            }
        }

        debug!("found {} descendants of {}", result.len(), root);
        result
    }

    /// Parent, grandparent, ... of `id`, nearest first.
    #[instrument(level = "debug", skip(self))]
    pub fn ancestors(&self, id: &str) -> Vec<&'a LocationRecord> {
        let mut result = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(id);

        let mut current = id;
        while let Some(parent) = self.parent_of(current) {
            let parent_id = parent.id.as_str();
            if !visited.insert(parent_id) {
                debug!("ancestor chain of {} loops at {}", id, parent_id);
                break;
            }
            result.push(parent);
            current = parent_id;
        }
        result
    }

    /// Records whose parent is absent, malformed or not among the records.
    pub fn roots(&self) -> Vec<&'a LocationRecord> {
        self.records
            .iter()
            .enumerate()
            .filter(|(pos, _)| self.parents[*pos].map_or(true, |p| !self.contains(p)))
            .map(|(_, record)| record)
            .collect()
    }

    /// Descendants of `root` without children of their own.
    pub fn leaves(&self, root: &str) -> Vec<&'a LocationRecord> {
        self.descendants(root)
            .into_iter()
            .filter(|r| self.children_of(r.id.as_str()).next().is_none())
            .collect()
    }
}

/// Returns every descendant of `root` among `locations`, in level order.
///
/// Children come before grandchildren and siblings keep the order they
/// have in `locations`. The root itself is never part of the result; an
/// unknown root, or a root without children, yields an empty list.
/// Malformed `partOf` references are treated as "no parent".
pub fn resolve_location_children(root: &str, locations: &[LocationRecord]) -> Vec<LocationRecord> {
    LocationIndex::new(locations)
        .descendants(root)
        .into_iter()
        .cloned()
        .collect()
}
