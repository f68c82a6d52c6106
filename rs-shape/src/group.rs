use std::collections::{HashMap, HashSet};

use rs_utils::BlockState;
use serde::Serialize;
use tracing::debug;

/// Dense handle for a group inside a [`GroupTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupId(pub u32);

/// A named set of block states, e.g. "every stair facing east".
#[derive(Debug, Clone, Default)]
pub struct Group {
    name: String,
    members: HashSet<BlockState>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: HashSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `false` if the state was already a member.
    pub fn add(&mut self, state: BlockState) -> bool {
        self.members.insert(state)
    }

    pub fn contains(&self, state: BlockState) -> bool {
        self.members.contains(&state)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in ascending order.
    pub fn members(&self) -> Vec<BlockState> {
        let mut out: Vec<_> = self.members.iter().copied().collect();
        out.sort();
        out
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupTable {
    groups: Vec<Group>,
    by_name: HashMap<String, GroupId>,
}

impl GroupTable {
    /// Fetches the group called `name`, creating it on first use.
    pub fn group(&mut self, name: &str) -> GroupId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let id = GroupId(self.groups.len() as u32);
        self.groups.push(Group::new(name));
        self.by_name.insert(name.to_string(), id);
        debug!(group = name, id = id.0, "created group");
        id
    }

    pub fn find(&self, name: &str) -> Option<GroupId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.0 as usize)
    }

    pub fn add(&mut self, id: GroupId, state: BlockState) -> bool {
        self.groups
            .get_mut(id.0 as usize)
            .is_some_and(|group| group.add(state))
    }

    /// Unknown ids hold no members.
    pub fn contains(&self, id: GroupId, state: BlockState) -> bool {
        self.get(id).is_some_and(|group| group.contains(state))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &Group)> {
        self.groups
            .iter()
            .enumerate()
            .map(|(index, group)| (GroupId(index as u32), group))
    }
}
