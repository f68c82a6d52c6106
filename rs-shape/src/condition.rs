use bevy_math::IVec3;
use rs_utils::BlockState;
use serde::Serialize;

use crate::error::{Result, ShapeError};
use crate::group::{GroupId, GroupTable};

/// Read access to live world state.
///
/// `None` means the position cannot be resolved right now (chunk not loaded,
/// outside the world). Implementations must not block.
pub trait NeighborLookup {
    fn block_state(&self, pos: IVec3) -> Option<BlockState>;
}

impl<F> NeighborLookup for F
where
    F: Fn(IVec3) -> Option<BlockState>,
{
    fn block_state(&self, pos: IVec3) -> Option<BlockState> {
        self(pos)
    }
}

/// Visibility predicate attached to a geometry entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// "The face neighbor at `offset` is (not, if `negate`) in `group`."
    Block {
        offset: IVec3,
        group: GroupId,
        negate: bool,
    },
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    /// Leaf predicate. `offset` must point at one of the six face neighbors.
    pub fn block(offset: IVec3, group: GroupId, negate: bool) -> Result<Self> {
        let nonzero = offset.to_array().iter().filter(|c| **c != 0).count();
        if nonzero != 1 || offset.abs().max_element() != 1 {
            return Err(ShapeError::Configuration(format!(
                "condition offset {offset} is not a face neighbor"
            )));
        }
        Ok(Self::Block {
            offset,
            group,
            negate,
        })
    }

    pub fn and(children: impl IntoIterator<Item = Condition>) -> Self {
        Self::And(children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = Condition>) -> Self {
        Self::Or(children.into_iter().collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(child: Condition) -> Self {
        Self::Not(Box::new(child))
    }

    /// Evaluates the tree for the block at `origin`.
    ///
    /// A leaf whose neighbor does not resolve is `false` whatever its
    /// `negate` flag says.
    pub fn evaluate(&self, groups: &GroupTable, origin: IVec3, lookup: &impl NeighborLookup) -> bool {
        match self {
            Self::Block {
                offset,
                group,
                negate,
            } => match lookup.block_state(origin + *offset) {
                Some(state) => groups.contains(*group, state) != *negate,
                None => false,
            },
            Self::And(children) => children
                .iter()
                .all(|child| child.evaluate(groups, origin, lookup)),
            Self::Or(children) => children
                .iter()
                .any(|child| child.evaluate(groups, origin, lookup)),
            Self::Not(child) => !child.evaluate(groups, origin, lookup),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Block { .. } => 1,
            Self::And(children) | Self::Or(children) => {
                children.iter().map(Condition::leaf_count).sum()
            }
            Self::Not(child) => child.leaf_count(),
        }
    }

    /// Every group the tree refers to, in visiting order.
    pub fn groups(&self) -> Vec<GroupId> {
        let mut out = Vec::new();
        self.collect_groups(&mut out);
        out
    }

    fn collect_groups(&self, out: &mut Vec<GroupId>) {
        match self {
            Self::Block { group, .. } => out.push(*group),
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_groups(out);
                }
            }
            Self::Not(child) => child.collect_groups(out),
        }
    }
}
