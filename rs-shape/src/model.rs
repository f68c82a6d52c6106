use std::sync::Arc;

use bevy_math::IVec3;
use serde::Serialize;

use crate::condition::{Condition, NeighborLookup};
use crate::group::GroupTable;
use crate::unit_box::UnitBox;

/// Which pipeline a published model feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Render,
    /// Also used for ray casting.
    Collision,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::Render, ModelKind::Collision];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeometryEntry {
    pub shape: UnitBox,
    pub condition: Option<Arc<Condition>>,
}

impl GeometryEntry {
    pub fn always(shape: UnitBox) -> Self {
        Self {
            shape,
            condition: None,
        }
    }

    pub fn when(shape: UnitBox, condition: Arc<Condition>) -> Self {
        Self {
            shape,
            condition: Some(condition),
        }
    }

    pub fn is_present(&self, groups: &GroupTable, pos: IVec3, lookup: &impl NeighborLookup) -> bool {
        self.condition
            .as_ref()
            .is_none_or(|condition| condition.evaluate(groups, pos, lookup))
    }
}

/// Ordered list of conditioned boxes for one block variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Model {
    entries: Vec<GeometryEntry>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: GeometryEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    pub fn entries(&self) -> &[GeometryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolve(&self, groups: &GroupTable, pos: IVec3, lookup: &impl NeighborLookup) -> Vec<UnitBox> {
        let mut out = Vec::with_capacity(self.entries.len());
        self.resolve_into(groups, pos, lookup, &mut out);
        out
    }

    /// Appends the boxes present at `pos` to `out`, keeping entry order.
    pub fn resolve_into(
        &self,
        groups: &GroupTable,
        pos: IVec3,
        lookup: &impl NeighborLookup,
        out: &mut Vec<UnitBox>,
    ) {
        out.extend(
            self.entries
                .iter()
                .filter(|entry| entry.is_present(groups, pos, lookup))
                .map(|entry| entry.shape),
        );
    }
}

impl FromIterator<GeometryEntry> for Model {
    fn from_iter<T: IntoIterator<Item = GeometryEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A published model paired with the frozen groups it refers to.
#[derive(Clone, Copy)]
pub struct ModelView<'a> {
    model: &'a Model,
    groups: &'a GroupTable,
}

impl<'a> ModelView<'a> {
    pub(crate) fn new(model: &'a Model, groups: &'a GroupTable) -> Self {
        Self { model, groups }
    }

    pub fn model(&self) -> &'a Model {
        self.model
    }

    pub fn resolve(&self, pos: IVec3, lookup: &impl NeighborLookup) -> Vec<UnitBox> {
        self.model.resolve(self.groups, pos, lookup)
    }

    pub fn resolve_into(&self, pos: IVec3, lookup: &impl NeighborLookup, out: &mut Vec<UnitBox>) {
        self.model.resolve_into(self.groups, pos, lookup, out)
    }
}
