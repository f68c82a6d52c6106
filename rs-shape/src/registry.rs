use std::collections::HashMap;

use bevy_ecs::prelude::Resource;
use bevy_math::IVec3;
use rs_utils::BlockState;
use tracing::debug;

use crate::condition::NeighborLookup;
use crate::error::{Result, ShapeError};
use crate::group::{GroupId, GroupTable};
use crate::model::{Model, ModelKind, ModelView};
use crate::unit_box::UnitBox;

/// Build-phase registry. Groups and models are mutable here; call
/// [`ShapeRegistry::finish`] before any world query.
#[derive(Debug, Default)]
pub struct ShapeRegistry {
    groups: GroupTable,
    models: HashMap<(BlockState, ModelKind), Model>,
    inventory: HashMap<BlockState, Vec<UnitBox>>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(&mut self, name: &str) -> GroupId {
        self.groups.group(name)
    }

    pub fn add_to_group(&mut self, group: GroupId, state: BlockState) -> Result<()> {
        if self.groups.get(group).is_none() {
            return Err(unknown_group(group));
        }
        self.groups.add(group, state);
        Ok(())
    }

    pub fn groups(&self) -> &GroupTable {
        &self.groups
    }

    /// Rejects models whose conditions point at groups this registry never
    /// created. A rejected model leaves the registry unchanged.
    pub fn publish_model(&mut self, state: BlockState, kind: ModelKind, model: Model) -> Result<()> {
        self.check_model(&model)?;
        debug!(%state, ?kind, entries = model.len(), "published model");
        self.models.insert((state, kind), model);
        Ok(())
    }

    pub fn check_model(&self, model: &Model) -> Result<()> {
        for entry in model.entries() {
            let Some(condition) = &entry.condition else {
                continue;
            };
            if let Some(missing) = condition
                .groups()
                .into_iter()
                .find(|group| self.groups.get(*group).is_none())
            {
                return Err(unknown_group(missing));
            }
        }
        Ok(())
    }

    pub fn register_block_variant(&mut self, state: BlockState, inventory: Vec<UnitBox>) {
        debug!(%state, boxes = inventory.len(), "registered inventory model");
        self.inventory.insert(state, inventory);
    }

    pub fn model(&self, kind: ModelKind, state: BlockState) -> Option<&Model> {
        self.models.get(&(state, kind))
    }

    pub fn finish(self) -> ShapeCatalog {
        ShapeCatalog {
            groups: self.groups,
            models: self.models,
            inventory: self.inventory,
        }
    }
}

/// Query-phase view of everything registered. Immutable, so render and
/// collision passes can share it freely.
#[derive(Debug, Default, Resource)]
pub struct ShapeCatalog {
    groups: GroupTable,
    models: HashMap<(BlockState, ModelKind), Model>,
    inventory: HashMap<BlockState, Vec<UnitBox>>,
}

impl ShapeCatalog {
    pub fn model(&self, kind: ModelKind, state: BlockState) -> Option<ModelView<'_>> {
        self.models
            .get(&(state, kind))
            .map(|model| ModelView::new(model, &self.groups))
    }

    pub fn has_model(&self, kind: ModelKind, state: BlockState) -> bool {
        self.models.contains_key(&(state, kind))
    }

    /// Boxes of `state` at `pos`, or `None` if no model was published for it.
    pub fn resolve(
        &self,
        kind: ModelKind,
        state: BlockState,
        pos: IVec3,
        lookup: &impl NeighborLookup,
    ) -> Option<Vec<UnitBox>> {
        self.model(kind, state).map(|view| view.resolve(pos, lookup))
    }

    pub fn groups(&self) -> &GroupTable {
        &self.groups
    }

    pub fn inventory_model(&self, state: BlockState) -> Option<&[UnitBox]> {
        self.inventory.get(&state).map(Vec::as_slice)
    }

    /// Published models sorted by state, then kind.
    pub fn models(&self) -> Vec<(BlockState, ModelKind, &Model)> {
        let mut out: Vec<_> = self
            .models
            .iter()
            .map(|((state, kind), model)| (*state, *kind, model))
            .collect();
        out.sort_by_key(|(state, kind, _)| (*state, *kind));
        out
    }
}

fn unknown_group(group: GroupId) -> ShapeError {
    ShapeError::Configuration(format!("condition refers to unregistered group {}", group.0))
}
