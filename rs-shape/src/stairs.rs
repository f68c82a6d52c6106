//! Stair shapes whose upper step follows neighboring stairs.
//!
//! A stair is a slab plus four upper quarter blocks ("wings"). The two wings
//! at the back form the usual step; each of them disappears when the stair
//! behind turns into an outer corner. The two front wings only show up for an
//! inner corner, when the stair in front is turned sideways.
//!
//! Data values: bits `0..=1` pick one of four facings, bit 2 puts the stair
//! upside down.

use std::sync::Arc;

use bevy_math::IVec3;
use rs_utils::{BlockState, MAX_BLOCK_ID};
use tracing::{debug, info};

use crate::condition::Condition;
use crate::error::{Result, ShapeError};
use crate::group::GroupId;
use crate::model::{GeometryEntry, Model, ModelKind};
use crate::registry::ShapeRegistry;
use crate::template::StairTemplate;
use crate::unit_box::{Rotation, UnitBox};

pub const DEFAULT_GROUP_PREFIX: &str = "stairs";
pub const TEMPLATE_BOXES: usize = 5;
pub const UPPER_HALF: u8 = 4;
pub const STAIR_VARIANTS: u8 = 8;

/// Neighbor layout for one facing, relative to the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StairFacing {
    /// Quarter turns applied to the template.
    pub rotation: u8,
    pub right: IVec3,
    pub back: IVec3,
    /// Facing of a stair that turns the back edge into an outer corner on the
    /// right side.
    pub right_data: u8,
}

impl StairFacing {
    pub fn left(&self) -> IVec3 {
        -self.right
    }

    pub fn front(&self) -> IVec3 {
        -self.back
    }

    /// Facing row for `data & 3`. Values above 7 are not stair data.
    pub fn for_data(data: u8) -> Result<Self> {
        if data >= STAIR_VARIANTS {
            return Err(ShapeError::Configuration(format!(
                "stair data {data} is outside 0..8"
            )));
        }
        Ok(STAIR_FACINGS[(data & 3) as usize])
    }
}

pub const STAIR_FACINGS: [StairFacing; 4] = [
    StairFacing {
        rotation: 0,
        right: IVec3::new(-1, 0, 0),
        back: IVec3::new(0, 0, 1),
        right_data: 3,
    },
    StairFacing {
        rotation: 2,
        right: IVec3::new(1, 0, 0),
        back: IVec3::new(0, 0, -1),
        right_data: 2,
    },
    StairFacing {
        rotation: 3,
        right: IVec3::new(0, 0, 1),
        back: IVec3::new(1, 0, 0),
        right_data: 0,
    },
    StairFacing {
        rotation: 1,
        right: IVec3::new(0, 0, -1),
        back: IVec3::new(-1, 0, 0),
        right_data: 1,
    },
];

pub const STANDARD_TEMPLATE: [UnitBox; TEMPLATE_BOXES] = [
    UnitBox::texels([0, 0, 0], [16, 8, 16]),
    UnitBox::texels([8, 8, 8], [16, 16, 16]),
    UnitBox::texels([0, 8, 8], [8, 16, 16]),
    UnitBox::texels([8, 8, 0], [16, 16, 8]),
    UnitBox::texels([0, 8, 0], [8, 16, 8]),
];

/// Shape shown in hands and inventory slots.
pub const INVENTORY_SHAPE: [UnitBox; 2] = [
    UnitBox::texels([0, 0, 0], [16, 8, 16]),
    UnitBox::texels([0, 8, 0], [16, 16, 8]),
];

/// Turns a five-box template into the eight conditioned stair models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StairModelBuilder {
    template: [UnitBox; TEMPLATE_BOXES],
    group_prefix: String,
}

impl Default for StairModelBuilder {
    fn default() -> Self {
        Self {
            template: STANDARD_TEMPLATE,
            group_prefix: DEFAULT_GROUP_PREFIX.to_string(),
        }
    }
}

impl StairModelBuilder {
    /// `boxes[0]` is the slab, `boxes[1..5]` the wings, all for data 0.
    pub fn new(boxes: &[UnitBox]) -> Result<Self> {
        let template: [UnitBox; TEMPLATE_BOXES] = boxes.try_into().map_err(|_| {
            ShapeError::Configuration(format!(
                "stair template needs {TEMPLATE_BOXES} boxes, got {}",
                boxes.len()
            ))
        })?;
        Ok(Self {
            template,
            group_prefix: DEFAULT_GROUP_PREFIX.to_string(),
        })
    }

    pub fn from_template(template: &StairTemplate) -> Result<Self> {
        Ok(Self::new(&template.boxes)?.with_group_prefix(&template.group_prefix))
    }

    pub fn with_group_prefix(mut self, prefix: &str) -> Self {
        self.group_prefix = prefix.to_string();
        self
    }

    pub fn template(&self) -> &[UnitBox; TEMPLATE_BOXES] {
        &self.template
    }

    pub fn group_name(&self, data: u8) -> String {
        format!("{}:{}", self.group_prefix, data)
    }

    /// Builds and publishes render and collision models for all eight data
    /// values of `block_id`. Nothing is published unless every variant
    /// builds.
    pub fn build(&self, registry: &mut ShapeRegistry, block_id: u16) -> Result<()> {
        let mut staged = Vec::with_capacity(STAIR_VARIANTS as usize);
        for data in 0..STAIR_VARIANTS {
            let model = self.build_variant(registry, block_id, data)?;
            registry.check_model(&model)?;
            staged.push((BlockState::new(block_id, data), model));
        }

        for (state, model) in staged {
            for kind in ModelKind::ALL {
                registry.publish_model(state, kind, model.clone())?;
            }
        }
        info!(block_id, prefix = %self.group_prefix, "built stair models");
        Ok(())
    }

    /// Builds the model for one data value and registers `(block_id, data)`
    /// in its own facing group. Does not publish.
    pub fn build_variant(&self, registry: &mut ShapeRegistry, block_id: u16, data: u8) -> Result<Model> {
        if block_id > MAX_BLOCK_ID {
            return Err(ShapeError::Configuration(format!(
                "block id {block_id} does not fit a packed block state (max {MAX_BLOCK_ID})"
            )));
        }
        let facing = StairFacing::for_data(data)?;
        let rotation = Rotation::new(facing.rotation)?;
        let base = data & UPPER_HALF;

        let own = registry.group(&self.group_name(data));
        let right_group = registry.group(&self.group_name(base + facing.right_data));
        let left_group = registry.group(&self.group_name((base + facing.right_data) ^ 1));
        registry.add_to_group(own, BlockState::new(block_id, data))?;

        let [cond1, cond2, cond3, cond4] = wing_conditions(&facing, own, right_group, left_group)?;

        let place = |shape: UnitBox| {
            let shape = if base == UPPER_HALF {
                shape.mirrored_y()
            } else {
                shape
            };
            shape.rotated_by(rotation)
        };
        let [slab, wing1, wing2, wing3, wing4] = self.template;

        debug!(block_id, data, rotation = facing.rotation, "built stair variant");
        Ok([
            GeometryEntry::always(place(slab)),
            GeometryEntry::when(place(wing1), Arc::new(cond1)),
            GeometryEntry::when(place(wing2), Arc::new(cond2)),
            GeometryEntry::when(place(wing3), Arc::new(cond3)),
            GeometryEntry::when(place(wing4), Arc::new(cond4)),
        ]
        .into_iter()
        .collect())
    }
}

/// Visibility of the four wings.
///
/// - back wings: shown unless the stair behind turns away on their side,
///   except when the stair beside continues the run;
/// - front wings: shown only for an inner corner, when the stair in front is
///   turned towards their side and nothing behind or beside takes over.
fn wing_conditions(
    facing: &StairFacing,
    own: GroupId,
    right_group: GroupId,
    left_group: GroupId,
) -> Result<[Condition; 4]> {
    let right_same = Condition::block(facing.right, own, false)?;
    let left_same = Condition::block(facing.left(), own, false)?;
    let back_not_right = Condition::block(facing.back, right_group, true)?;
    let back_not_left = Condition::block(facing.back, left_group, true)?;
    let front_left = Condition::block(facing.front(), left_group, false)?;
    let front_right = Condition::block(facing.front(), right_group, false)?;

    Ok([
        Condition::or([back_not_right.clone(), left_same.clone()]),
        Condition::or([back_not_left.clone(), right_same.clone()]),
        Condition::and([
            back_not_right.clone(),
            back_not_left.clone(),
            Condition::not(left_same),
            front_left,
        ]),
        Condition::and([
            back_not_right,
            back_not_left,
            Condition::not(right_same),
            front_right,
        ]),
    ])
}

/// Registration glue for a stair block type: publishes the shape models and
/// the inventory shape.
pub fn register_stairs(registry: &mut ShapeRegistry, builder: &StairModelBuilder, block_id: u16) -> Result<()> {
    builder.build(registry, block_id)?;
    registry.register_block_variant(BlockState::new(block_id, 0), INVENTORY_SHAPE.to_vec());
    Ok(())
}
