//! Conditional block shapes.
//!
//! Block types register [`Model`]s: ordered boxes, each optionally guarded by
//! a [`Condition`] on the neighboring blocks. Registration happens once on a
//! [`ShapeRegistry`]; [`ShapeRegistry::finish`] freezes it into a
//! [`ShapeCatalog`] which render and collision passes query every time they
//! need the boxes of a block.

mod condition;
mod error;
mod group;
mod model;
pub mod placement;
mod registry;
pub mod stairs;
mod template;
mod unit_box;

pub use condition::{Condition, NeighborLookup};
pub use error::{Result, ShapeError};
pub use group::{Group, GroupId, GroupTable};
pub use model::{GeometryEntry, Model, ModelKind, ModelView};
pub use placement::stair_placement_data;
pub use registry::{ShapeCatalog, ShapeRegistry};
pub use stairs::{StairFacing, StairModelBuilder, register_stairs};
pub use template::StairTemplate;
pub use unit_box::{Rotation, TEXELS, TexelBounds, UnitBox, rotate_offset};
