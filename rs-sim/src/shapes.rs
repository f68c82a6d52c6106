use bevy_math::{IVec3, Vec3};
use rs_shape::{ModelKind, ShapeCatalog, UnitBox};

use crate::world::WorldBlockMap;

const COLLISION_EPS: f32 = 1e-5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// `shape` placed in the block at `pos`.
    pub fn from_unit_box(pos: IVec3, shape: UnitBox) -> Self {
        let origin = pos.as_vec3();
        Self::new(origin + shape.min(), origin + shape.max())
    }

    pub fn offset(self, delta: Vec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
            && self.max.z > other.min.z
            && self.min.z < other.max.z
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub block: IVec3,
    /// Outward normal of the face that was hit.
    pub normal: IVec3,
    pub distance: f32,
}

/// Resolves world-space boxes for blocks using the published models.
///
/// Blocks without a model are full cubes; air and unloaded positions have no
/// boxes.
pub struct BlockShapes<'a> {
    world: &'a WorldBlockMap,
    catalog: &'a ShapeCatalog,
}

impl<'a> BlockShapes<'a> {
    pub fn new(world: &'a WorldBlockMap, catalog: &'a ShapeCatalog) -> Self {
        Self { world, catalog }
    }

    pub fn block_boxes(&self, kind: ModelKind, pos: IVec3) -> Vec<Aabb> {
        let mut out = Vec::new();
        self.append_block_boxes(kind, pos, &mut out);
        out
    }

    fn append_block_boxes(&self, kind: ModelKind, pos: IVec3, out: &mut Vec<Aabb>) {
        let Some(state) = self.world.block_at(pos.x, pos.y, pos.z) else {
            return;
        };
        if state.is_air() {
            return;
        }
        match self.catalog.model(kind, state) {
            Some(view) => {
                for shape in view.resolve(pos, self.world) {
                    out.push(Aabb::from_unit_box(pos, shape));
                }
            }
            None => out.push(Aabb::from_unit_box(pos, UnitBox::FULL)),
        }
    }

    pub fn collect_collision_boxes(&self, min: Vec3, max: Vec3) -> Vec<Aabb> {
        let (min_x, max_x) = block_range(min.x, max.x);
        let (min_y, max_y) = block_range(min.y, max.y);
        let (min_z, max_z) = block_range(min.z, max.z);
        let mut out = Vec::new();
        for y in min_y..=max_y {
            for z in min_z..=max_z {
                for x in min_x..=max_x {
                    self.append_block_boxes(ModelKind::Collision, IVec3::new(x, y, z), &mut out);
                }
            }
        }
        out
    }

    pub fn aabb_collides(&self, min: Vec3, max: Vec3) -> bool {
        let query = Aabb::new(min, max);
        self.collect_collision_boxes(min, max)
            .iter()
            .any(|block| query.intersects(block))
    }

    /// First collision box along the ray. Walks every cell the ray crosses
    /// in order (Amanatides-Woo), so the first hit is the nearest one.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir.length_squared() == 0.0 {
            return None;
        }

        let mut cell = origin.floor().as_ivec3();
        let mut step = IVec3::ZERO;
        let mut t_next = Vec3::splat(f32::INFINITY);
        let mut t_delta = Vec3::splat(f32::INFINITY);
        for axis in 0..3 {
            if dir[axis] > 0.0 {
                step[axis] = 1;
                t_delta[axis] = 1.0 / dir[axis];
                t_next[axis] = (cell[axis] as f32 + 1.0 - origin[axis]) / dir[axis];
            } else if dir[axis] < 0.0 {
                step[axis] = -1;
                t_delta[axis] = -1.0 / dir[axis];
                t_next[axis] = (cell[axis] as f32 - origin[axis]) / dir[axis];
            }
        }

        loop {
            if let Some(hit) = self.hit_in_cell(cell, origin, dir, max_distance) {
                return Some(hit);
            }
            let axis = if t_next.x < t_next.y {
                if t_next.x < t_next.z { 0 } else { 2 }
            } else if t_next.y < t_next.z {
                1
            } else {
                2
            };
            if t_next[axis] > max_distance {
                return None;
            }
            cell[axis] += step[axis];
            t_next[axis] += t_delta[axis];
        }
    }

    fn hit_in_cell(&self, cell: IVec3, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<RayHit> {
        let mut nearest: Option<RayHit> = None;
        for bb in self.block_boxes(ModelKind::Collision, cell) {
            let Some((distance, normal)) = ray_aabb_hit(origin, dir, &bb, max_distance) else {
                continue;
            };
            match nearest {
                Some(current) if current.distance <= distance => {}
                _ => {
                    nearest = Some(RayHit {
                        block: cell,
                        normal,
                        distance,
                    });
                }
            }
        }
        nearest
    }
}

/// Slab test. Returns the entry distance and the normal of the entry face;
/// a ray starting inside the box hits at distance 0 with a zero normal.
fn ray_aabb_hit(origin: Vec3, dir: Vec3, bb: &Aabb, max_distance: f32) -> Option<(f32, IVec3)> {
    let mut t_min = 0.0f32;
    let mut t_max = max_distance;
    let mut normal = IVec3::ZERO;

    for axis in 0..3 {
        let (origin_axis, dir_axis, min_axis, max_axis) = (origin[axis], dir[axis], bb.min[axis], bb.max[axis]);

        if dir_axis.abs() <= f32::EPSILON {
            if origin_axis < min_axis || origin_axis > max_axis {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir_axis;
        let mut t1 = (min_axis - origin_axis) * inv;
        let mut t2 = (max_axis - origin_axis) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }

        if t1 > t_min {
            t_min = t1;
            normal = IVec3::ZERO;
            normal[axis] = if dir_axis > 0.0 { -1 } else { 1 };
        }
        t_max = t_max.min(t2);
        if t_max < t_min {
            return None;
        }
    }

    Some((t_min, normal))
}

fn block_range(min: f32, max: f32) -> (i32, i32) {
    let min_i = (min + COLLISION_EPS).floor() as i32;
    let max_i = (max - COLLISION_EPS).floor() as i32;
    if min_i <= max_i {
        (min_i, max_i)
    } else {
        (max_i, min_i)
    }
}
