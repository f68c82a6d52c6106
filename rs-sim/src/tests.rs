use bevy_math::{IVec3, Vec3};
use rs_shape::{ModelKind, ShapeCatalog, ShapeRegistry, StairModelBuilder};
use rs_utils::{BlockState, BlockUpdate, ChunkData, ChunkSection};

use super::*;

const STAIRS: u16 = 53;
const STONE: BlockState = BlockState::new(1, 0);

fn catalog() -> ShapeCatalog {
    let mut registry = ShapeRegistry::new();
    StairModelBuilder::default()
        .build(&mut registry, STAIRS)
        .unwrap();
    registry.finish()
}

fn world_with_stair(pos: IVec3, data: u8) -> WorldBlockMap {
    let mut world = WorldBlockMap::new();
    world.load_empty_chunk(0, 0);
    assert!(world.set_block(pos.x, pos.y, pos.z, BlockState::new(STAIRS, data)));
    world
}

#[test]
fn unloaded_and_out_of_world_positions_do_not_resolve() {
    let mut world = WorldBlockMap::new();
    assert_eq!(world.block_at(0, 64, 0), None);
    assert!(!world.set_block(0, 64, 0, STONE));

    world.load_empty_chunk(-1, 0);
    assert_eq!(world.block_at(-1, 64, 3), Some(BlockState::AIR));
    assert_eq!(world.block_at(-1, -1, 3), None);
    assert_eq!(world.block_at(-1, WORLD_HEIGHT, 3), None);
    assert_eq!(world.block_at(0, 64, 3), None);

    assert!(world.set_block(-16, 0, 15, STONE));
    assert_eq!(world.block_at(-16, 0, 15), Some(STONE));
    world.unload_chunk(-1, 0);
    assert!(!world.has_chunk(-1, 0));
    assert_eq!(world.block_at(-16, 0, 15), None);
}

#[test]
fn chunk_updates_and_block_updates() {
    let mut blocks = vec![0u16; 4096];
    blocks[256 + 2 * 16 + 1] = BlockState::new(STAIRS, 2).to_raw();
    let mut world = WorldBlockMap::new();
    world.update_chunk(ChunkData {
        x: 0,
        z: 0,
        full: true,
        sections: vec![ChunkSection { y: 4, blocks }],
    });
    assert_eq!(world.block_at(1, 65, 2), Some(BlockState::new(STAIRS, 2)));
    assert_eq!(world.block_at(1, 10, 2), Some(BlockState::AIR));

    assert!(world.apply_update(BlockUpdate {
        x: 1,
        y: 65,
        z: 2,
        state: STONE,
    }));
    assert_eq!(world.block_at(1, 65, 2), Some(STONE));
}

#[test]
fn stair_at_unloaded_edge_fails_closed() {
    let catalog = catalog();
    // The back neighbor lies in chunk (0, 1), which is not loaded.
    let pos = IVec3::new(5, 64, 15);
    let world = world_with_stair(pos, 0);
    let shapes = BlockShapes::new(&world, &catalog);
    assert_eq!(shapes.block_boxes(ModelKind::Render, pos).len(), 1);

    let inner = IVec3::new(5, 64, 7);
    let world = world_with_stair(inner, 0);
    let shapes = BlockShapes::new(&world, &catalog);
    assert_eq!(shapes.block_boxes(ModelKind::Render, inner).len(), 3);
}

#[test]
fn collision_follows_resolved_wings() {
    let catalog = catalog();
    let pos = IVec3::new(2, 64, 2);
    let mut world = world_with_stair(pos, 0);
    world.set_block(6, 64, 2, STONE);
    let shapes = BlockShapes::new(&world, &catalog);

    let boxes = shapes.collect_collision_boxes(Vec3::new(2.0, 64.0, 2.0), Vec3::new(3.0, 65.0, 3.0));
    assert_eq!(boxes.len(), 3);
    assert_eq!(boxes[0], Aabb::new(Vec3::new(2.0, 64.0, 2.0), Vec3::new(3.0, 64.5, 3.0)));

    // Back half of the upper step is solid, the front half is open.
    assert!(shapes.aabb_collides(Vec3::new(2.1, 64.6, 2.6), Vec3::new(2.9, 64.9, 2.9)));
    assert!(!shapes.aabb_collides(Vec3::new(2.1, 64.6, 2.1), Vec3::new(2.9, 64.9, 2.4)));

    // Blocks without a model collide as full cubes.
    assert_eq!(
        shapes.block_boxes(ModelKind::Collision, IVec3::new(6, 64, 2)),
        vec![Aabb::new(Vec3::new(6.0, 64.0, 2.0), Vec3::new(7.0, 65.0, 3.0))]
    );
    assert!(shapes.block_boxes(ModelKind::Collision, IVec3::new(4, 64, 2)).is_empty());
}

#[test]
fn collision_tracks_a_neighbor_change() {
    let catalog = catalog();
    let pos = IVec3::new(2, 64, 2);
    let mut world = world_with_stair(pos, 0);
    let upper_back = (Vec3::new(2.6, 64.6, 2.6), Vec3::new(2.9, 64.9, 2.9));
    assert!(BlockShapes::new(&world, &catalog).aabb_collides(upper_back.0, upper_back.1));

    // An outer corner behind removes the wing on that side.
    world.set_block(2, 64, 3, BlockState::new(STAIRS, 3));
    assert!(!BlockShapes::new(&world, &catalog).aabb_collides(upper_back.0, upper_back.1));
}

#[test]
fn raycast_hits_step_or_slab() {
    let catalog = catalog();
    let world = world_with_stair(IVec3::new(2, 64, 2), 0);
    let shapes = BlockShapes::new(&world, &catalog);

    let hit = shapes
        .raycast(Vec3::new(2.25, 70.0, 2.75), Vec3::NEG_Y, 10.0)
        .unwrap();
    assert_eq!(hit.block, IVec3::new(2, 64, 2));
    assert_eq!(hit.normal, IVec3::Y);
    assert!((hit.distance - 5.0).abs() < 1e-4);

    let hit = shapes
        .raycast(Vec3::new(2.25, 70.0, 2.25), Vec3::NEG_Y, 10.0)
        .unwrap();
    assert!((hit.distance - 5.5).abs() < 1e-4);

    assert!(shapes
        .raycast(Vec3::new(2.25, 70.0, 2.25), Vec3::NEG_Y, 5.0)
        .is_none());
}

#[test]
fn raycast_passes_over_the_open_front() {
    let catalog = catalog();
    let world = world_with_stair(IVec3::new(2, 64, 2), 0);
    let shapes = BlockShapes::new(&world, &catalog);

    assert!(shapes
        .raycast(Vec3::new(0.5, 64.75, 2.25), Vec3::X, 5.0)
        .is_none());

    let hit = shapes
        .raycast(Vec3::new(0.5, 64.75, 2.75), Vec3::X, 5.0)
        .unwrap();
    assert_eq!(hit.normal, IVec3::NEG_X);
    assert!((hit.distance - 1.5).abs() < 1e-4);
    assert!(shapes.raycast(Vec3::ZERO, Vec3::ZERO, 5.0).is_none());
}

fn stone_world(blocks: &[IVec3]) -> WorldBlockMap {
    let mut world = WorldBlockMap::new();
    world.load_empty_chunk(0, 0);
    for pos in blocks {
        assert!(world.set_block(pos.x, pos.y, pos.z, STONE));
    }
    world
}

#[test]
fn raycast_hits_a_clipped_corner() {
    let catalog = catalog();
    let world = stone_world(&[IVec3::new(1, 64, 0)]);
    let shapes = BlockShapes::new(&world, &catalog);

    // The ray is inside the stone cell only for x in 1.0..1.02.
    let hit = shapes
        .raycast(Vec3::new(0.5, 64.5, 0.48), Vec3::new(1.0, 0.0, 1.0), 5.0)
        .unwrap();
    assert_eq!(hit.block, IVec3::new(1, 64, 0));
    assert_eq!(hit.normal, IVec3::NEG_X);
    assert!((hit.distance - 0.5 * std::f32::consts::SQRT_2).abs() < 1e-4);
}

#[test]
fn oblique_raycast_crosses_several_cells() {
    let catalog = catalog();
    let world = stone_world(&[IVec3::new(3, 64, 1), IVec3::new(1, 64, 2)]);
    let shapes = BlockShapes::new(&world, &catalog);
    let origin = Vec3::new(0.5, 64.2, 0.3);
    let dir = Vec3::new(2.0, 0.5, 1.0);

    let hit = shapes.raycast(origin, dir, 10.0).unwrap();
    assert_eq!(hit.block, IVec3::new(3, 64, 1));
    assert_eq!(hit.normal, IVec3::NEG_X);
    assert!((hit.distance - 1.25 * dir.length()).abs() < 1e-4);

    assert!(shapes.raycast(origin, dir, 2.5).is_none());
    // Reversed, the ray leaves through empty cells.
    assert!(shapes.raycast(origin, -dir, 10.0).is_none());
}
