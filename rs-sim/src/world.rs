use std::collections::HashMap;

use bevy_ecs::prelude::Resource;
use bevy_math::IVec3;
use rs_shape::NeighborLookup;
use rs_utils::{BlockState, BlockUpdate, ChunkData};
use tracing::debug;

pub const CHUNK_SIZE: i32 = 16;
pub const SECTION_HEIGHT: i32 = 16;
pub const WORLD_HEIGHT: i32 = 256;
const SECTION_VOLUME: usize = (CHUNK_SIZE * CHUNK_SIZE * SECTION_HEIGHT) as usize;

#[derive(Clone, Default)]
struct ChunkColumn {
    sections: Vec<Option<Vec<u16>>>,
}

impl ChunkColumn {
    fn new() -> Self {
        Self {
            sections: vec![None; (WORLD_HEIGHT / SECTION_HEIGHT) as usize],
        }
    }

    fn set_section(&mut self, y: u8, blocks: Vec<u16>) {
        let idx = y as usize;
        if idx >= self.sections.len() || blocks.len() != SECTION_VOLUME {
            return;
        }
        self.sections[idx] = Some(blocks);
    }
}

/// Block states of the loaded chunks, packed `id << 4 | data`.
#[derive(Resource, Default)]
pub struct WorldBlockMap {
    chunks: HashMap<(i32, i32), ChunkColumn>,
}

impl WorldBlockMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_chunk(&mut self, chunk: ChunkData) {
        debug!(x = chunk.x, z = chunk.z, full = chunk.full, sections = chunk.sections.len(), "chunk update");
        let entry = self
            .chunks
            .entry((chunk.x, chunk.z))
            .or_insert_with(ChunkColumn::new);
        if chunk.full {
            *entry = ChunkColumn::new();
        }
        for section in chunk.sections {
            entry.set_section(section.y, section.blocks);
        }
    }

    /// Loads an all-air column.
    pub fn load_empty_chunk(&mut self, chunk_x: i32, chunk_z: i32) {
        self.chunks.insert((chunk_x, chunk_z), ChunkColumn::new());
    }

    pub fn unload_chunk(&mut self, chunk_x: i32, chunk_z: i32) {
        if self.chunks.remove(&(chunk_x, chunk_z)).is_some() {
            debug!(x = chunk_x, z = chunk_z, "chunk unloaded");
        }
    }

    pub fn has_chunk(&self, chunk_x: i32, chunk_z: i32) -> bool {
        self.chunks.contains_key(&(chunk_x, chunk_z))
    }

    /// Writes one block. Returns `false` when the column is not loaded or `y`
    /// is outside the world.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, state: BlockState) -> bool {
        if !(0..WORLD_HEIGHT).contains(&y) {
            return false;
        }
        let (key, section_index, idx) = locate(x, y, z);
        let Some(column) = self.chunks.get_mut(&key) else {
            return false;
        };
        let section = column.sections[section_index].get_or_insert_with(|| vec![0; SECTION_VOLUME]);
        section[idx] = state.to_raw();
        true
    }

    pub fn apply_update(&mut self, update: BlockUpdate) -> bool {
        self.set_block(update.x, update.y, update.z, update.state)
    }

    /// `None` for unloaded columns and heights outside the world; empty
    /// sections of a loaded column read as air.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> Option<BlockState> {
        if !(0..WORLD_HEIGHT).contains(&y) {
            return None;
        }
        let (key, section_index, idx) = locate(x, y, z);
        let column = self.chunks.get(&key)?;
        let Some(section) = column.sections[section_index].as_ref() else {
            return Some(BlockState::AIR);
        };
        Some(BlockState::from_raw(section.get(idx).copied().unwrap_or(0)))
    }
}

impl NeighborLookup for WorldBlockMap {
    fn block_state(&self, pos: IVec3) -> Option<BlockState> {
        self.block_at(pos.x, pos.y, pos.z)
    }
}

fn locate(x: i32, y: i32, z: i32) -> ((i32, i32), usize, usize) {
    let chunk_x = x.div_euclid(CHUNK_SIZE);
    let chunk_z = z.div_euclid(CHUNK_SIZE);
    let local_x = x.rem_euclid(CHUNK_SIZE) as usize;
    let local_z = z.rem_euclid(CHUNK_SIZE) as usize;
    let section_index = (y / SECTION_HEIGHT) as usize;
    let local_y = (y % SECTION_HEIGHT) as usize;
    let idx = local_y * 16 * 16 + local_z * 16 + local_x;
    ((chunk_x, chunk_z), section_index, idx)
}
