use std::fs;
use std::path::Path;

use bevy_math::IVec3;
use rs_sim::{CHUNK_SIZE, WorldBlockMap};
use rs_utils::{BlockState, MAX_BLOCK_ID};
use serde::Deserialize;
use tracing::warn;

/// Blocks to place in an otherwise empty world.
///
/// ```toml
/// [[blocks]]
/// pos = [2, 64, 2]
/// id = 53
/// data = 0
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub blocks: Vec<SceneBlock>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SceneBlock {
    pub pos: [i32; 3],
    pub id: u16,
    #[serde(default)]
    pub data: u8,
}

impl SceneBlock {
    pub fn pos(&self) -> IVec3 {
        IVec3::from_array(self.pos)
    }

    pub fn state(&self) -> BlockState {
        BlockState::new(self.id, self.data)
    }
}

impl Scene {
    /// Rejects block ids that do not fit a packed block state.
    pub fn from_toml_str(raw: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let scene: Self = toml::from_str(raw)?;
        if let Some(block) = scene.blocks.iter().find(|block| block.id > MAX_BLOCK_ID) {
            return Err(format!(
                "block id {} at {:?} is above {MAX_BLOCK_ID}",
                block.id, block.pos
            )
            .into());
        }
        Ok(scene)
    }

    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Loads the chunks the scene touches as air and places its blocks.
    /// Everything outside those chunks stays unloaded.
    pub fn to_world(&self) -> WorldBlockMap {
        let mut world = WorldBlockMap::new();
        for block in &self.blocks {
            let pos = block.pos();
            let (chunk_x, chunk_z) = (pos.x.div_euclid(CHUNK_SIZE), pos.z.div_euclid(CHUNK_SIZE));
            if !world.has_chunk(chunk_x, chunk_z) {
                world.load_empty_chunk(chunk_x, chunk_z);
            }
            if !world.set_block(pos.x, pos.y, pos.z, block.state()) {
                warn!(?pos, state = %block.state(), "scene block outside the world");
            }
        }
        world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_blocks_and_builds_world() {
        let scene = Scene::from_toml_str(
            r#"
[[blocks]]
pos = [-1, 64, 2]
id = 53
data = 5

[[blocks]]
pos = [3, 64, 2]
id = 1

[[blocks]]
pos = [3, 300, 2]
id = 1
"#,
        )
        .unwrap();
        assert_eq!(scene.blocks.len(), 3);
        assert_eq!(scene.blocks[1].data, 0);

        let world = scene.to_world();
        assert!(world.has_chunk(-1, 0));
        assert!(world.has_chunk(0, 0));
        assert_eq!(world.block_at(-1, 64, 2), Some(BlockState::new(53, 5)));
        assert_eq!(world.block_at(3, 64, 2), Some(BlockState::new(1, 0)));
        assert_eq!(world.block_at(3, 65, 2), Some(BlockState::AIR));
        assert_eq!(world.block_at(20, 64, 2), None);
    }

    #[test]
    fn rejects_malformed_scene() {
        assert!(Scene::from_toml_str("[[blocks]]\npos = [1, 2]\nid = 1\n").is_err());
        assert!(Scene::from_toml_str("").unwrap().blocks.is_empty());
        assert!(Scene::from_toml_str("[[blocks]]\npos = [0, 64, 0]\nid = 5000\n").is_err());
        assert!(Scene::from_toml_str("[[blocks]]\npos = [0, 64, 0]\nid = 4095\n").is_ok());
    }
}
