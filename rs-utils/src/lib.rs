use serde::{Deserialize, Serialize};

pub const DATA_BITS: u16 = 4;
pub const DATA_MASK: u16 = (1 << DATA_BITS) - 1;
pub const MAX_BLOCK_ID: u16 = u16::MAX >> DATA_BITS;

/// A block id together with its 4-bit data value.
///
/// Chunk sections store states packed the way the 1.8 protocol does:
/// `id << 4 | data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockState {
    pub id: u16,
    pub data: u8,
}

impl BlockState {
    pub const AIR: Self = Self { id: 0, data: 0 };

    pub const fn new(id: u16, data: u8) -> Self {
        Self { id, data }
    }

    pub fn from_raw(raw: u16) -> Self {
        Self {
            id: raw >> DATA_BITS,
            data: (raw & DATA_MASK) as u8,
        }
    }

    pub fn to_raw(self) -> u16 {
        debug_assert!(self.id <= MAX_BLOCK_ID, "block id {} does not fit 12 bits", self.id);
        (self.id << DATA_BITS) | (self.data as u16 & DATA_MASK)
    }

    pub fn is_air(self) -> bool {
        self.id == 0
    }
}

impl std::fmt::Display for BlockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.id, self.data)
    }
}

/// Face of a block, numbered like the client's `side` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockFace {
    Down = 0,
    Up = 1,
    North = 2,
    South = 3,
    West = 4,
    East = 5,
}

impl BlockFace {
    pub fn from_side(side: u8) -> Option<Self> {
        match side {
            0 => Some(Self::Down),
            1 => Some(Self::Up),
            2 => Some(Self::North),
            3 => Some(Self::South),
            4 => Some(Self::West),
            5 => Some(Self::East),
            _ => None,
        }
    }

    pub fn is_horizontal(self) -> bool {
        !matches!(self, Self::Down | Self::Up)
    }
}

#[derive(Clone, Debug)]
pub struct ChunkSection {
    pub y: u8,
    pub blocks: Vec<u16>,
}

#[derive(Clone, Debug)]
pub struct ChunkData {
    pub x: i32,
    pub z: i32,
    pub full: bool,
    pub sections: Vec<ChunkSection>,
}

#[derive(Debug, Clone, Copy)]
pub struct BlockUpdate {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub state: BlockState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_packing() {
        let state = BlockState::new(53, 6);
        assert_eq!(state.to_raw(), 53 * 16 + 6);
        assert_eq!(BlockState::from_raw(state.to_raw()), state);
        assert!(BlockState::from_raw(0).is_air());
    }

    #[test]
    #[should_panic]
    fn oversized_id_does_not_pack() {
        let _ = BlockState::new(MAX_BLOCK_ID + 1, 0).to_raw();
    }

    #[test]
    fn sides() {
        assert_eq!(BlockFace::from_side(0), Some(BlockFace::Down));
        assert_eq!(BlockFace::from_side(5), Some(BlockFace::East));
        assert_eq!(BlockFace::from_side(6), None);
        assert!(BlockFace::North.is_horizontal());
        assert!(!BlockFace::Up.is_horizontal());
    }
}
