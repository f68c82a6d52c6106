//! World-side collaborators of the shape engine: a chunked block store that
//! answers neighbor lookups, and collision and ray queries over the boxes the
//! published models resolve to.

mod shapes;
mod world;

pub use shapes::{Aabb, BlockShapes, RayHit};
pub use world::{CHUNK_SIZE, SECTION_HEIGHT, WORLD_HEIGHT, WorldBlockMap};

#[cfg(test)]
mod tests;
