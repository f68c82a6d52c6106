use rs_utils::BlockFace;

use crate::stairs::UPPER_HALF;

/// Stair facing by horizontal look quadrant, starting at yaw 45°.
const QUADRANT_DATA: [u8; 4] = [3, 1, 2, 0];

/// Data value for a stair placed by a player looking at `yaw_degrees`.
///
/// `hit_y` is the height of the click inside the clicked block (`0..1`).
/// Clicking the bottom face, or the upper half of a side face, places the
/// stair upside down.
pub fn stair_placement_data(yaw_degrees: f32, face: BlockFace, hit_y: f32) -> u8 {
    let quadrant = ((yaw_degrees - 45.0).rem_euclid(360.0) / 90.0).floor() as usize;
    let mut data = QUADRANT_DATA[quadrant.min(3)];
    if face == BlockFace::Down || (face.is_horizontal() && hit_y >= 0.5) {
        data += UPPER_HALF;
    }
    data
}
