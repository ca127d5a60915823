use std::f64::consts::TAU;

use strata_blocks::{BlockId, ids};
use strata_chunk::BlockAccess;
use strata_world::JavaRandom;

use super::Feature;
use super::tree::can_grow_on;

const HEIGHT_ATTENUATION: f64 = 0.618;
const BRANCH_SLOPE: f64 = 0.381;
const LEAF_DISTANCE: i32 = 4;
const LEAF_DENSITY: f64 = 1.0;
const MIN_HEIGHT: i32 = 6;

/// Tall branching oak. Draws one long from the shared stream and grows from
/// its own generator, so its shape never shifts the features after it.
#[derive(Default)]
pub struct BigTree;

impl Feature for BigTree {
    fn place(
        &mut self,
        world: &mut dyn BlockAccess,
        rand: &mut JavaRandom,
        x: i32,
        y: i32,
        z: i32,
    ) -> bool {
        let mut rand = JavaRandom::new(rand.next_long());
        let height_limit = 5 + rand.next_int_bounded(12);
        let mut growth = Growth {
            origin: [x, y, z],
            height_limit,
            rand,
        };
        if !growth.settle(world) {
            return false;
        }
        let nodes = growth.leaf_nodes(world);
        for node in &nodes {
            growth.leaf_cluster(world, node.pos);
        }
        let trunk_top = growth.trunk_top();
        draw_line(world, growth.origin, [x, y + trunk_top, z], ids::LOG);
        for node in &nodes {
            if (node.branch_y - y) as f64 >= height_limit as f64 * 0.2 {
                draw_line(world, [x, node.branch_y, z], node.pos, ids::LOG);
            }
        }
        true
    }
}

struct LeafNode {
    pos: [i32; 3],
    branch_y: i32,
}

struct Growth {
    origin: [i32; 3],
    height_limit: i32,
    rand: JavaRandom,
}

impl Growth {
    fn trunk_top(&self) -> i32 {
        let h = (self.height_limit as f64 * HEIGHT_ATTENUATION) as i32;
        h.min(self.height_limit - 1)
    }

    /// Checks the soil and shortens the tree to the free space above it.
    fn settle(&mut self, world: &dyn BlockAccess) -> bool {
        let [x, y, z] = self.origin;
        if !can_grow_on(world, x, y - 1, z) {
            return false;
        }
        match first_obstacle(world, self.origin, [x, y + self.height_limit - 1, z]) {
            None => true,
            Some(n) if n < MIN_HEIGHT => false,
            Some(n) => {
                self.height_limit = n;
                true
            }
        }
    }

    fn layer_size(&self, rel: i32) -> f32 {
        if (rel as f64) < self.height_limit as f64 * 0.3 {
            return -1.618;
        }
        let half = self.height_limit as f32 / 2.0;
        let d = half - rel as f32;
        let size = if d == 0.0 {
            half
        } else if d.abs() >= half {
            0.0
        } else {
            (half * half - d * d).sqrt()
        };
        size * 0.5
    }

    fn leaf_nodes(&mut self, world: &dyn BlockAccess) -> Vec<LeafNode> {
        let [x, y, z] = self.origin;
        let per_layer = ((1.382 + (LEAF_DENSITY * self.height_limit as f64 / 13.0).powi(2)) as usize).max(1);
        let trunk_y = y + self.trunk_top();

        let mut layer_y = y + self.height_limit - LEAF_DISTANCE;
        let mut nodes = vec![LeafNode {
            pos: [x, layer_y, z],
            branch_y: trunk_y,
        }];
        layer_y -= 1;

        let mut rel = layer_y + 1 - y;
        while rel >= 0 {
            let size = self.layer_size(rel);
            if size >= 0.0 {
                for _ in 0..per_layer {
                    let dist = size as f64 * (self.rand.next_float() as f64 + 0.328);
                    let angle = self.rand.next_float() as f64 * TAU;
                    let nx = (dist * angle.sin() + x as f64 + 0.5).floor() as i32;
                    let nz = (dist * angle.cos() + z as f64 + 0.5).floor() as i32;
                    let pos = [nx, layer_y, nz];
                    if first_obstacle(world, pos, [nx, layer_y + LEAF_DISTANCE, nz]).is_some() {
                        continue;
                    }
                    let reach = (((x - nx) as f64).powi(2) + ((z - nz) as f64).powi(2)).sqrt();
                    let sloped = pos[1] as f64 - reach * BRANCH_SLOPE;
                    let branch_y = if sloped > trunk_y as f64 {
                        trunk_y
                    } else {
                        sloped as i32
                    };
                    if first_obstacle(world, [x, branch_y, z], pos).is_none() {
                        nodes.push(LeafNode { pos, branch_y });
                    }
                }
            }
            layer_y -= 1;
            rel -= 1;
        }
        nodes
    }

    fn leaf_cluster(&self, world: &mut dyn BlockAccess, [x, y, z]: [i32; 3]) {
        for dy in 0..LEAF_DISTANCE {
            let size = if dy == 0 || dy == LEAF_DISTANCE - 1 {
                2.0
            } else {
                3.0
            };
            leaf_disc(world, x, y + dy, z, size);
        }
    }
}

fn leaf_disc(world: &mut dyn BlockAccess, x: i32, y: i32, z: i32, size: f64) {
    let r = (size + 0.618) as i32;
    for dx in -r..=r {
        for dz in -r..=r {
            let d = ((dx.abs() as f64 + 0.5).powi(2) + (dz.abs() as f64 + 0.5).powi(2)).sqrt();
            if d > size {
                continue;
            }
            if matches!(world.block_id(x + dx, y, z + dz), ids::AIR | ids::LEAVES) {
                world.set_block(x + dx, y, z + dz, ids::LEAVES);
            }
        }
    }
}

/// Blocks visited walking from `a` to `b` along the longest axis.
fn line(a: [i32; 3], b: [i32; 3]) -> Vec<[i32; 3]> {
    let delta = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let mut major = 0;
    for axis in 1..3 {
        if delta[axis].abs() > delta[major].abs() {
            major = axis;
        }
    }
    let steps = delta[major];
    if steps == 0 {
        return Vec::new();
    }
    let ratio = delta.map(|d| d as f64 / steps as f64);
    let sign = steps.signum();
    (0..=steps.abs())
        .map(|k| {
            let j = (k * sign) as f64;
            let mut p = [0; 3];
            for axis in 0..3 {
                p[axis] = (a[axis] as f64 + j * ratio[axis] + 0.5).floor() as i32;
            }
            p
        })
        .collect()
}

/// Steps taken before the line from `a` to `b` hits something other than air
/// or leaves, `None` if it is clear.
fn first_obstacle(world: &dyn BlockAccess, a: [i32; 3], b: [i32; 3]) -> Option<i32> {
    line(a, b)
        .into_iter()
        .position(|[x, y, z]| !matches!(world.block_id(x, y, z), ids::AIR | ids::LEAVES))
        .map(|k| k as i32)
}

fn draw_line(world: &mut dyn BlockAccess, a: [i32; 3], b: [i32; 3], id: BlockId) {
    for [x, y, z] in line(a, b) {
        world.set_block(x, y, z, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{count, flat_world};

    #[test]
    fn line_covers_both_ends() {
        let pts = line([0, 0, 0], [3, 1, -2]);
        assert_eq!(pts.first(), Some(&[0, 0, 0]));
        assert_eq!(pts.last(), Some(&[3, 1, -2]));
        assert_eq!(pts.len(), 4);
        assert!(line([1, 2, 3], [1, 2, 3]).is_empty());
    }

    #[test]
    fn grows_trunk_branches_and_leaves() {
        let mut w = flat_world(ids::GRASS, 60);
        let mut rand = JavaRandom::new(21);
        assert!(BigTree.place(&mut w, &mut rand, 8, 61, 8));
        assert_eq!(w.block_id(8, 61, 8), ids::LOG);
        assert!(count(&w, ids::LOG) >= 4);
        assert!(count(&w, ids::LEAVES) > 10);
    }

    #[test]
    fn low_ceiling_blocks_growth() {
        let mut w = flat_world(ids::GRASS, 60);
        w.set_block(8, 64, 8, ids::STONE);
        let mut rand = JavaRandom::new(21);
        assert!(!BigTree.place(&mut w, &mut rand, 8, 61, 8));
        assert_eq!(count(&w, ids::LOG), 0);
    }

    #[test]
    fn consumes_one_long_from_the_shared_stream() {
        let mut w = flat_world(ids::GRASS, 60);
        let mut rand = JavaRandom::new(77);
        BigTree.place(&mut w, &mut rand, 8, 61, 8);
        let mut reference = JavaRandom::new(77);
        reference.next_long();
        assert_eq!(rand.next_int(), reference.next_int());
    }
}
