use crate::rng::JavaRandom;

/// One improved-Perlin lattice: a shuffled permutation table plus a random
/// offset so independently drawn lattices never line up.
#[derive(Clone)]
pub struct PerlinLattice {
    perm: [u8; 512],
    xo: f64,
    yo: f64,
    zo: f64,
}

impl PerlinLattice {
    pub fn new(rand: &mut JavaRandom) -> Self {
        let xo = rand.next_double() * 256.0;
        let yo = rand.next_double() * 256.0;
        let zo = rand.next_double() * 256.0;
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }
        for i in 0..256 {
            let j = rand.next_int_bounded(256 - i as i32) as usize + i;
            table.swap(i, j);
        }
        let mut perm = [0u8; 512];
        perm[..256].copy_from_slice(&table);
        perm[256..].copy_from_slice(&table);
        Self { perm, xo, yo, zo }
    }

    #[inline]
    fn p(&self, i: usize) -> usize {
        self.perm[i & 511] as usize
    }

    /// Raw lattice value at an already offset position.
    fn raw(&self, x: f64, y: f64, z: f64) -> f64 {
        let (xi, x) = split(x);
        let (yi, y) = split(y);
        let (zi, z) = split(z);
        let u = fade(x);
        let v = fade(y);
        let w = fade(z);

        let a = self.p(xi) + yi;
        let aa = self.p(a) + zi;
        let ab = self.p(a + 1) + zi;
        let b = self.p(xi + 1) + yi;
        let ba = self.p(b) + zi;
        let bb = self.p(b + 1) + zi;

        lerp(
            w,
            lerp(
                v,
                lerp(u, grad(self.p(aa), x, y, z), grad(self.p(ba), x - 1.0, y, z)),
                lerp(
                    u,
                    grad(self.p(ab), x, y - 1.0, z),
                    grad(self.p(bb), x - 1.0, y - 1.0, z),
                ),
            ),
            lerp(
                v,
                lerp(
                    u,
                    grad(self.p(aa + 1), x, y, z - 1.0),
                    grad(self.p(ba + 1), x - 1.0, y, z - 1.0),
                ),
                lerp(
                    u,
                    grad(self.p(ab + 1), x, y - 1.0, z - 1.0),
                    grad(self.p(bb + 1), x - 1.0, y - 1.0, z - 1.0),
                ),
            ),
        )
    }

    /// Point sample including the lattice offset.
    #[inline]
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        self.raw(x + self.xo, y + self.yo, z + self.zo)
    }

    /// Adds `noise((origin + i) * scale) / amplitude` to each cell of `out`,
    /// laid out `(x * size_z + z) * size_y + y`.
    ///
    /// A region one sample tall is evaluated on the y = 0 lattice plane, which
    /// ignores the y offset entirely.
    pub fn accumulate(
        &self,
        out: &mut [f64],
        origin: [f64; 3],
        size: [usize; 3],
        scale: [f64; 3],
        amplitude: f64,
    ) {
        let [sx, sy, sz] = size;
        let inv = 1.0 / amplitude;
        let flat = sy == 1;
        let mut idx = 0;
        for i in 0..sx {
            let x = (origin[0] + i as f64) * scale[0] + self.xo;
            for k in 0..sz {
                let z = (origin[2] + k as f64) * scale[2] + self.zo;
                if flat {
                    out[idx] += self.raw(x, 0.0, z) * inv;
                    idx += 1;
                    continue;
                }
                for j in 0..sy {
                    let y = (origin[1] + j as f64) * scale[1] + self.yo;
                    out[idx] += self.raw(x, y, z) * inv;
                    idx += 1;
                }
            }
        }
    }
}

#[inline]
fn split(v: f64) -> (usize, f64) {
    let f = v.floor();
    (((f as i64) & 255) as usize, v - f)
}

#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

#[inline]
fn grad(hash: usize, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}
