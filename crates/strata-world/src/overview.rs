use std::io::{self, Write};

use strata_blocks::ids;

use crate::biome::BiomeKind;
use crate::column::{BlockColumn, CHUNK_HEIGHT, CHUNK_WIDTH};
use crate::error::GenerationError;
use crate::generation::TerrainGenerator;

/// Block-space rectangle `[min, max)` on the x/z plane.
#[derive(Clone, Copy, Debug)]
pub struct OverviewRegion {
    pub min_x: i32,
    pub min_z: i32,
    pub max_x: i32,
    pub max_z: i32,
}

impl OverviewRegion {
    pub fn new(min_x: i32, min_z: i32, max_x: i32, max_z: i32) -> Result<Self, OverviewError> {
        if min_x >= max_x || min_z >= max_z {
            return Err(OverviewError::InvalidRegion(
                "region max must be greater than min",
            ));
        }
        Ok(Self {
            min_x,
            min_z,
            max_x,
            max_z,
        })
    }

    /// Square of `size` blocks centred on the origin.
    pub fn centered(size: u32) -> Result<Self, OverviewError> {
        let half = (size / 2) as i32;
        Self::new(-half, -half, size as i32 - half, size as i32 - half)
    }

    #[inline]
    pub fn width(&self) -> usize {
        (self.max_x - self.min_x) as usize
    }

    #[inline]
    pub fn height(&self) -> usize {
        (self.max_z - self.min_z) as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverviewMode {
    HeightMap,
    BiomeMap,
}

#[derive(Debug)]
pub enum OverviewError {
    InvalidRegion(&'static str),
    Generation(GenerationError),
}

impl From<GenerationError> for OverviewError {
    fn from(e: GenerationError) -> Self {
        OverviewError::Generation(e)
    }
}

impl std::fmt::Display for OverviewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverviewError::InvalidRegion(msg) => write!(f, "invalid region: {}", msg),
            OverviewError::Generation(e) => write!(f, "generation failed: {}", e),
        }
    }
}

impl std::error::Error for OverviewError {}

#[derive(Clone, Debug)]
pub struct OverviewImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl OverviewImage {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 3],
        }
    }

    #[inline]
    pub fn put_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let idx = (y * self.width + x) * 3;
        self.data[idx..idx + 3].copy_from_slice(&rgb);
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let idx = (y * self.width + x) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Binary PPM (`P6`).
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        out.write_all(&self.data)?;
        out.flush()
    }
}

/// Renders a region by generating every chunk it touches.
pub fn render(
    generator: &mut TerrainGenerator,
    region: OverviewRegion,
    mode: OverviewMode,
) -> Result<OverviewImage, OverviewError> {
    let mut image = OverviewImage::new(region.width(), region.height());
    let cw = CHUNK_WIDTH as i32;
    let sea_level = generator.params().sea_level;
    for cz in region.min_z.div_euclid(cw)..=(region.max_z - 1).div_euclid(cw) {
        for cx in region.min_x.div_euclid(cw)..=(region.max_x - 1).div_euclid(cw) {
            let column = generator.generate_column(cx, cz)?;
            for lx in 0..CHUNK_WIDTH {
                let wx = cx * cw + lx as i32;
                if wx < region.min_x || wx >= region.max_x {
                    continue;
                }
                for lz in 0..CHUNK_WIDTH {
                    let wz = cz * cw + lz as i32;
                    if wz < region.min_z || wz >= region.max_z {
                        continue;
                    }
                    let color = match mode {
                        OverviewMode::HeightMap => {
                            height_color(&column.blocks, lx, lz, sea_level)
                        }
                        OverviewMode::BiomeMap => biome_color(
                            generator,
                            column.biomes[lx * CHUNK_WIDTH + lz],
                        ),
                    };
                    let px = (wx - region.min_x) as usize;
                    let py = (wz - region.min_z) as usize;
                    image.put_pixel(px, py, color);
                }
            }
        }
    }
    Ok(image)
}

fn height_color(blocks: &BlockColumn, x: usize, z: usize, sea_level: i32) -> [u8; 3] {
    let run = blocks.column(x, z);
    let Some(top) = run.iter().rposition(|&b| b != ids::AIR) else {
        return [0, 0, 0];
    };
    if ids::is_water(run[top]) || run[top] == ids::ICE {
        let floor = run[..top]
            .iter()
            .rposition(|&b| !ids::is_water(b))
            .unwrap_or(0);
        let depth = (top - floor) as f32 / sea_level.max(1) as f32;
        let d = depth.clamp(0.0, 1.0);
        return [0, lerp(90, 30, d), lerp(200, 110, d)];
    }
    let above = top as i32 - sea_level;
    let span = (CHUNK_HEIGHT as i32 - sea_level).max(1) as f32;
    let t = (above as f32 / span).clamp(0.0, 1.0);
    if t < 0.33 {
        lerp_color([34, 139, 34], [107, 142, 35], t / 0.33)
    } else if t < 0.66 {
        lerp_color([107, 142, 35], [139, 69, 19], (t - 0.33) / 0.33)
    } else {
        lerp_color([139, 69, 19], [245, 245, 245], (t - 0.66) / 0.34)
    }
}

fn biome_color(generator: &TerrainGenerator, kind: BiomeKind) -> [u8; 3] {
    match generator.biomes().get(kind) {
        Some(b) => [(b.color >> 16) as u8, (b.color >> 8) as u8, b.color as u8],
        None => [80, 80, 80],
    }
}

#[inline]
fn lerp(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t)
        .round()
        .clamp(0.0, 255.0) as u8
}

fn lerp_color(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t), lerp(a[2], b[2], t)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::BiomeRegistry;
    use crate::worldgen::WorldGenParams;
    use std::sync::Arc;

    #[test]
    fn rejects_empty_region() {
        assert!(OverviewRegion::new(0, 0, 0, 10).is_err());
        assert_eq!(OverviewRegion::centered(40).unwrap().width(), 40);
    }

    #[test]
    fn biome_map_uses_registry_colors() {
        let biomes = Arc::new(BiomeRegistry::init());
        let mut g = TerrainGenerator::new(3, Arc::new(WorldGenParams::default()), biomes.clone());
        let region = OverviewRegion::new(-8, -8, 24, 8).unwrap();
        let img = render(&mut g, region, OverviewMode::BiomeMap).unwrap();
        assert_eq!((img.width, img.height), (32, 16));
        let colors: Vec<[u8; 3]> = biomes
            .iter()
            .map(|b| [(b.color >> 16) as u8, (b.color >> 8) as u8, b.color as u8])
            .collect();
        for y in 0..img.height {
            for x in 0..img.width {
                assert!(colors.contains(&img.pixel(x, y)));
            }
        }
    }

    #[test]
    fn ppm_header() {
        let img = OverviewImage::new(2, 3);
        let mut out = Vec::new();
        img.write_ppm(&mut out).unwrap();
        assert!(out.starts_with(b"P6\n2 3\n255\n"));
        assert_eq!(out.len(), 11 + 18);
    }
}
