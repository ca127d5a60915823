use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct WorldGenConfig {
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default)]
    pub surface: Surface,
    #[serde(default)]
    pub carver: CarverConfig,
    #[serde(default)]
    pub decoration: Decoration,
    #[serde(default)]
    pub cache: Cache,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Terrain {
    #[serde(default = "default_sea_level")]
    pub sea_level: i32,
    #[serde(default = "default_coordinate_scale")]
    pub coordinate_scale: f64,
    #[serde(default = "default_coordinate_scale")]
    pub height_scale: f64,
    #[serde(default = "default_selector_xz")]
    pub selector_xz_divisor: f64,
    #[serde(default = "default_selector_y")]
    pub selector_y_divisor: f64,
    #[serde(default = "default_scale_noise")]
    pub scale_noise: f64,
    #[serde(default = "default_depth_noise")]
    pub depth_noise: f64,
}
fn default_sea_level() -> i32 {
    64
}
fn default_coordinate_scale() -> f64 {
    684.412
}
fn default_selector_xz() -> f64 {
    80.0
}
fn default_selector_y() -> f64 {
    160.0
}
fn default_scale_noise() -> f64 {
    1.121
}
fn default_depth_noise() -> f64 {
    200.0
}
impl Default for Terrain {
    fn default() -> Self {
        Self {
            sea_level: default_sea_level(),
            coordinate_scale: default_coordinate_scale(),
            height_scale: default_coordinate_scale(),
            selector_xz_divisor: default_selector_xz(),
            selector_y_divisor: default_selector_y(),
            scale_noise: default_scale_noise(),
            depth_noise: default_depth_noise(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Surface {
    // Sand and gravel overlays only start inside
    // `sea_level - band_below ..= sea_level + band_above`.
    #[serde(default = "default_band_below")]
    pub band_below: i32,
    #[serde(default = "default_band_above")]
    pub band_above: i32,
    #[serde(default = "default_bedrock_depth")]
    pub bedrock_depth: i32,
    #[serde(default = "default_surface_noise")]
    pub noise_scale: f64,
    #[serde(default = "default_true")]
    pub sandstone: bool,
}
fn default_band_below() -> i32 {
    4
}
fn default_band_above() -> i32 {
    1
}
fn default_bedrock_depth() -> i32 {
    5
}
fn default_surface_noise() -> f64 {
    1.0 / 32.0
}
fn default_true() -> bool {
    true
}
impl Default for Surface {
    fn default() -> Self {
        Self {
            band_below: default_band_below(),
            band_above: default_band_above(),
            bedrock_depth: default_bedrock_depth(),
            noise_scale: default_surface_noise(),
            sandstone: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CarverKind {
    Tunnels,
    Noise,
    None,
}

fn default_carver_kind() -> CarverKind {
    CarverKind::Tunnels
}

#[derive(Clone, Debug, Deserialize)]
pub struct CarverConfig {
    #[serde(default = "default_carver_kind")]
    pub kind: CarverKind,
    /// Source chunks considered around the carved chunk.
    #[serde(default = "default_range")]
    pub range: i32,
    /// Carved cells below this height fill with lava.
    #[serde(default = "default_lava_level")]
    pub lava_level: i32,
    #[serde(default)]
    pub noise: NoiseCaves,
}
fn default_range() -> i32 {
    8
}
fn default_lava_level() -> i32 {
    10
}
impl Default for CarverConfig {
    fn default() -> Self {
        Self {
            kind: default_carver_kind(),
            range: default_range(),
            lava_level: default_lava_level(),
            noise: NoiseCaves::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NoiseCaves {
    #[serde(default = "default_y_scale")]
    pub y_scale: f32,
    #[serde(default = "default_eps_base")]
    pub eps_base: f32,
    #[serde(default = "default_eps_add")]
    pub eps_add: f32,
    #[serde(default = "default_warp_xy")]
    pub warp_xy: f32,
    #[serde(default = "default_warp_y")]
    pub warp_y: f32,
    #[serde(default = "default_room_cell")]
    pub room_cell: f32,
    #[serde(default = "default_room_thr_base")]
    pub room_thr_base: f32,
    #[serde(default = "default_room_thr_add")]
    pub room_thr_add: f32,
    #[serde(default = "default_soil_min")]
    pub soil_min: f32,
    #[serde(default = "default_min_y")]
    pub min_y: f32,
    #[serde(default = "default_tunnel_fractal")]
    pub tunnel: Fractal,
    #[serde(default = "default_warp_fractal")]
    pub warp: Fractal,
}
#[derive(Clone, Debug, Deserialize)]
pub struct Fractal {
    #[serde(default = "d_oct")]
    pub octaves: i32,
    #[serde(default = "d_pers")]
    pub persistence: f32,
    #[serde(default = "d_lac")]
    pub lacunarity: f32,
    #[serde(default = "d_scale")]
    pub scale: f32,
}
fn d_oct() -> i32 {
    3
}
fn d_pers() -> f32 {
    0.55
}
fn d_lac() -> f32 {
    2.0
}
fn d_scale() -> f32 {
    48.0
}
fn default_y_scale() -> f32 {
    1.6
}
fn default_eps_base() -> f32 {
    0.04
}
fn default_eps_add() -> f32 {
    0.06
}
fn default_warp_xy() -> f32 {
    4.0
}
fn default_warp_y() -> f32 {
    2.0
}
fn default_room_cell() -> f32 {
    40.0
}
fn default_room_thr_base() -> f32 {
    0.10
}
fn default_room_thr_add() -> f32 {
    0.10
}
fn default_soil_min() -> f32 {
    4.0
}
fn default_min_y() -> f32 {
    5.0
}
fn default_tunnel_fractal() -> Fractal {
    Fractal {
        octaves: 3,
        persistence: 0.55,
        lacunarity: 2.0,
        scale: 48.0,
    }
}
fn default_warp_fractal() -> Fractal {
    Fractal {
        octaves: 2,
        persistence: 0.6,
        lacunarity: 2.0,
        scale: 80.0,
    }
}
impl Default for NoiseCaves {
    fn default() -> Self {
        Self {
            y_scale: default_y_scale(),
            eps_base: default_eps_base(),
            eps_add: default_eps_add(),
            warp_xy: default_warp_xy(),
            warp_y: default_warp_y(),
            room_cell: default_room_cell(),
            room_thr_base: default_room_thr_base(),
            room_thr_add: default_room_thr_add(),
            soil_min: default_soil_min(),
            min_y: default_min_y(),
            tunnel: default_tunnel_fractal(),
            warp: default_warp_fractal(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Spread {
    /// `y` uniform in `0..max_y`.
    #[default]
    Uniform,
    /// Sum of two uniform draws over `0..max_y / 2`, peaking at the middle.
    Triangular,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct VeinDef {
    pub block: String,
    pub count: u32,
    pub size: u32,
    pub max_y: i32,
    #[serde(default)]
    pub spread: Spread,
}

impl VeinDef {
    fn new(block: &str, count: u32, size: u32, max_y: i32) -> Self {
        Self {
            block: block.to_string(),
            count,
            size,
            max_y,
            spread: Spread::Uniform,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Decoration {
    #[serde(default = "default_true")]
    pub enable: bool,
    /// Mineral veins, placed in order after the clay pass.
    #[serde(default = "default_veins")]
    pub veins: Vec<VeinDef>,
}
fn default_veins() -> Vec<VeinDef> {
    vec![
        VeinDef::new("dirt", 20, 32, 128),
        VeinDef::new("gravel", 10, 32, 128),
        VeinDef::new("coal_ore", 20, 16, 128),
        VeinDef::new("iron_ore", 20, 8, 64),
        VeinDef::new("gold_ore", 2, 8, 32),
        VeinDef::new("redstone_ore", 8, 7, 16),
        VeinDef::new("diamond_ore", 1, 7, 16),
        VeinDef {
            spread: Spread::Triangular,
            ..VeinDef::new("lapis_ore", 1, 6, 32)
        },
    ]
}
impl Default for Decoration {
    fn default() -> Self {
        Self {
            enable: true,
            veins: default_veins(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Cache {
    #[serde(default = "default_tracked_radius")]
    pub tracked_radius: i32,
    #[serde(default)]
    pub generate_everywhere: bool,
    #[serde(default = "default_saves_per_tick")]
    pub saves_per_tick: usize,
}
fn default_tracked_radius() -> i32 {
    15
}
fn default_saves_per_tick() -> usize {
    2
}
impl Default for Cache {
    fn default() -> Self {
        Self {
            tracked_radius: default_tracked_radius(),
            generate_everywhere: false,
            saves_per_tick: default_saves_per_tick(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct NoiseCaveParams {
    pub y_scale: f32,
    pub eps_base: f32,
    pub eps_add: f32,
    pub warp_xy: f32,
    pub warp_y: f32,
    pub room_cell: f32,
    pub room_thr_base: f32,
    pub room_thr_add: f32,
    pub soil_min: f32,
    pub min_y: f32,
    pub tunnel: Fractal,
    pub warp: Fractal,
}

#[derive(Clone, Debug)]
pub enum CarverParams {
    Tunnels { range: i32, lava_level: i32 },
    Noise(NoiseCaveParams),
    Disabled,
}

// Flattened params used in tight loops (snapshot of config)
#[derive(Clone, Debug)]
pub struct WorldGenParams {
    pub sea_level: i32,
    pub coordinate_scale: f64,
    pub height_scale: f64,
    pub selector_xz_divisor: f64,
    pub selector_y_divisor: f64,
    pub scale_noise: f64,
    pub depth_noise: f64,
    pub band_low: i32,
    pub band_high: i32,
    pub bedrock_depth: i32,
    pub surface_noise_scale: f64,
    pub sandstone: bool,
    pub carver: CarverParams,
    pub decoration_enable: bool,
    pub veins: Vec<VeinDef>,
    pub tracked_radius: i32,
    pub generate_everywhere: bool,
    pub saves_per_tick: usize,
}

impl Default for WorldGenParams {
    fn default() -> Self {
        Self::from_config(&WorldGenConfig::default())
    }
}

impl WorldGenParams {
    pub fn from_config(cfg: &WorldGenConfig) -> Self {
        let carver = match cfg.carver.kind {
            CarverKind::Tunnels => CarverParams::Tunnels {
                range: cfg.carver.range,
                lava_level: cfg.carver.lava_level,
            },
            CarverKind::Noise => {
                let n = &cfg.carver.noise;
                CarverParams::Noise(NoiseCaveParams {
                    y_scale: n.y_scale,
                    eps_base: n.eps_base,
                    eps_add: n.eps_add,
                    warp_xy: n.warp_xy,
                    warp_y: n.warp_y,
                    room_cell: n.room_cell,
                    room_thr_base: n.room_thr_base,
                    room_thr_add: n.room_thr_add,
                    soil_min: n.soil_min,
                    min_y: n.min_y,
                    tunnel: n.tunnel.clone(),
                    warp: n.warp.clone(),
                })
            }
            CarverKind::None => CarverParams::Disabled,
        };
        Self {
            sea_level: cfg.terrain.sea_level,
            coordinate_scale: cfg.terrain.coordinate_scale,
            height_scale: cfg.terrain.height_scale,
            selector_xz_divisor: cfg.terrain.selector_xz_divisor,
            selector_y_divisor: cfg.terrain.selector_y_divisor,
            scale_noise: cfg.terrain.scale_noise,
            depth_noise: cfg.terrain.depth_noise,
            band_low: cfg.terrain.sea_level - cfg.surface.band_below,
            band_high: cfg.terrain.sea_level + cfg.surface.band_above,
            bedrock_depth: cfg.surface.bedrock_depth.max(1),
            surface_noise_scale: cfg.surface.noise_scale,
            sandstone: cfg.surface.sandstone,
            carver,
            decoration_enable: cfg.decoration.enable,
            veins: cfg.decoration.veins.clone(),
            tracked_radius: cfg.cache.tracked_radius.max(0),
            generate_everywhere: cfg.cache.generate_everywhere,
            saves_per_tick: cfg.cache.saves_per_tick,
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: WorldGenConfig = toml::from_str(s)?;
        Ok(Self::from_config(&cfg))
    }
}

pub fn load_params_from_path(path: &Path) -> Result<WorldGenParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    WorldGenParams::from_toml_str(&s)
}
