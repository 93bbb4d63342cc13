//! Interactive particle field.
//!
//! Two populations share one field:
//! - **ambient** particles live forever, drift, bounce or wrap at the edges and
//!   react to the pointer;
//! - **burst** particles are spawned by a click/tap, fly out radially, slow
//!   down under friction and fade out over a fixed life.
//!
//! Time is measured in reference frames: `dt = 1.0` is one 60 Hz frame, which
//! is the unit every per-tick constant in [`FieldConfig`] is expressed in.

use crate::prng::Prng;
use crate::surface::{Rgb, Surface};

/// Largest step `advance` will integrate in one call.
pub const MAX_FRAME_STEP: f32 = 3.0;

pub const DEFAULT_PALETTE: [Rgb; 5] = [
    Rgb::new(0x22, 0xd3, 0xee),
    Rgb::new(0x81, 0x8c, 0xf8),
    Rgb::new(0xd9, 0x46, 0xef),
    Rgb::new(0x3b, 0x82, 0xf6),
    Rgb::new(0x06, 0xb6, 0xd4),
];

const DEFAULT_LINK_COLOR: Rgb = Rgb::new(148, 163, 184);

/// Remaining life at or below this counts as spent. Absorbs the rounding left
/// after subtracting a decimal life step from 1.0 in `f32`.
const LIFE_RESIDUE: f32 = 1.0e-5;

/// What an ambient particle does when it crosses the field edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BoundaryStyle {
    /// Reflect off the edge and invert the crossing velocity component.
    #[default]
    Bounce,
    /// Re-enter from the opposite edge.
    Wrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PointerMode {
    #[default]
    Repel,
    Attract,
}

/// Tunables for the field. Defaults reproduce the portfolio background.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FieldConfig {
    /// Square pixels of viewport per ambient particle.
    pub area_per_particle: f32,
    /// Upper bound on the ambient population.
    pub max_ambient: usize,
    pub boundary: BoundaryStyle,
    /// Ambient velocity components are drawn from `[-ambient_speed, ambient_speed)`.
    pub ambient_speed: f32,
    pub base_radius_min: f32,
    pub base_radius_max: f32,
    pub ambient_alpha: f32,

    pub interaction_radius: f32,
    pub pointer_mode: PointerMode,
    /// Displacement at zero distance from the pointer, per frame.
    pub pointer_strength: f32,
    /// Extra radius at zero distance from the pointer.
    pub radius_growth: f32,

    pub link_distance: f32,
    pub link_alpha: f32,
    pub link_width: f32,
    pub link_color: Rgb,
    /// When set, draw lines from the pointer to ambient particles within this distance.
    pub pointer_link_distance: Option<f32>,
    pub pointer_link_alpha: f32,

    pub burst_count: usize,
    pub burst_speed_min: f32,
    pub burst_speed_max: f32,
    /// Per-frame velocity multiplier for burst particles (< 1).
    pub burst_friction: f32,
    /// Life lost per frame; life starts at 1.
    pub burst_life_step: f32,

    pub palette: Vec<Rgb>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            area_per_particle: 10_000.0,
            max_ambient: 150,
            boundary: BoundaryStyle::Bounce,
            ambient_speed: 0.4,
            base_radius_min: 0.5,
            base_radius_max: 2.0,
            ambient_alpha: 0.4,
            interaction_radius: 200.0,
            pointer_mode: PointerMode::Repel,
            pointer_strength: 2.0,
            radius_growth: 3.0,
            link_distance: 120.0,
            link_alpha: 0.15,
            link_width: 0.5,
            link_color: DEFAULT_LINK_COLOR,
            pointer_link_distance: None,
            pointer_link_alpha: 0.25,
            burst_count: 15,
            burst_speed_min: 4.0,
            burst_speed_max: 10.0,
            burst_friction: 0.95,
            burst_life_step: 0.025,
            palette: DEFAULT_PALETTE.to_vec(),
        }
    }
}

impl FieldConfig {
    pub fn with_boundary(mut self, boundary: BoundaryStyle) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_pointer_mode(mut self, mode: PointerMode) -> Self {
        self.pointer_mode = mode;
        self
    }

    pub fn with_pointer_links(mut self, distance: f32) -> Self {
        self.pointer_link_distance = Some(distance);
        self
    }

    pub fn with_max_ambient(mut self, max: usize) -> Self {
        self.max_ambient = max;
        self
    }

    /// Ambient population for a `width` x `height` field.
    pub fn ambient_count(&self, width: f32, height: f32) -> usize {
        if !(width > 0.0 && height > 0.0) || !(self.area_per_particle > 0.0) {
            return 0;
        }
        let wanted = ((width * height) / self.area_per_particle).ceil();
        if wanted >= self.max_ambient as f32 {
            self.max_ambient
        } else {
            wanted as usize
        }
    }

    fn color(&self, rng: &mut Prng) -> Rgb {
        rng.pick(&self.palette)
            .copied()
            .unwrap_or(DEFAULT_PALETTE[0])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleMode {
    Ambient,
    Burst { life: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub base_radius: f32,
    /// Rendered radius: `base_radius` plus any pointer-proximity bonus.
    pub radius: f32,
    pub color: Rgb,
    pub mode: ParticleMode,
}

impl Particle {
    fn ambient(x: f32, y: f32, cfg: &FieldConfig, rng: &mut Prng) -> Self {
        let base_radius = rng.range(cfg.base_radius_min, cfg.base_radius_max);
        Self {
            x,
            y,
            vx: rng.signed(cfg.ambient_speed),
            vy: rng.signed(cfg.ambient_speed),
            base_radius,
            radius: base_radius,
            color: cfg.color(rng),
            mode: ParticleMode::Ambient,
        }
    }

    fn burst(x: f32, y: f32, cfg: &FieldConfig, rng: &mut Prng) -> Self {
        let angle = rng.range(0.0, std::f32::consts::TAU);
        let speed = rng.range(cfg.burst_speed_min, cfg.burst_speed_max);
        let base_radius = rng.range(cfg.base_radius_min, cfg.base_radius_max);
        Self {
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            base_radius,
            radius: base_radius,
            color: cfg.color(rng),
            mode: ParticleMode::Burst { life: 1.0 },
        }
    }

    /// Remaining life for bursts; `None` for ambient particles.
    pub fn life(&self) -> Option<f32> {
        match self.mode {
            ParticleMode::Ambient => None,
            ParticleMode::Burst { life } => Some(life),
        }
    }

    pub fn is_burst(&self) -> bool {
        matches!(self.mode, ParticleMode::Burst { .. })
    }
}

/// What one `render` call drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub discs: usize,
    pub links: usize,
    pub pointer_links: usize,
}

/// The particle field: dimensions, pointer state and both populations.
#[derive(Debug, Clone)]
pub struct ParticleField {
    config: FieldConfig,
    width: f32,
    height: f32,
    pointer: Option<(f32, f32)>,
    ambient: Vec<Particle>,
    bursts: Vec<Particle>,
    rng: Prng,
}

impl ParticleField {
    /// A field with no area yet. `advance` and `render` do nothing until
    /// [`ParticleField::initialize`] is called with a non-empty size.
    pub fn new(config: FieldConfig, seed: u64) -> Self {
        Self {
            config,
            width: 0.0,
            height: 0.0,
            pointer: None,
            ambient: Vec::new(),
            bursts: Vec::new(),
            rng: Prng::new(seed),
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn is_ready(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn ambient(&self) -> &[Particle] {
        &self.ambient
    }

    pub fn bursts(&self) -> &[Particle] {
        &self.bursts
    }

    pub fn live_count(&self) -> usize {
        self.ambient.len() + self.bursts.len()
    }

    pub fn pointer(&self) -> Option<(f32, f32)> {
        self.pointer
    }

    /// (Re)size the field and replace the whole ambient population.
    ///
    /// Bursts in flight are kept; they carry no boundary handling and expire
    /// on their own.
    pub fn initialize(&mut self, width: f32, height: f32) {
        let sane = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        self.width = sane(width);
        self.height = sane(height);

        let count = self.config.ambient_count(self.width, self.height);
        self.ambient.clear();
        self.ambient.reserve(count);
        for _ in 0..count {
            let x = self.rng.range(0.0, self.width);
            let y = self.rng.range(0.0, self.height);
            self.ambient
                .push(Particle::ambient(x, y, &self.config, &mut self.rng));
        }

        tracing::debug!(
            width = self.width,
            height = self.height,
            ambient = count,
            "particle field initialized"
        );
    }

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.pointer = Some((x, y));
        }
    }

    pub fn clear_pointer(&mut self) {
        self.pointer = None;
    }

    /// Append `count` burst particles at `(x, y)`. Ambient particles are untouched.
    pub fn spawn_burst(&mut self, x: f32, y: f32, count: usize) {
        self.bursts.reserve(count);
        for _ in 0..count {
            self.bursts
                .push(Particle::burst(x, y, &self.config, &mut self.rng));
        }
    }

    /// Burst of the configured default size, as triggered by a click or tap.
    pub fn spawn_click_burst(&mut self, x: f32, y: f32) {
        self.spawn_burst(x, y, self.config.burst_count);
    }

    /// Step the simulation by `dt` reference frames.
    pub fn advance(&mut self, dt: f32) {
        if !self.is_ready() {
            return;
        }
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_STEP)
        } else {
            0.0
        };

        let cfg = &self.config;
        let (w, h) = (self.width, self.height);
        let pointer = self.pointer;

        for p in &mut self.ambient {
            p.x += p.vx * dt;
            p.y += p.vy * dt;

            p.radius = p.base_radius;
            if let Some((px, py)) = pointer {
                apply_pointer(p, px, py, cfg, dt);
            }

            match cfg.boundary {
                BoundaryStyle::Bounce => {
                    bounce(&mut p.x, &mut p.vx, w);
                    bounce(&mut p.y, &mut p.vy, h);
                }
                BoundaryStyle::Wrap => {
                    p.x = wrap(p.x, w);
                    p.y = wrap(p.y, h);
                }
            }
        }

        let friction = cfg.burst_friction.clamp(0.0, 1.0).powf(dt);
        let life_step = cfg.burst_life_step * dt;
        self.bursts.retain_mut(|p| {
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            p.vx *= friction;
            p.vy *= friction;
            match &mut p.mode {
                ParticleMode::Burst { life } => {
                    *life -= life_step;
                    *life > LIFE_RESIDUE
                }
                ParticleMode::Ambient => true,
            }
        });
    }

    /// Draw the current state. Draws nothing before the field has an area.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) -> FrameReport {
        let mut report = FrameReport::default();
        if !self.is_ready() {
            return report;
        }
        let cfg = &self.config;

        surface.clear(self.width, self.height);

        for p in &self.ambient {
            surface.fill_circle(p.x, p.y, p.radius, p.color, cfg.ambient_alpha);
        }
        for p in &self.bursts {
            let alpha = p.life().unwrap_or(1.0).clamp(0.0, 1.0);
            surface.fill_circle(p.x, p.y, p.radius, p.color, alpha);
        }
        report.discs = self.ambient.len() + self.bursts.len();

        let max_d = cfg.link_distance;
        if max_d > 0.0 {
            let max_d2 = max_d * max_d;
            for (i, a) in self.ambient.iter().enumerate() {
                for b in &self.ambient[i + 1..] {
                    let dx = a.x - b.x;
                    let dy = a.y - b.y;
                    let d2 = dx * dx + dy * dy;
                    if d2 >= max_d2 {
                        continue;
                    }
                    let alpha = (1.0 - d2.sqrt() / max_d) * cfg.link_alpha;
                    surface.stroke_line(
                        (a.x, a.y),
                        (b.x, b.y),
                        cfg.link_color,
                        alpha,
                        cfg.link_width,
                    );
                    report.links += 1;
                }
            }
        }

        if let (Some((px, py)), Some(max_d)) = (self.pointer, cfg.pointer_link_distance) {
            if max_d > 0.0 {
                for p in &self.ambient {
                    let dx = p.x - px;
                    let dy = p.y - py;
                    let d = (dx * dx + dy * dy).sqrt();
                    if d >= max_d {
                        continue;
                    }
                    let alpha = (1.0 - d / max_d) * cfg.pointer_link_alpha;
                    surface.stroke_line((px, py), (p.x, p.y), cfg.link_color, alpha, cfg.link_width);
                    report.pointer_links += 1;
                }
            }
        }

        report
    }
}

fn apply_pointer(p: &mut Particle, px: f32, py: f32, cfg: &FieldConfig, dt: f32) {
    let r = cfg.interaction_radius;
    if r <= 0.0 {
        return;
    }
    let dx = px - p.x;
    let dy = py - p.y;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance >= r {
        return;
    }

    let force = (r - distance) / r;
    p.radius = p.base_radius + force * cfg.radius_growth;

    // Direction is undefined when sitting exactly under the pointer.
    if distance <= f32::EPSILON {
        return;
    }
    let (ux, uy) = (dx / distance, dy / distance);
    let step = force * cfg.pointer_strength * dt;
    match cfg.pointer_mode {
        PointerMode::Repel => {
            p.x -= ux * step;
            p.y -= uy * step;
        }
        PointerMode::Attract => {
            // Never overshoot the pointer itself.
            let step = step.min(distance);
            p.x += ux * step;
            p.y += uy * step;
        }
    }
}

fn bounce(pos: &mut f32, vel: &mut f32, max: f32) {
    if *pos < 0.0 {
        *pos = -*pos;
        *vel = vel.abs();
    } else if *pos > max {
        *pos = 2.0 * max - *pos;
        *vel = -vel.abs();
    }
    // A reflection larger than the whole field would land outside again.
    *pos = pos.clamp(0.0, max);
}

fn wrap(pos: f32, max: f32) -> f32 {
    let wrapped = pos.rem_euclid(max);
    if wrapped.is_finite() {
        wrapped.clamp(0.0, max)
    } else {
        0.0
    }
}
