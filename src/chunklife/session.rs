//! A driver-side session: one world plus the viewport, speed and engine
//! state an interactive front end keeps around it.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::chunk::Chunk;
use super::coord::ChunkCoord;
use super::engine::{GenerationEngine, StepStats};
use super::error::{LifeError, LifeResult};
use super::pattern::{PatternMeta, load_pattern, save_pattern};
use super::viewport::{SpeedLevel, Viewport};
use super::world::World;

pub const MAX_PRECOMPUTE_ROUNDS: u64 = 1000;
const DEFAULT_SCREEN_WIDTH: i64 = 80;
const DEFAULT_SCREEN_HEIGHT: i64 = 24;

/// Configuration for a `LifeSession`.
///
/// Use `LifeConfig::default()` or customise via the builder methods; TOML
/// files use the same field names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LifeConfig {
    /// Generations to run before handing the world to the front end.
    /// `None` means no precompute.
    pub precompute_rounds: Option<u64>,
    /// Initial playback speed.
    pub speed: SpeedLevel,
    /// Visible window size in cells, used to recenter after a load.
    pub screen_width: i64,
    pub screen_height: i64,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            precompute_rounds: None,
            speed: SpeedLevel::default(),
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
        }
    }
}

impl LifeConfig {
    pub fn precompute_rounds(mut self, rounds: u64) -> Self {
        self.precompute_rounds = Some(rounds);
        self
    }

    pub fn speed(mut self, level: SpeedLevel) -> Self {
        self.speed = level;
        self
    }

    pub fn screen(mut self, width: i64, height: i64) -> Self {
        self.screen_width = width.max(1);
        self.screen_height = height.max(1);
        self
    }

    pub fn validate(&self) -> LifeResult<()> {
        match self.precompute_rounds {
            Some(rounds) if !(1..=MAX_PRECOMPUTE_ROUNDS).contains(&rounds) => {
                Err(LifeError::InvalidRounds(rounds))
            }
            _ => Ok(()),
        }
    }

    pub fn from_toml_str(text: &str) -> LifeResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> LifeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LifeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

pub struct LifeSession {
    world: World,
    engine: GenerationEngine,
    viewport: Viewport,
    speed: SpeedLevel,
    config: LifeConfig,
}

impl LifeSession {
    pub fn new(config: LifeConfig) -> LifeResult<Self> {
        config.validate()?;
        Ok(Self {
            world: World::new(),
            engine: GenerationEngine::new(),
            viewport: Viewport::default(),
            speed: config.speed,
            config,
        })
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    #[inline]
    pub fn speed(&self) -> SpeedLevel {
        self.speed
    }

    pub fn adjust_speed(&mut self, delta: i64) -> SpeedLevel {
        self.speed = self.speed.adjust(delta);
        self.speed
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.engine.generation()
    }

    pub fn config(&self) -> &LifeConfig {
        &self.config
    }

    pub fn step(&mut self) -> LifeResult<StepStats> {
        self.engine.step(&mut self.world)
    }

    pub fn step_n(&mut self, n: u64) -> LifeResult<()> {
        self.engine.step_n(&mut self.world, n)
    }

    /// Run the configured precompute rounds. Returns how many ran.
    pub fn precompute(&mut self) -> LifeResult<u64> {
        let rounds = self.config.precompute_rounds.unwrap_or(0);
        if rounds > 0 {
            info!(rounds, "precomputing generations");
            self.step_n(rounds)?;
        }
        Ok(rounds)
    }

    /// Existing chunks under the current viewport.
    pub fn visible_chunks(&self) -> Vec<(ChunkCoord, &Chunk)> {
        let (min_x, min_y, max_x, max_y) = self
            .viewport
            .world_rect(self.config.screen_width, self.config.screen_height);
        self.world.chunks_in_rect(min_x, min_y, max_x, max_y)
    }

    pub fn metadata(&self) -> PatternMeta {
        PatternMeta {
            viewport: Some((self.viewport.x, self.viewport.y)),
            speed: Some(self.speed.get() as i64),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> LifeResult<()> {
        save_pattern(&self.world, &self.metadata(), path)
    }

    /// Replace the world with a pattern file.
    ///
    /// The file is read and parsed before anything changes, so an unreadable
    /// or malformed file leaves the session untouched. Missing speed falls
    /// back to the default level; a missing viewport recenters on the
    /// live-cell centroid.
    pub fn load(&mut self, path: impl AsRef<Path>) -> LifeResult<u64> {
        let pattern = load_pattern(path)?;
        let live = pattern.apply(&mut self.world)?;
        self.engine = GenerationEngine::new();

        self.speed = match pattern.meta.speed {
            Some(raw) => SpeedLevel::new(raw).unwrap_or_else(|_| {
                warn!(speed = raw, "speed out of range in pattern, clamping");
                SpeedLevel::clamped(raw)
            }),
            None => SpeedLevel::default(),
        };

        match pattern.meta.viewport {
            Some((x, y)) => self.viewport = Viewport::new(x, y),
            None => {
                if let Some(view) = Viewport::recentered(
                    &self.world,
                    self.config.screen_width,
                    self.config.screen_height,
                ) {
                    self.viewport = view;
                }
            }
        }
        Ok(live)
    }

    pub fn clear(&mut self) {
        self.world.clear();
        self.engine = GenerationEngine::new();
    }

    /// Fill a rectangle with random cells at density 1/3.
    pub fn randomize<R: Rng + ?Sized>(
        &mut self,
        x: i64,
        y: i64,
        width: u32,
        height: u32,
        rng: &mut R,
    ) -> LifeResult<u64> {
        let born = self.world.randomize_region(x, y, width, height, rng)?;
        info!(x, y, width, height, born, "random cells generated");
        Ok(born)
    }
}
