//! Viewport position and playback speed handed to an external renderer.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{LifeError, LifeResult};
use super::world::World;

pub const MIN_SPEED_LEVEL: u8 = 1;
pub const MAX_SPEED_LEVEL: u8 = 10;
pub const DEFAULT_SPEED_LEVEL: u8 = 5;

/// Floor on the frame interval at the fastest levels.
const MIN_FRAME_MILLIS: u64 = 10;

/// Playback speed in `1..=10`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct SpeedLevel(u8);

impl Default for SpeedLevel {
    fn default() -> Self {
        Self(DEFAULT_SPEED_LEVEL)
    }
}

impl TryFrom<i64> for SpeedLevel {
    type Error = LifeError;

    fn try_from(level: i64) -> LifeResult<Self> {
        Self::new(level)
    }
}

impl From<SpeedLevel> for i64 {
    fn from(level: SpeedLevel) -> i64 {
        level.0 as i64
    }
}

impl SpeedLevel {
    pub fn new(level: i64) -> LifeResult<Self> {
        if (MIN_SPEED_LEVEL as i64..=MAX_SPEED_LEVEL as i64).contains(&level) {
            Ok(Self(level as u8))
        } else {
            Err(LifeError::InvalidSpeed(level))
        }
    }

    /// Nearest valid level.
    pub fn clamped(level: i64) -> Self {
        Self(level.clamp(MIN_SPEED_LEVEL as i64, MAX_SPEED_LEVEL as i64) as u8)
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Move by `delta` levels, saturating at the range ends.
    pub fn adjust(self, delta: i64) -> Self {
        Self::clamped((self.0 as i64).saturating_add(delta))
    }

    pub fn can_speed_up(self) -> bool {
        self.0 < MAX_SPEED_LEVEL
    }

    pub fn can_slow_down(self) -> bool {
        self.0 > MIN_SPEED_LEVEL
    }

    /// Target time between generations: `1000 / (2 * level)` ms, at least
    /// 10 ms.
    pub fn frame_interval(self) -> Duration {
        let millis = 1000 / (2 * self.0 as u64);
        Duration::from_millis(millis.max(MIN_FRAME_MILLIS))
    }
}

/// Top-left world coordinate of the visible window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: i64,
    pub y: i64,
}

impl Viewport {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Viewport of `width`×`height` whose center is `center`.
    pub fn centered_on(center: (i64, i64), width: i64, height: i64) -> Self {
        Self {
            x: center.0.saturating_sub(width / 2),
            y: center.1.saturating_sub(height / 2),
        }
    }

    /// Center a `width`×`height` window on the live-cell centroid, or `None`
    /// for an empty world.
    pub fn recentered(world: &World, width: i64, height: i64) -> Option<Self> {
        world
            .centroid()
            .map(|center| Self::centered_on(center, width, height))
    }

    pub fn pan(&mut self, dx: i64, dy: i64) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }

    /// Inclusive world rectangle covered by a `width`×`height` window,
    /// as `(min_x, min_y, max_x, max_y)`.
    pub fn world_rect(self, width: i64, height: i64) -> (i64, i64, i64, i64) {
        (
            self.x,
            self.y,
            self.x.saturating_add(width.max(1) - 1),
            self.y.saturating_add(height.max(1) - 1),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{SpeedLevel, Viewport};
    use crate::chunklife::world::World;

    #[test]
    fn speed_bounds_are_enforced() {
        assert!(SpeedLevel::new(0).is_err());
        assert!(SpeedLevel::new(11).is_err());
        assert_eq!(SpeedLevel::new(7).unwrap().get(), 7);
        assert_eq!(SpeedLevel::default().get(), 5);
        assert_eq!(SpeedLevel::clamped(-3).get(), 1);
        assert_eq!(SpeedLevel::clamped(99).get(), 10);
    }

    #[test]
    fn adjust_saturates() {
        let top = SpeedLevel::new(10).unwrap();
        assert_eq!(top.adjust(1), top);
        assert!(!top.can_speed_up());
        let bottom = SpeedLevel::new(1).unwrap();
        assert_eq!(bottom.adjust(-1), bottom);
        assert!(!bottom.can_slow_down());
        assert_eq!(bottom.adjust(3).get(), 4);
    }

    #[test]
    fn frame_interval_has_floor() {
        assert_eq!(SpeedLevel::new(1).unwrap().frame_interval(), Duration::from_millis(500));
        assert_eq!(SpeedLevel::new(5).unwrap().frame_interval(), Duration::from_millis(100));
        assert_eq!(SpeedLevel::new(10).unwrap().frame_interval(), Duration::from_millis(50));
    }

    #[test]
    fn recentering_uses_centroid() {
        let mut world = World::new();
        assert_eq!(Viewport::recentered(&world, 80, 24), None);
        world.set_cells_alive([(100, 50), (102, 50)]).unwrap();
        assert_eq!(
            Viewport::recentered(&world, 80, 24),
            Some(Viewport::new(61, 38))
        );
    }

    #[test]
    fn world_rect_is_inclusive() {
        let view = Viewport::new(-5, 10);
        assert_eq!(view.world_rect(80, 24), (-5, 10, 74, 33));
    }
}
