//! Grid pitch and snapping of coordinates and sizes to it.

use serde::{Deserialize, Serialize};

/// Grid pitch used when nothing has been configured yet.
pub const DEFAULT_GRID_PITCH: i32 = 50;
/// Smallest pitch the slider allows.
pub const MIN_GRID_PITCH: i32 = 20;
/// Largest pitch the slider allows.
pub const MAX_GRID_PITCH: i32 = 100;

/// Pixel size of one snap cell, always within
/// [`MIN_GRID_PITCH`]..=[`MAX_GRID_PITCH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct GridPitch(i32);

impl GridPitch {
    /// Create a pitch, clamping out-of-range values.
    pub fn new(pitch: i32) -> Self {
        Self(pitch.clamp(MIN_GRID_PITCH, MAX_GRID_PITCH))
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Default for GridPitch {
    fn default() -> Self {
        Self(DEFAULT_GRID_PITCH)
    }
}

impl From<i32> for GridPitch {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl From<GridPitch> for i32 {
    fn from(pitch: GridPitch) -> Self {
        pitch.0
    }
}

/// Nearest multiple of `pitch` to `value`, ties rounding up.
pub fn snap(value: f64, pitch: i32) -> i32 {
    let pitch = pitch.max(1);
    let cells = (value / pitch as f64 + 0.5).floor() as i32;
    cells * pitch
}

/// Largest multiple of `pitch` that is `<= value`.
pub fn snap_down(value: i32, pitch: i32) -> i32 {
    let pitch = pitch.max(1);
    value.div_euclid(pitch) * pitch
}

/// Snap a size, never going below one grid cell.
pub fn snap_size(value: f64, pitch: i32) -> i32 {
    snap(value, pitch).max(pitch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_round_half_up() {
        assert_eq!(snap(25.0, 50), 50);
        assert_eq!(snap(24.9, 50), 0);
        assert_eq!(snap(-25.0, 50), 0);
        assert_eq!(snap(-25.1, 50), -50);
    }

    #[test]
    fn test_snap_is_multiple_of_pitch() {
        for pitch in [MIN_GRID_PITCH, 33, DEFAULT_GRID_PITCH, 77, MAX_GRID_PITCH] {
            let mut value = -1234.5;
            while value < 1234.5 {
                assert_eq!(snap(value, pitch) % pitch, 0, "value {value} pitch {pitch}");
                value += 7.3;
            }
        }
    }

    #[test]
    fn test_snap_down() {
        assert_eq!(snap_down(1049, 50), 1000);
        assert_eq!(snap_down(1050, 50), 1050);
        assert_eq!(snap_down(-1, 50), -50);
    }

    #[test]
    fn test_snap_size_minimum_one_cell() {
        assert_eq!(snap_size(10.0, 50), 50);
        assert_eq!(snap_size(-80.0, 50), 50);
        assert_eq!(snap_size(130.0, 50), 150);
    }

    #[test]
    fn test_grid_pitch_clamped() {
        assert_eq!(GridPitch::new(5).get(), MIN_GRID_PITCH);
        assert_eq!(GridPitch::new(500).get(), MAX_GRID_PITCH);
        assert_eq!(GridPitch::new(60).get(), 60);
        assert_eq!(GridPitch::default().get(), DEFAULT_GRID_PITCH);
    }

    #[test]
    fn test_grid_pitch_serde_transparent() {
        let pitch: GridPitch = serde_json::from_str("70").unwrap();
        assert_eq!(pitch.get(), 70);
        assert_eq!(serde_json::to_string(&pitch).unwrap(), "70");
        let clamped: GridPitch = serde_json::from_str("1").unwrap();
        assert_eq!(clamped.get(), MIN_GRID_PITCH);
    }
}
