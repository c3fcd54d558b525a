//! Volume control
//!
//! Maps the 0-100 level shown to users onto the normalized gain handed to the
//! audio engine. The linear curve matches what media elements expect; the
//! logarithmic curve maps 0-100% onto -60 dB..0 dB.

use crate::types::VolumeCurve;

/// Volume controller
#[derive(Debug, Clone)]
pub struct Volume {
    /// Volume level (0-100)
    level: u8,

    /// Mute state (preserves volume level)
    muted: bool,

    /// Level-to-gain mapping
    curve: VolumeCurve,

    /// Cached gain for `level`
    gain: f32,
}

impl Volume {
    /// Create new volume controller
    ///
    /// # Arguments
    /// * `level` - Initial volume (clamped to 0-100)
    /// * `curve` - Level-to-gain mapping
    pub fn new(level: u8, curve: VolumeCurve) -> Self {
        let level = level.min(100);
        Self {
            level,
            muted: false,
            curve,
            gain: Self::calculate_gain(level, curve),
        }
    }

    /// Set volume level (clamped to 0-100)
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(100);
        self.gain = Self::calculate_gain(self.level, self.curve);
    }

    /// Get current volume level (0-100)
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Mute audio (preserves volume level)
    pub fn mute(&mut self) {
        self.muted = true;
    }

    /// Unmute audio (restores previous volume)
    pub fn unmute(&mut self) {
        self.muted = false;
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Gain to hand to the engine (0.0 when muted)
    pub fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.gain
        }
    }

    /// Convert volume percentage to gain
    ///
    /// Logarithmic formula: gain = 10^((level% - 100) * 0.6 / 20)
    /// - 0%   → silence
    /// - 50%  → -30 dB → 0.0316 gain
    /// - 100% →   0 dB → 1.0 gain
    fn calculate_gain(level: u8, curve: VolumeCurve) -> f32 {
        if level == 0 {
            return 0.0;
        }

        match curve {
            VolumeCurve::Linear => f32::from(level) / 100.0,
            VolumeCurve::Logarithmic => {
                let db = (f32::from(level) - 100.0) * 0.6;
                10.0_f32.powf(db / 20.0)
            }
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(80, VolumeCurve::Linear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_volume_level_clamps() {
        let mut vol = Volume::new(50, VolumeCurve::Linear);
        assert_eq!(vol.level(), 50);

        vol.set_level(75);
        assert_eq!(vol.level(), 75);

        vol.set_level(150);
        assert_eq!(vol.level(), 100);

        assert_eq!(Volume::new(200, VolumeCurve::Linear).level(), 100);
    }

    #[test]
    fn linear_gain_is_normalized_level() {
        assert_eq!(Volume::new(0, VolumeCurve::Linear).gain(), 0.0);
        assert!((Volume::new(40, VolumeCurve::Linear).gain() - 0.4).abs() < 1e-6);
        assert!((Volume::new(100, VolumeCurve::Linear).gain() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn logarithmic_gain_calculation() {
        assert_eq!(Volume::new(0, VolumeCurve::Logarithmic).gain(), 0.0);
        assert!((Volume::new(100, VolumeCurve::Logarithmic).gain() - 1.0).abs() < 0.001);
        assert!((Volume::new(50, VolumeCurve::Logarithmic).gain() - 0.0316).abs() < 0.001);
        assert!((Volume::new(80, VolumeCurve::Logarithmic).gain() - 0.251).abs() < 0.01);
    }

    #[test]
    fn mute_preserves_level() {
        let mut vol = Volume::new(80, VolumeCurve::Linear);
        vol.mute();
        assert!(vol.is_muted());
        assert_eq!(vol.gain(), 0.0);
        assert_eq!(vol.level(), 80);

        vol.toggle_mute();
        assert!(!vol.is_muted());
        assert!((vol.gain() - 0.8).abs() < 1e-6);
    }
}
