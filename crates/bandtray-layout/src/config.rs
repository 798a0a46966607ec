#![forbid(unsafe_code)]

//! Tray configuration.

use bandtray_core::geometry::Orientation;
use serde::{Deserialize, Serialize};

use crate::error::TrayConfigError;

/// Default swap dead zone: none, so a pointer resting exactly on the
/// boundary between two toolbars may swap them back and forth.
pub const TRAY_DEFAULT_SWAP_DEAD_ZONE: f64 = 0.0;

/// Behavior knobs for a [`Tray`](crate::Tray).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrayConfig {
    #[serde(default)]
    pub orientation: Orientation,
    /// When set, no toolbar in the tray can be dragged.
    #[serde(default)]
    pub locked: bool,
    /// Distance the pointer must travel past a neighbor's edge before a
    /// same-band swap fires. Non-zero values add hysteresis.
    #[serde(default)]
    pub swap_dead_zone: f64,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            locked: false,
            swap_dead_zone: TRAY_DEFAULT_SWAP_DEAD_ZONE,
        }
    }
}

impl TrayConfig {
    pub fn new(
        orientation: Orientation,
        locked: bool,
        swap_dead_zone: f64,
    ) -> Result<Self, TrayConfigError> {
        let config = Self {
            orientation,
            locked,
            swap_dead_zone,
        };
        config.validate()?;
        Ok(config)
    }

    /// Horizontal, unlocked, no dead zone.
    #[must_use]
    pub fn horizontal() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn vertical() -> Self {
        Self {
            orientation: Orientation::Vertical,
            ..Self::default()
        }
    }

    pub fn validate(self) -> Result<(), TrayConfigError> {
        if !self.swap_dead_zone.is_finite() || self.swap_dead_zone < 0.0 {
            return Err(TrayConfigError::InvalidDeadZone {
                value: self.swap_dead_zone,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_dead_zone() {
        let config = TrayConfig::default();
        assert_eq!(config.swap_dead_zone, 0.0);
        assert!(!config.locked);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_negative_dead_zone() {
        assert_eq!(
            TrayConfig::new(Orientation::Vertical, false, -1.0),
            Err(TrayConfigError::InvalidDeadZone { value: -1.0 })
        );
        assert!(TrayConfig::new(Orientation::Vertical, false, f64::NAN).is_err());
    }

    #[test]
    fn json_round_trip_and_defaults() {
        let config = TrayConfig::new(Orientation::Vertical, true, 2.5).expect("valid");
        let json = serde_json::to_string(&config).expect("serialize");
        let back: TrayConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, config);

        let sparse: TrayConfig = serde_json::from_str(r#"{"orientation":"vertical"}"#)
            .expect("missing fields default");
        assert_eq!(sparse, TrayConfig::vertical());
    }
}
