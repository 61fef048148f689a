//! Proximity zoom: maps a card's distance from the viewport center to a scale

use crate::config::CarouselConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityScaler {
    trigger_distance: f64,
    min_scale: f64,
}

impl Default for ProximityScaler {
    fn default() -> Self {
        Self::from_config(&CarouselConfig::default())
    }
}

impl ProximityScaler {
    pub fn new(trigger_distance: f64, min_scale: f64) -> Self {
        Self {
            trigger_distance,
            min_scale,
        }
    }

    pub fn from_config(config: &CarouselConfig) -> Self {
        Self::new(config.trigger_distance, config.min_scale)
    }

    /// Scale factor for a card `distance` units away from the center.
    ///
    /// Linear from 1.0 at the center down to `min_scale` at the trigger
    /// distance, clamped to `min_scale` beyond it.
    pub fn scale(&self, distance: f64) -> f64 {
        let distance = distance.abs();
        if self.trigger_distance <= 0.0 {
            return if distance == 0.0 { 1.0 } else { self.min_scale };
        }
        if distance >= self.trigger_distance {
            return self.min_scale;
        }
        let t = distance / self.trigger_distance;
        1.0 - (1.0 - self.min_scale) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_scale_endpoints() {
        let scaler = ProximityScaler::default();
        assert!(approx(scaler.scale(0.0), 1.0));
        assert!(approx(scaler.scale(150.0), 0.9));
        assert!(approx(scaler.scale(300.0), 0.8));
        assert!(approx(scaler.scale(1_000.0), 0.8));
    }

    #[test]
    fn test_scale_uses_absolute_distance() {
        let scaler = ProximityScaler::default();
        assert!(approx(scaler.scale(-150.0), scaler.scale(150.0)));
    }

    #[test]
    fn test_scale_monotonic() {
        let scaler = ProximityScaler::default();
        let mut prev = scaler.scale(0.0);
        for i in 1..=400 {
            let v = scaler.scale(i as f64);
            assert!(v <= prev, "not monotonic at d={}", i);
            prev = v;
        }
    }

    #[test]
    fn test_degenerate_trigger() {
        let scaler = ProximityScaler::new(0.0, 0.5);
        assert!(approx(scaler.scale(0.0), 1.0));
        assert!(approx(scaler.scale(0.1), 0.5));
    }
}
