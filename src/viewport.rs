//! Zoom level of the viewer

use crate::anchor::check_scale;
use crate::config::ViewerConfig;
use crate::error::Result;

/// Current render scale, clamped to configured bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    scale: f64,
    min: f64,
    max: f64,
    step: f64,
}

impl Zoom {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            scale: config.default_scale.clamp(config.min_scale, config.max_scale),
            min: config.min_scale,
            max: config.max_scale,
            step: config.scale_step,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Scale as a whole percentage, for display
    pub fn percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }

    /// Set an explicit scale, clamped to the bounds.
    ///
    /// The value is kept as given so it matches the renderer's scale exactly.
    pub fn set_scale(&mut self, scale: f64) -> Result<f64> {
        let scale = check_scale(scale)?;
        self.scale = scale.clamp(self.min, self.max);
        Ok(self.scale)
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.step_by(self.step)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.step_by(-self.step)
    }

    fn step_by(&mut self, delta: f64) -> f64 {
        // Clamp after rounding: a bound finer than a hundredth must still hold.
        self.scale = round_hundredths(self.scale + delta).clamp(self.min, self.max);
        self.scale
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

// Repeated 0.1 steps otherwise drift (1.0 + 0.1 + 0.1 = 1.2000000000000002).
fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnnotatorError;

    #[test]
    fn test_steps_without_drift() {
        let mut zoom = Zoom::default();
        assert_eq!(zoom.scale(), 1.0);
        zoom.zoom_in();
        zoom.zoom_in();
        assert_eq!(zoom.scale(), 1.2);
        assert_eq!(zoom.percent(), 120);
        zoom.zoom_out();
        assert_eq!(zoom.scale(), 1.1);
    }

    #[test]
    fn test_clamps_to_bounds() {
        let mut zoom = Zoom::default();
        for _ in 0..30 {
            zoom.zoom_in();
        }
        assert_eq!(zoom.scale(), 2.0);
        for _ in 0..30 {
            zoom.zoom_out();
        }
        assert_eq!(zoom.scale(), 0.5);

        assert_eq!(zoom.set_scale(9.0).unwrap(), 2.0);
        assert_eq!(zoom.set_scale(0.01).unwrap(), 0.5);
    }

    #[test]
    fn test_explicit_scale_is_exact() {
        let mut zoom = Zoom::default();
        assert_eq!(zoom.set_scale(1.333).unwrap(), 1.333);
        assert_eq!(zoom.scale(), 1.333);
        assert_eq!(zoom.percent(), 133);

        // Stepping snaps back onto the hundredths grid.
        assert_eq!(zoom.zoom_in(), 1.43);
    }

    #[test]
    fn test_fine_lower_bound_never_reaches_zero() {
        let config = ViewerConfig {
            min_scale: 0.004,
            default_scale: 0.01,
            ..ViewerConfig::default()
        };
        let mut zoom = Zoom::new(&config);

        assert_eq!(zoom.zoom_out(), 0.004);
        assert_eq!(zoom.zoom_out(), 0.004);
        assert!(check_scale(zoom.scale()).is_ok());
    }

    #[test]
    fn test_rejects_invalid_scale() {
        let mut zoom = Zoom::default();
        assert!(matches!(
            zoom.set_scale(f64::NAN),
            Err(AnnotatorError::InvalidScale(_))
        ));
        assert!(zoom.set_scale(-1.0).is_err());
        assert_eq!(zoom.scale(), 1.0);
    }
}
