//! Debug panel: named, ranged sky parameters editable at runtime.

use thiserror::Error;

use crate::sky::SkySettings;

/// Errors raised by debug parameter access.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DebugError {
    /// No parameter has this name.
    #[error("unknown debug parameter `{0}`")]
    UnknownParameter(String),
    /// Writes must be finite.
    #[error("value for `{name}` is not finite")]
    NonFinite {
        /// Parameter name.
        name: &'static str,
    },
}

/// Slider bounds and granularity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    /// Lowest value.
    pub min: f32,
    /// Highest value.
    pub max: f32,
    /// Snap increment from `min`.
    pub step: f32,
}

impl ParameterRange {
    const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    /// Clamp into range and snap to the nearest step.
    pub fn apply(&self, value: f32) -> f32 {
        let clamped = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return clamped;
        }
        let steps = ((clamped - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }
}

/// Sky parameters exposed on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkyParameter {
    /// Atmospheric haziness.
    Turbidity,
    /// Rayleigh scattering.
    Rayleigh,
    /// Mie coefficient.
    MieCoefficient,
    /// Mie anisotropy.
    MieDirectionalG,
    /// Sun position X.
    SunPositionX,
}

impl SkyParameter {
    /// Every parameter, in panel order.
    pub const ALL: [SkyParameter; 5] = [
        SkyParameter::Turbidity,
        SkyParameter::Rayleigh,
        SkyParameter::MieCoefficient,
        SkyParameter::MieDirectionalG,
        SkyParameter::SunPositionX,
    ];

    /// Stable name used by the host UI.
    pub fn name(self) -> &'static str {
        match self {
            SkyParameter::Turbidity => "turbidity",
            SkyParameter::Rayleigh => "rayleigh",
            SkyParameter::MieCoefficient => "mie_coefficient",
            SkyParameter::MieDirectionalG => "mie_directional_g",
            SkyParameter::SunPositionX => "sun_position_x",
        }
    }

    /// Look up a parameter by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Slider bounds.
    pub fn range(self) -> ParameterRange {
        match self {
            SkyParameter::Turbidity => ParameterRange::new(0.0, 20.0, 0.1),
            SkyParameter::Rayleigh => ParameterRange::new(0.0, 4.0, 0.01),
            SkyParameter::MieCoefficient => ParameterRange::new(0.0, 0.1, 0.0001),
            SkyParameter::MieDirectionalG => ParameterRange::new(0.0, 1.0, 0.001),
            SkyParameter::SunPositionX => ParameterRange::new(-1.0, 1.0, 0.001),
        }
    }

    /// Read the bound value.
    pub fn get(self, settings: &SkySettings) -> f32 {
        match self {
            SkyParameter::Turbidity => settings.turbidity,
            SkyParameter::Rayleigh => settings.rayleigh,
            SkyParameter::MieCoefficient => settings.mie_coefficient,
            SkyParameter::MieDirectionalG => settings.mie_directional_g,
            SkyParameter::SunPositionX => settings.sun_position.x,
        }
    }

    fn field(self, settings: &mut SkySettings) -> &mut f32 {
        match self {
            SkyParameter::Turbidity => &mut settings.turbidity,
            SkyParameter::Rayleigh => &mut settings.rayleigh,
            SkyParameter::MieCoefficient => &mut settings.mie_coefficient,
            SkyParameter::MieDirectionalG => &mut settings.mie_directional_g,
            SkyParameter::SunPositionX => &mut settings.sun_position.x,
        }
    }

    /// Clamp, snap and store. Returns the stored value.
    pub fn set(self, settings: &mut SkySettings, value: f32) -> Result<f32, DebugError> {
        if !value.is_finite() {
            return Err(DebugError::NonFinite { name: self.name() });
        }
        let value = self.range().apply(value);
        *self.field(settings) = value;
        Ok(value)
    }
}

/// Name-addressed view over the sky parameters.
#[derive(Debug, Clone)]
pub struct DebugPanel {
    /// Whether the host should show the panel.
    pub visible: bool,
    parameters: Vec<SkyParameter>,
}

impl Default for DebugPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugPanel {
    /// Panel with every sky parameter.
    pub fn new() -> Self {
        Self {
            visible: true,
            parameters: SkyParameter::ALL.to_vec(),
        }
    }

    /// Parameters in panel order.
    pub fn parameters(&self) -> &[SkyParameter] {
        &self.parameters
    }

    /// Parameter names in panel order.
    pub fn names(&self) -> Vec<&'static str> {
        self.parameters.iter().map(|p| p.name()).collect()
    }

    fn lookup(&self, name: &str) -> Result<SkyParameter, DebugError> {
        self.parameters
            .iter()
            .copied()
            .find(|p| p.name() == name)
            .ok_or_else(|| DebugError::UnknownParameter(name.to_owned()))
    }

    /// Read a parameter by name.
    pub fn get(&self, settings: &SkySettings, name: &str) -> Result<f32, DebugError> {
        Ok(self.lookup(name)?.get(settings))
    }

    /// Write a parameter by name. Returns the stored value.
    pub fn set(&self, settings: &mut SkySettings, name: &str, value: f32) -> Result<f32, DebugError> {
        let parameter = self.lookup(name)?;
        let stored = parameter.set(settings, value)?;
        log::debug!("Debug parameter {} = {}", name, stored);
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for p in SkyParameter::ALL {
            assert_eq!(SkyParameter::from_name(p.name()), Some(p));
        }
        assert_eq!(SkyParameter::from_name("exposure"), None);
        assert_eq!(DebugPanel::new().names().len(), 5);
    }

    #[test]
    fn test_defaults_within_ranges() {
        let settings = SkySettings::default();
        for p in SkyParameter::ALL {
            let range = p.range();
            let v = p.get(&settings);
            assert!(v >= range.min && v <= range.max, "{}", p.name());
        }
    }

    #[test]
    fn test_set_clamps() {
        let panel = DebugPanel::new();
        let mut settings = SkySettings::default();
        assert_eq!(panel.set(&mut settings, "turbidity", 50.0), Ok(20.0));
        assert_eq!(settings.turbidity, 20.0);
        assert_eq!(panel.set(&mut settings, "sun_position_x", -3.0), Ok(-1.0));
        assert_eq!(settings.sun_position.x, -1.0);
    }

    #[test]
    fn test_set_snaps_to_step() {
        let panel = DebugPanel::new();
        let mut settings = SkySettings::default();
        let stored = panel.set(&mut settings, "rayleigh", 1.234_9).unwrap();
        assert!((stored - 1.23).abs() < 1e-5);
        let stored = panel.set(&mut settings, "mie_coefficient", 0.012_34).unwrap();
        assert!((stored - 0.0123).abs() < 1e-6);
        assert!((settings.mie_coefficient - 0.0123).abs() < 1e-6);
    }

    #[test]
    fn test_write_reaches_sky_terms() {
        let panel = DebugPanel::new();
        let mut settings = SkySettings::default();
        let before = settings.terms().beta_m;
        panel.set(&mut settings, "turbidity", 2.0).unwrap();
        assert!(settings.terms().beta_m[0] < before[0]);
    }

    #[test]
    fn test_errors() {
        let panel = DebugPanel::new();
        let mut settings = SkySettings::default();
        assert_eq!(
            panel.set(&mut settings, "nope", 1.0),
            Err(DebugError::UnknownParameter("nope".to_owned()))
        );
        assert_eq!(
            panel.set(&mut settings, "rayleigh", f32::NAN),
            Err(DebugError::NonFinite { name: "rayleigh" })
        );
        assert_eq!(settings.rayleigh, 3.0);
        assert!(panel.get(&settings, "nope").is_err());
    }
}
