//! Wind turbine model.

use std::f64::consts::PI;

use crate::compose::{ComposeError, ModelInstanceDescriptor};
use crate::models::types::{
    interval_hours, optional_f64, require_f64, EnergyModel, ModelIo, OutputKind,
};

/// A turbine with a piecewise power curve over hub-height wind speed.
///
/// The measured wind speed is corrected to hub height with the logarithmic
/// wind profile, then mapped through the cut-in / rated / cut-out regimes.
#[derive(Debug, Clone)]
pub struct WindTurbine {
    /// Rated power (kW).
    p_rated: f64,
    /// Rated wind speed (m/s).
    u_rated: f64,
    /// Cut-in wind speed (m/s).
    u_cutin: f64,
    /// Cut-out wind speed (m/s).
    u_cutout: f64,
    /// Rotor diameter (m).
    diameter: f64,
    /// Coefficient of performance.
    cp: f64,
    /// Hub height (m).
    hub_height: f64,
    /// Wind measurement height (m).
    measurement_height: f64,
    /// Surface roughness length (m).
    roughness_length: f64,
    /// Air density (kg/m3).
    air_density: f64,
    output: OutputKind,
    interval_hr: f64,
    io: ModelIo,
}

impl WindTurbine {
    /// Builds a turbine from a resolved descriptor.
    ///
    /// # Errors
    ///
    /// The rating, geometry and height parameters are required;
    /// `roughness_length` and `air_density` have standard defaults. Both
    /// heights must exceed the roughness length for the logarithmic
    /// profile to be defined.
    pub fn from_descriptor(descriptor: &ModelInstanceDescriptor) -> Result<Self, ComposeError> {
        let parameters = &descriptor.parameters;
        let model = &descriptor.name;

        let turbine = Self {
            p_rated: require_f64(parameters, "p_rated", model)?,
            u_rated: require_f64(parameters, "u_rated", model)?,
            u_cutin: require_f64(parameters, "u_cutin", model)?,
            u_cutout: require_f64(parameters, "u_cutout", model)?,
            diameter: require_f64(parameters, "diameter", model)?,
            cp: require_f64(parameters, "cp", model)?,
            hub_height: require_f64(parameters, "hub_height", model)?,
            measurement_height: require_f64(parameters, "measurement_height", model)?,
            roughness_length: optional_f64(parameters, "roughness_length", 0.2),
            air_density: optional_f64(parameters, "air_density", 1.225),
            output: OutputKind::from_parameters(parameters, model)?,
            interval_hr: interval_hours(descriptor.step_size),
            io: ModelIo::from_descriptor(descriptor),
        };

        for (name, height) in [
            ("measurement_height", turbine.measurement_height),
            ("hub_height", turbine.hub_height),
        ] {
            if height <= turbine.roughness_length {
                return Err(ComposeError::InvalidParameter {
                    model: model.clone(),
                    name: name.to_string(),
                    message: "must be greater than roughness_length".to_string(),
                });
            }
        }

        Ok(turbine)
    }

    /// Corrects a measured wind speed to hub height.
    pub fn hub_wind_speed(&self, u: f64) -> f64 {
        u * ((self.hub_height / self.roughness_length).ln()
            / (self.measurement_height / self.roughness_length).ln())
    }

    /// Aerodynamic power below rated speed, capped at the rated output.
    fn production(&self, u_hub: f64) -> f64 {
        let radius = self.diameter / 2.0;
        let p_watts = 0.5 * self.air_density * self.cp * PI * radius.powi(2) * u_hub.powi(3);
        let p_watts = p_watts.min(self.p_rated * 1000.0);

        match self.output {
            OutputKind::Energy => (p_watts / 1000.0) * self.interval_hr,
            OutputKind::Power => p_watts / 1000.0,
        }
    }

    /// Power-curve output for a hub-height wind speed.
    fn generation(&self, u_hub: f64) -> f64 {
        if self.u_cutin <= u_hub && u_hub < self.u_rated {
            self.production(u_hub)
        } else if self.u_rated <= u_hub && u_hub <= self.u_cutout {
            match self.output {
                OutputKind::Energy => self.p_rated * self.interval_hr,
                OutputKind::Power => self.p_rated,
            }
        } else {
            0.0
        }
    }
}

impl EnergyModel for WindTurbine {
    fn model_type(&self) -> &'static str {
        "windturbine"
    }

    fn io(&self) -> &ModelIo {
        &self.io
    }

    fn io_mut(&mut self) -> &mut ModelIo {
        &mut self.io
    }

    fn step(&mut self) {
        let u = self.io.input("u");
        let u_hub = self.hub_wind_speed(u);
        self.io
            .outputs
            .insert("u_at_hub_height".to_string(), u_hub);
        self.io
            .outputs
            .insert("wind_gen".to_string(), self.generation(u_hub));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::document::parse_document;
    use crate::compose::Composition;
    use crate::registry::ModelRegistry;

    /// Baseline turbine defaults. Equal heights make the profile
    /// correction a no-op so power-curve regimes see the raw wind speed.
    const TURBINE_DEFAULTS: &str = "simulators:\n  - model_type: WindTurbine\n    Parameters:\n      p_rated: 1500\n      u_rated: 12\n      u_cutin: 3\n      u_cutout: 25\n      diameter: 80\n      cp: 0.45\n      output_type: power\n      hub_height: 10\n      measurement_height: 10\n      roughness_length: 0.1\n      air_density: 1.225";

    /// Layers a scenario document over the baseline turbine defaults and
    /// builds the turbine from the composed descriptor.
    fn turbine_with(scenario: &str) -> Result<WindTurbine, ComposeError> {
        let defaults = parse_document(TURBINE_DEFAULTS, "test").unwrap();
        let scenario = parse_document(scenario, "test").unwrap();
        let composition = Composition::compose(&defaults, &scenario, &ModelRegistry::builtin())?;
        WindTurbine::from_descriptor(&composition.models["WindTurbine_default"])
    }

    const HOURLY: &str = "simulators:\n  - model_type: WindTurbine\n    step_size: 60";

    fn generation_at(turbine: &mut WindTurbine, u: f64) -> f64 {
        turbine.io_mut().inputs.insert("u".to_string(), u);
        turbine.step();
        turbine.io().outputs["wind_gen"]
    }

    #[test]
    fn below_cutin_speed_generates_nothing() {
        let mut turbine = turbine_with(HOURLY).unwrap();
        assert_eq!(generation_at(&mut turbine, 1.0), 0.0);
    }

    #[test]
    fn generation_starts_at_cutin_speed() {
        let mut turbine = turbine_with(HOURLY).unwrap();
        assert!(generation_at(&mut turbine, 3.0) > 0.0);
    }

    #[test]
    fn below_rated_speed_stays_below_rated_power() {
        let mut turbine = turbine_with(HOURLY).unwrap();
        let generated = generation_at(&mut turbine, 8.0);
        assert!(generated > 0.0);
        assert!(generated < 1500.0);
    }

    #[test]
    fn rated_band_holds_rated_power() {
        let mut turbine = turbine_with(HOURLY).unwrap();
        assert_eq!(generation_at(&mut turbine, 12.0), 1500.0);
        assert_eq!(generation_at(&mut turbine, 20.0), 1500.0);
        assert_eq!(generation_at(&mut turbine, 25.0), 1500.0);
    }

    #[test]
    fn above_cutout_speed_generates_nothing() {
        let mut turbine = turbine_with(HOURLY).unwrap();
        assert_eq!(generation_at(&mut turbine, 30.0), 0.0);
    }

    #[test]
    fn negative_wind_speed_generates_nothing() {
        let mut turbine = turbine_with(HOURLY).unwrap();
        assert_eq!(generation_at(&mut turbine, -5.0), 0.0);
    }

    #[test]
    fn hub_height_correction_follows_the_log_profile() {
        // ln(100/0.1) / ln(10/0.1) is exactly 1.5.
        let mut turbine = turbine_with(
            "simulators:\n  - model_type: WindTurbine\n    Parameters:\n      hub_height: 100",
        )
        .unwrap();
        turbine.io_mut().inputs.insert("u".to_string(), 5.0);
        turbine.step();
        assert!((turbine.io().outputs["u_at_hub_height"] - 7.5).abs() < 1e-9);
    }

    #[test]
    fn energy_output_scales_with_the_interval() {
        let mut hourly = turbine_with(
            "simulators:\n  - model_type: WindTurbine\n    step_size: 60\n    Parameters:\n      output_type: energy",
        )
        .unwrap();
        assert_eq!(generation_at(&mut hourly, 12.0), 1500.0);

        let mut quarter = turbine_with(
            "simulators:\n  - model_type: WindTurbine\n    step_size: 15\n    Parameters:\n      output_type: energy",
        )
        .unwrap();
        assert_eq!(generation_at(&mut quarter, 12.0), 1500.0 * 0.25);
    }

    #[test]
    fn missing_required_parameter_fails_construction() {
        let scenario = parse_document(
            "simulators:\n  - model_type: WindTurbine\n    Parameters:\n      u_rated: 12\n      u_cutin: 3\n      u_cutout: 25\n      diameter: 80\n      cp: 0.45\n      output_type: power\n      hub_height: 10\n      measurement_height: 10",
            "test",
        )
        .unwrap();
        let composition = Composition::compose(
            &serde_yaml::Mapping::new(),
            &scenario,
            &ModelRegistry::builtin(),
        )
        .unwrap();
        let err = WindTurbine::from_descriptor(&composition.models["WindTurbine_default"]).unwrap_err();
        assert!(matches!(err, ComposeError::MissingParameter { ref name, .. } if name == "p_rated"));
    }

    #[test]
    fn heights_below_the_roughness_length_are_rejected() {
        let err = turbine_with(
            "simulators:\n  - model_type: WindTurbine\n    Parameters:\n      measurement_height: 0.05",
        )
        .unwrap_err();
        assert!(matches!(err, ComposeError::InvalidParameter { ref name, .. } if name == "measurement_height"));
    }
}
