//! Aggregate household load model.

use crate::compose::{ComposeError, ModelInstanceDescriptor};
use crate::models::types::{interval_hours, require_f64, EnergyModel, ModelIo, OutputKind};

/// Scales a per-household load to a total demand.
///
/// The `load` input is energy per household per time interval; the output
/// is reported as interval energy or as average power over the interval,
/// depending on `output_type`.
#[derive(Debug, Clone)]
pub struct Household {
    houses: f64,
    output: OutputKind,
    interval_hr: f64,
    io: ModelIo,
}

impl Household {
    /// Creates a household load from typed parameters.
    pub fn new(houses: f64, output: OutputKind, step_size: u32, io: ModelIo) -> Self {
        Self {
            houses,
            output,
            interval_hr: interval_hours(step_size),
            io,
        }
    }

    /// Builds a household load from a resolved descriptor.
    ///
    /// # Errors
    ///
    /// `houses` and `output_type` are required parameters.
    pub fn from_descriptor(descriptor: &ModelInstanceDescriptor) -> Result<Self, ComposeError> {
        let parameters = &descriptor.parameters;
        let model = &descriptor.name;
        Ok(Self::new(
            require_f64(parameters, "houses", model)?,
            OutputKind::from_parameters(parameters, model)?,
            descriptor.step_size,
            ModelIo::from_descriptor(descriptor),
        ))
    }
}

impl EnergyModel for Household {
    fn model_type(&self) -> &'static str {
        "household"
    }

    fn io(&self) -> &ModelIo {
        &self.io
    }

    fn io_mut(&mut self) -> &mut ModelIo {
        &mut self.io
    }

    fn step(&mut self) {
        let total_energy = self.io.input("load") * self.houses;
        let demand = match self.output {
            OutputKind::Energy => total_energy,
            OutputKind::Power => total_energy / self.interval_hr,
        };
        self.io.outputs.insert("load_dem".to_string(), demand);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn household(houses: f64, output: OutputKind, step_size: u32) -> Household {
        Household::new(houses, output, step_size, ModelIo::default())
    }

    fn demand_for_load(model: &mut Household, load: f64) -> f64 {
        model.io_mut().inputs.insert("load".to_string(), load);
        model.step();
        model.io().outputs["load_dem"]
    }

    #[test]
    fn energy_output_scales_by_house_count() {
        let mut model = household(10.0, OutputKind::Energy, 15);
        for _ in 0..5 {
            assert_eq!(demand_for_load(&mut model, 2.0), 20.0);
        }
    }

    #[test]
    fn power_output_divides_by_the_interval() {
        // 15 minutes is a quarter hour: 1.5 kWh * 10 houses over 0.25 h.
        let mut model = household(10.0, OutputKind::Power, 15);
        assert_eq!(demand_for_load(&mut model, 1.5), 60.0);
    }

    #[test]
    fn variable_loads_track_the_input() {
        let mut model = household(10.0, OutputKind::Energy, 15);
        for load in [1.0, 2.0, 3.0, 4.0] {
            assert_eq!(demand_for_load(&mut model, load), load * 10.0);
        }
    }

    #[test]
    fn zero_houses_demand_nothing() {
        let mut model = household(0.0, OutputKind::Energy, 15);
        assert_eq!(demand_for_load(&mut model, 2.0), 0.0);
    }
}
