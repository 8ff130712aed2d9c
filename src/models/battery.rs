//! Battery storage model.

use crate::compose::{ComposeError, ModelInstanceDescriptor};
use crate::models::types::{require_f64, EnergyModel, ModelIo};

/// A battery that turns a requested power flow into an effective one.
///
/// Positive flow charges, negative flow discharges. The effective flow is
/// the request clamped first to the charge or discharge power limit, then
/// to whatever would land the state of charge exactly on its configured
/// window.
///
/// The `soc` state is configured as a fraction of capacity and held
/// internally in absolute energy units.
#[derive(Debug, Clone)]
pub struct Battery {
    /// Maximum charging power (kW).
    charge_power_max: f64,
    /// Maximum discharging power (kW, positive magnitude).
    discharge_power_max: f64,
    /// Lower state-of-charge bound (fraction).
    soc_min: f64,
    /// Upper state-of-charge bound (fraction).
    soc_max: f64,
    /// Capacity (kWh).
    capacity: f64,
    io: ModelIo,
}

impl Battery {
    /// Creates a battery from typed parameters and a seeded attribute
    /// surface whose `soc` state is a fraction of capacity.
    pub fn new(
        charge_power_max: f64,
        discharge_power_max: f64,
        soc_min: f64,
        soc_max: f64,
        capacity: f64,
        mut io: ModelIo,
    ) -> Self {
        let soc_fraction = io.states.get("soc").copied().unwrap_or(0.0);
        io.states.insert("soc".to_string(), soc_fraction * capacity);
        Self {
            charge_power_max,
            discharge_power_max,
            soc_min,
            soc_max,
            capacity,
            io,
        }
    }

    /// Builds a battery from a resolved descriptor.
    ///
    /// # Errors
    ///
    /// All five parameters are required; a missing or non-numeric one is a
    /// construction error.
    pub fn from_descriptor(descriptor: &ModelInstanceDescriptor) -> Result<Self, ComposeError> {
        let parameters = &descriptor.parameters;
        let model = &descriptor.name;
        Ok(Self::new(
            require_f64(parameters, "charge_power_max", model)?,
            require_f64(parameters, "discharge_power_max", model)?,
            require_f64(parameters, "soc_min", model)?,
            require_f64(parameters, "soc_max", model)?,
            require_f64(parameters, "capacity", model)?,
            ModelIo::from_descriptor(descriptor),
        ))
    }

    /// Current state of charge in absolute energy units.
    pub fn soc(&self) -> f64 {
        self.io.states.get("soc").copied().unwrap_or(0.0)
    }
}

impl EnergyModel for Battery {
    fn model_type(&self) -> &'static str {
        "battery"
    }

    fn io(&self) -> &ModelIo {
        &self.io
    }

    fn io_mut(&mut self) -> &mut ModelIo {
        &mut self.io
    }

    fn step(&mut self) {
        let requested = self.io.input("requested_power_flow");
        let soc_fraction = self.soc() / self.capacity;

        let effective = if requested > 0.0 {
            let mut flow = requested.min(self.charge_power_max);
            if soc_fraction + flow / self.capacity > self.soc_max {
                flow = (self.soc_max - soc_fraction) * self.capacity;
            }
            flow
        } else if requested < 0.0 {
            let mut flow = requested.max(-self.discharge_power_max);
            if soc_fraction + flow / self.capacity < self.soc_min {
                flow = (self.soc_min - soc_fraction) * self.capacity;
            }
            flow
        } else {
            0.0
        };

        *self.io.states.entry("soc".to_string()).or_insert(0.0) += effective;
        self.io
            .outputs
            .insert("effective_power_flow".to_string(), effective);
    }
}
