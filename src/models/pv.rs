//! Photovoltaic generator model.

use crate::compose::{ComposeError, ModelInstanceDescriptor};
use crate::models::types::{
    interval_hours, optional_f64, require_f64, EnergyModel, ModelIo, OutputKind,
};

/// A PV plant driven by irradiance, sun-position and weather inputs.
///
/// Plane-of-array irradiance is the sum of a diffuse component (sky-view
/// factor), a ground-reflected component (albedo) and a direct component
/// (angle of incidence). Module efficiency is derated with cell
/// temperature via the NOCT model before the inverter/MPPT/loss chain.
#[derive(Debug, Clone)]
pub struct Pv {
    /// Module area (m2).
    m_area: f64,
    /// Nominal operating cell temperature (degC).
    noct: f64,
    /// Module efficiency at STC.
    m_efficiency_stc: f64,
    /// Irradiance at NOCT (W/m2).
    g_noct: f64,
    /// Module power at STC (W).
    p_stc: f64,
    /// Module tilt (degrees).
    m_tilt: f64,
    /// Module azimuth (degrees).
    m_az: f64,
    /// Plant capacity (kW).
    cap: f64,
    /// Sizing safety factor.
    sf: f64,
    inv_eff: f64,
    mppt_eff: f64,
    losses: f64,
    albedo: f64,
    output: OutputKind,
    interval_hr: f64,
    io: ModelIo,
}

impl Pv {
    /// Builds a PV plant from a resolved descriptor.
    ///
    /// # Errors
    ///
    /// The geometry and rating parameters are required; the efficiency
    /// chain and albedo fall back to standard values.
    pub fn from_descriptor(descriptor: &ModelInstanceDescriptor) -> Result<Self, ComposeError> {
        let parameters = &descriptor.parameters;
        let model = &descriptor.name;
        Ok(Self {
            m_area: require_f64(parameters, "m_area", model)?,
            noct: require_f64(parameters, "NOCT", model)?,
            m_efficiency_stc: require_f64(parameters, "m_efficiency_stc", model)?,
            g_noct: require_f64(parameters, "G_NOCT", model)?,
            p_stc: require_f64(parameters, "P_STC", model)?,
            m_tilt: require_f64(parameters, "m_tilt", model)?,
            m_az: require_f64(parameters, "m_az", model)?,
            cap: require_f64(parameters, "cap", model)?,
            sf: optional_f64(parameters, "sf", 1.1),
            inv_eff: optional_f64(parameters, "inv_eff", 0.96),
            mppt_eff: optional_f64(parameters, "mppt_eff", 0.99),
            losses: optional_f64(parameters, "losses", 0.97),
            albedo: optional_f64(parameters, "albedo", 0.2),
            output: OutputKind::from_parameters(parameters, model)?,
            interval_hr: interval_hours(descriptor.step_size),
            io: ModelIo::from_descriptor(descriptor),
        })
    }

    /// Cosine of the angle of incidence on the panel, floored at zero.
    fn cos_aoi(&self) -> f64 {
        let hs = self.io.input("hs");
        let az = self.io.input("Az");
        let tilt_complement = (90.0 - self.m_tilt).to_radians();
        let cos_aoi = tilt_complement.cos() * hs.to_radians().cos()
            * (self.m_az - az).to_radians().cos()
            + tilt_complement.sin() * hs.to_radians().sin();
        cos_aoi.max(0.0)
    }

    fn sky_view_factor(&self) -> f64 {
        (1.0 + self.m_tilt.to_radians().cos()) / 2.0
    }

    /// Total plane-of-array irradiance; records the sky-view factor as a
    /// state for observers.
    fn total_irradiance(&mut self) -> f64 {
        let svf = self.sky_view_factor();
        self.io.states.insert("svf".to_string(), svf);

        let diffuse = svf * self.io.input("G_Dh");
        let reflected = self.albedo * (1.0 - svf) * self.io.input("G_Gh");
        let direct = self.io.input("G_Bn") * self.cos_aoi();
        diffuse + reflected + direct
    }

    /// Module efficiency after cell-temperature derating.
    fn cell_efficiency(&self, g_aoi: f64) -> f64 {
        let ta = self.io.input("Ta");
        // Floor the wind speed to keep the convective term finite.
        let ff = self.io.input("FF").max(0.1);

        let m_temp = ta
            + (g_aoi / self.g_noct)
                * (self.noct - 20.0)
                * (9.5 / (5.7 + 3.8 * ff))
                * (1.0 - self.m_efficiency_stc / 0.90);
        self.m_efficiency_stc * (1.0 + (-0.0035 * (m_temp - 25.0)))
    }

    /// AC-side generation for the given irradiance and efficiency.
    fn generation(&self, g_aoi: f64, efficiency: f64) -> f64 {
        let modules = (self.cap * self.sf * 1000.0 / self.p_stc).ceil();
        let total_area = modules * self.m_area;
        let p_ac =
            total_area * g_aoi * efficiency * self.inv_eff * self.mppt_eff * self.losses / 1000.0;
        match self.output {
            OutputKind::Energy => p_ac * self.interval_hr,
            OutputKind::Power => p_ac,
        }
    }
}

impl EnergyModel for Pv {
    fn model_type(&self) -> &'static str {
        "pv"
    }

    fn io(&self) -> &ModelIo {
        &self.io
    }

    fn io_mut(&mut self) -> &mut ModelIo {
        &mut self.io
    }

    fn step(&mut self) {
        let g_aoi = self.total_irradiance();
        self.io.outputs.insert("total_irr".to_string(), g_aoi);

        let efficiency = self.cell_efficiency(g_aoi);
        let pv_gen = self.generation(g_aoi, efficiency);
        self.io.outputs.insert("pv_gen".to_string(), pv_gen);
    }
}
