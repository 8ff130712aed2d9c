//! Pluggable physics models for the composed simulation graph.
//!
//! Each model is built from a resolved [`ModelInstanceDescriptor`] by its
//! registry factory and satisfies the step contract of
//! [`EnergyModel`]: write inputs, call `step()`, read outputs and states.
//!
//! [`ModelInstanceDescriptor`]: crate::compose::ModelInstanceDescriptor

/// Battery storage model.
pub mod battery;
/// Aggregate household load model.
pub mod household;
/// Photovoltaic generator model.
pub mod pv;
pub mod types;
/// Wind turbine model.
pub mod wind_turbine;

// Re-export the main types for convenience
pub use battery::Battery;
pub use household::Household;
pub use pv::Pv;
pub use types::EnergyModel;
pub use types::ModelIo;
pub use types::OutputKind;
pub use wind_turbine::WindTurbine;
