pub mod simulation_flow;

pub use simulation_flow::{validate_focus_group_input, ReportSource, SimulationFlow, SimulationOutcome};
