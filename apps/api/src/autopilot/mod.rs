// Unattended operation: the single-flight generation gate and the repeating scheduler.

pub mod gate;
pub mod handlers;
pub mod scheduler;

pub use gate::GenerationGate;
pub use scheduler::Autopilot;
