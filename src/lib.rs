//! `odbrs` — daily airline flight-scheduling core: universe construction,
//! greedy aircraft assignment, OD demand routing, schedule pruning, fitness
//! scoring, and the genetic algorithm that drives all of it.
//!
//! Layout follows the teacher crate's shape: a shared `Module` trait that
//! components implement to report their own startup cost, one module per
//! pipeline stage, and a thin `main.rs` wiring them together. The GUI and
//! CLI/file-IO surfaces the teacher couples into that trait are out of
//! scope here (spec §1) — `Module` is kept for the stages that still have
//! meaningful init work (the flight universe and the GA driver).

pub mod error;
pub mod evaluator;
pub mod ga;
pub mod model;
pub mod result;
pub mod universe;

pub use error::ScheduleError;

/// A component with a name and a fallible, one-shot initialization step.
/// Kept from the teacher's `main::Module` trait; `Parameters` lets the
/// caller hand the component whatever the previous stage produced.
pub trait Module: Default {
    type ReturnType;
    type Configuration: Default;
    type Parameters;

    fn get_name(&self) -> &str;

    fn init(
        &mut self,
        config: Self::Configuration,
        parameters: Self::Parameters,
    ) -> Result<Self::ReturnType, ScheduleError>;
}
