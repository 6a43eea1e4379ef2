//! Layout module orchestrator.
//!
//! Descriptors flow through the parser, the ordering resolver, the placement
//! resolver (private `core`), and finally the scenario emitter.

mod core;
pub mod descriptor;
pub mod emit;
pub mod order;

pub use self::core::{PlacementResolver, Resolution};
pub use descriptor::{Axis, ParsedCell, ParsedDescriptor};
pub use emit::{BreakpointPlacement, Directive, PlacementDirectives, ScenarioTable};
