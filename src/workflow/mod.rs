//! Workflow composite layer
//!
//! The control-flow primitives that pipelines are assembled from: a shared
//! state store, an atomic step trait, and the sequential, parallel, bounded
//! loop, and conditional composites. Composites are steps themselves, so the
//! four kinds nest freely into fixed pipelines.

pub mod bounded_loop;
pub mod conditional;
pub mod error;
pub mod parallel;
pub mod sequential;
pub mod state;
pub mod step;

pub use bounded_loop::{BoundedLoop, LoopRun, LoopTermination};
pub use conditional::{ConditionalFlow, Predicate, PredicateError};
pub use error::WorkflowError;
pub use parallel::ParallelFlow;
pub use sequential::SequentialFlow;
pub use state::{StateSnapshot, StateStore};
pub use step::{FnStep, Step, StepHandle, StepOutcome};
