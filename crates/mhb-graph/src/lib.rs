#![deny(missing_docs)]

//! Parameter/bond computation graph and the single-component random-walk
//! Metropolis sweep.
//!
//! Models are built by adding [`ParameterNode`]s and [`Bond`]s to a [`Model`]
//! arena. Each bond is one additive log-posterior term; sweeping a node
//! proposes each component in turn, sums the deltas of the bonds reading that
//! node, and accepts or rejects with an independent acceptance stream held by
//! the [`RunContext`].

mod argument;
mod bond;
mod context;
mod likelihood;
mod model;
mod node;
mod sweep;

pub use argument::{check_rectangular, ArgumentBundle, ArgumentMaker};
pub use bond::Bond;
pub use context::RunContext;
pub use likelihood::{
    normal_logpdf, FnLikelihood, Flat, Likelihood, Normal, ScaleParam, StandardNormal,
};
pub use model::{Model, ModelConfig};
pub use node::{BondLink, ParameterNode};
pub use sweep::{StepOutcome, StepStatus, SweepReport};
