use mhb_core::rng::{ACCEPTANCE_SUBSTREAM, PROPOSAL_SUBSTREAM};
use mhb_core::{DrawStream, RngHandle};

/// Randomness consumed by sweeps: one stream for proposal noise and an
/// independent one for acceptance draws.
///
/// The two streams are owned separately, so a proposal can never consume an
/// acceptance variate or vice versa.
#[derive(Debug, Clone)]
pub struct RunContext<P = RngHandle, A = RngHandle> {
    proposal: P,
    acceptance: A,
}

impl RunContext {
    /// Derives both streams from `master_seed` as SipHash substreams 0 and 1.
    pub fn from_seed(master_seed: u64) -> Self {
        Self {
            proposal: RngHandle::substream(master_seed, PROPOSAL_SUBSTREAM),
            acceptance: RngHandle::substream(master_seed, ACCEPTANCE_SUBSTREAM),
        }
    }
}

impl<P: DrawStream, A: DrawStream> RunContext<P, A> {
    /// Builds a context from explicit streams.
    pub fn new(proposal: P, acceptance: A) -> Self {
        Self {
            proposal,
            acceptance,
        }
    }

    /// Stream used for random-walk noise.
    pub fn proposal_mut(&mut self) -> &mut P {
        &mut self.proposal
    }

    /// Stream used for Metropolis acceptance draws.
    pub fn acceptance_mut(&mut self) -> &mut A {
        &mut self.acceptance
    }

    /// Splits the context back into its streams.
    pub fn into_parts(self) -> (P, A) {
        (self.proposal, self.acceptance)
    }
}
