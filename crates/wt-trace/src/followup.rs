//! Association follow-up: the per-client path from first association to a
//! running traffic generator.
//!
//! ```text
//! Unassociated ──assoc──▶ ResolutionPending ──resolved──▶ Active
//!                                    │
//!                                    └──────miss───────▶ Unresolved
//! ```
//!
//! The resolution step fires a fixed delay after the association, modelling
//! the address-resolution exchange a real station performs before it can
//! address the AP.  `Unresolved` is terminal: that client sends nothing for
//! the rest of the run.  A later re-association does not restart the
//! machine; it only updates the client's associated AP.

use std::net::Ipv4Addr;

use wt_core::{ClientId, MacAddr, SimTime};

/// Follow-up state of one client.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum FollowUpState {
    #[default]
    Unassociated,
    /// Associated with `ap`; resolution fires at `due`.
    ResolutionPending { ap: MacAddr, due: SimTime },
    /// Generator installed, aimed at `target`, first send at `start`.
    Active { target: Ipv4Addr, start: SimTime },
    /// `ap` had no routable address when resolution fired.
    Unresolved { ap: MacAddr },
}

impl FollowUpState {
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, FollowUpState::Active { .. })
    }

    /// `Active` and `Unresolved` never transition again.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, FollowUpState::Active { .. } | FollowUpState::Unresolved { .. })
    }
}

/// Deferred action requested by the association handler: resolve `ap` for
/// `client` at `at`.
///
/// The AP address is captured at association time; a re-association before
/// `at` does not redirect the pending resolution.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ResolutionRequest {
    pub client: ClientId,
    pub ap:     MacAddr,
    pub at:     SimTime,
}
