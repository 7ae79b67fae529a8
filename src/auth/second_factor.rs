//! Extension point for admin operations that may demand a second factor.
//!
//! The service itself never drives a second-factor flow; it exposes the
//! hook points so a deployment can plug one in. An action implements
//! [`SecondFactorAction`] and the surrounding authentication layer decides
//! which hook to invoke:
//!
//! * the action opted out for this call: [`on_skip`](SecondFactorAction::on_skip)
//! * the actor has no second factor enrolled: [`on_none_enabled`](SecondFactorAction::on_none_enabled)
//! * a confirmation is pending: [`on_required`](SecondFactorAction::on_required)
//! * the confirmation succeeded: [`on_completed`](SecondFactorAction::on_completed)

use serde_json::Value;
use thiserror::Error;

use super::Actor;

#[derive(Debug, Error)]
pub enum SecondFactorError {
    #[error("Second factor confirmation rejected: {0}")]
    Rejected(String),

    #[error("Second factor action failed: {0}")]
    Failed(String),
}

pub type ActionResult = Result<Value, SecondFactorError>;

/// Call-scoped context handed to every hook.
pub struct ActionContext<'a> {
    pub actor: &'a Actor,
    /// Request parameters as submitted, available to every hook.
    pub params: &'a Value,
}

/// An admin operation guarded by an optional second-factor confirmation.
pub trait SecondFactorAction: Send + Sync {
    /// Whether this particular call may bypass the second-factor flow.
    /// Defaults to never bypassing.
    fn skip(&self, ctx: &ActionContext<'_>) -> bool {
        let _ = ctx;
        false
    }

    /// Invoked when [`skip`](Self::skip) returned true for this call.
    fn on_skip(&self, ctx: &ActionContext<'_>) -> ActionResult;

    /// Invoked when the actor has no second factor enrolled.
    fn on_none_enabled(&self, ctx: &ActionContext<'_>) -> ActionResult;

    /// Invoked when a confirmation has been issued and is awaited.
    fn on_required(&self, ctx: &ActionContext<'_>) -> ActionResult;

    /// Invoked once the actor completed the confirmation.
    fn on_completed(&self, ctx: &ActionContext<'_>) -> ActionResult;
}
