//! Ownership and participation authorization rules.
//!
//! Every check here is a pure function of the caller identity and the
//! ownership fields of the target resource. Usernames are compared with exact,
//! case-sensitive equality; there is no wildcard, group, or admin override.
//!
//! Resource existence is established by the storage layer before any check
//! runs. A missing message is a `NotFound`, never an authorization decision.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::identity::VerifiedIdentity;

/// Access to the two parties of a message.
///
/// Implemented by every message representation the policy needs to inspect,
/// so the decision functions never depend on a particular row shape.
pub trait MessageParticipants {
    fn sender(&self) -> &str;
    fn recipient(&self) -> &str;
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The caller is not the user the resource belongs to.
    NotSelf,
    /// The caller is neither sender nor recipient of the message.
    NotParticipant,
    /// The caller is not the recipient of the message.
    NotRecipient,
}

impl DenyReason {
    pub fn message(self) -> &'static str {
        match self {
            DenyReason::NotSelf => "Only the account owner may access this resource",
            DenyReason::NotParticipant => "Only the sender or recipient may view this message",
            DenyReason::NotRecipient => "Only the recipient may mark this message as read",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of an authorization check. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    fn allow_if(allowed: bool, reason: DenyReason) -> Self {
        if allowed {
            Decision::Allow
        } else {
            Decision::Deny(reason)
        }
    }

    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Convert a denial into [`CoreError::Forbidden`].
    pub fn into_result(self) -> Result<(), CoreError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(CoreError::Forbidden(reason.message().to_string())),
        }
    }
}

/// Allow iff the caller is `target_username`.
pub fn check_self(target_username: &str, caller: &VerifiedIdentity) -> Decision {
    Decision::allow_if(caller.username() == target_username, DenyReason::NotSelf)
}

/// Allow iff the caller sent or received `message`.
pub fn check_participant<M>(message: &M, caller: &VerifiedIdentity) -> Decision
where
    M: MessageParticipants + ?Sized,
{
    let caller = caller.username();
    Decision::allow_if(
        caller == message.sender() || caller == message.recipient(),
        DenyReason::NotParticipant,
    )
}

/// Allow iff the caller received `message`. The sender is denied.
pub fn check_recipient<M>(message: &M, caller: &VerifiedIdentity) -> Decision
where
    M: MessageParticipants + ?Sized,
{
    Decision::allow_if(
        caller.username() == message.recipient(),
        DenyReason::NotRecipient,
    )
}

/// Profile detail and owner listings.
pub fn ensure_self(target_username: &str, caller: &VerifiedIdentity) -> Result<(), CoreError> {
    check_self(target_username, caller).into_result()
}

/// Message detail reads.
pub fn ensure_participant<M>(message: &M, caller: &VerifiedIdentity) -> Result<(), CoreError>
where
    M: MessageParticipants + ?Sized,
{
    check_participant(message, caller).into_result()
}

/// Mark-as-read mutations.
pub fn ensure_recipient<M>(message: &M, caller: &VerifiedIdentity) -> Result<(), CoreError>
where
    M: MessageParticipants + ?Sized,
{
    check_recipient(message, caller).into_result()
}

/// Who may list a user's sent or received messages.
///
/// Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingPolicy {
    /// Only the user themself (the [`check_self`] rule).
    #[default]
    OwnerOnly,
    /// Any authenticated caller.
    AnyAuthenticated,
}

pub const LISTING_OWNER_ONLY: &str = "owner_only";
pub const LISTING_ANY_AUTHENTICATED: &str = "any_authenticated";

impl ListingPolicy {
    pub fn check(self, target_username: &str, caller: &VerifiedIdentity) -> Decision {
        match self {
            ListingPolicy::OwnerOnly => check_self(target_username, caller),
            ListingPolicy::AnyAuthenticated => Decision::Allow,
        }
    }

    pub fn ensure(self, target_username: &str, caller: &VerifiedIdentity) -> Result<(), CoreError> {
        self.check(target_username, caller).into_result()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ListingPolicy::OwnerOnly => LISTING_OWNER_ONLY,
            ListingPolicy::AnyAuthenticated => LISTING_ANY_AUTHENTICATED,
        }
    }
}

impl FromStr for ListingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            LISTING_OWNER_ONLY => Ok(ListingPolicy::OwnerOnly),
            LISTING_ANY_AUTHENTICATED => Ok(ListingPolicy::AnyAuthenticated),
            other => Err(format!(
                "Unknown listing policy '{other}'. Expected '{LISTING_OWNER_ONLY}' or '{LISTING_ANY_AUTHENTICATED}'"
            )),
        }
    }
}
