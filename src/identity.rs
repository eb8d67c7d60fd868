//! Record identifier assignment
//!
//! Under [`IdentityPolicy::ContentAddressed`] the id is a UUIDv5 of the
//! canonical `rawUrl` in [`RECORD_NAMESPACE`], so every capture of the same
//! post, in any process, gets the same id and lands in the same directory.

use crate::config::IdentityPolicy;
use uuid::Uuid;

/// Namespace for content-addressed record ids
///
/// Changing this value changes every id ever assigned; never edit it.
pub const RECORD_NAMESPACE: Uuid = Uuid::from_u128(0x6d696e66_795f_4e53_8f3a_2c1d0b9e7a45);

/// Assigns ids under one fixed policy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdentityAssigner {
    policy: IdentityPolicy,
}

impl IdentityAssigner {
    /// Assigner for `policy`
    pub fn new(policy: IdentityPolicy) -> Self {
        Self { policy }
    }

    /// The policy in force
    pub fn policy(&self) -> IdentityPolicy {
        self.policy
    }

    /// Id for a record with canonical URL `raw_url`
    ///
    /// A record without a URL gets no id under the content-addressed
    /// policy, since all such records would otherwise collapse into one.
    pub fn assign(&self, raw_url: &str) -> String {
        match self.policy {
            IdentityPolicy::ContentAddressed => {
                if raw_url.is_empty() {
                    tracing::debug!("No rawUrl to derive an id from");
                    return String::new();
                }
                Uuid::new_v5(&RECORD_NAMESPACE, raw_url.as_bytes()).to_string()
            }
            IdentityPolicy::Random => Uuid::new_v4().to_string(),
        }
    }
}
