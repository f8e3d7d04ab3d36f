pub mod index_provisioner;
pub mod result;
pub mod retry;

#[cfg(test)]
pub(crate) mod testing;

pub use index_provisioner::{IndexProvisioner, ProvisionerSettings};
pub use result::{ProvisionPhase, ProvisionStatus, ProvisioningResult};
pub use retry::{provision_with_retry, RetryPolicy};
