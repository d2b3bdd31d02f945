// =============================================================================
// State Module
// =============================================================================
// Account structures of the yield vault protocol:
// - Registry: factory, roles and global Policy
// - Vault: per-mint TVL and pause state
// - Depositor: per-user principal and pending profit in one vault
// - AffiliateBinding / AffiliateEarnings: referral link and reporting totals
// =============================================================================

pub mod affiliate;
pub mod depositor;
pub mod registry;
pub mod vault;

pub use affiliate::*;
pub use depositor::*;
pub use registry::*;
pub use vault::*;
