// =============================================================================
// Instructions Module
// =============================================================================
// Every instruction of the yield vault program, one module each. The handlers
// resolve roles through the Registry and keep all ledger math in state/ and
// fees.rs.
// =============================================================================

// Registry / factory
pub mod initialize_registry;
pub mod create_vault;

// User operations
pub mod deposit;
pub mod withdraw_capital;
pub mod withdraw_profit;

// Profit crediting
pub mod credit_profit;
pub mod fund_custody;

// Affiliates
pub mod affiliate;

// Admin operations
pub mod admin;
pub mod emergency_withdraw;

// Shared custody transfer helpers
pub mod custody;

// The #[derive(Accounts)] macro generates helper types that need to be at crate root
pub use admin::*;
pub use affiliate::*;
pub use create_vault::*;
pub use credit_profit::*;
pub use deposit::*;
pub use emergency_withdraw::*;
pub use fund_custody::*;
pub use initialize_registry::*;
pub use withdraw_capital::*;
pub use withdraw_profit::*;
