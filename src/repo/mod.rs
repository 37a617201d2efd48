/// Repository module
///
/// Data access for the POS backend. Plain reads and writes return
/// `anyhow::Result`; operations that move money live in `ledger` and
/// return a typed [`LedgerError`] so handlers can tell a business rule
/// failure from a database failure.

mod user_repo;
mod wallet_repo;
mod product_repo;
mod order_repo;
mod transaction_repo;
mod ledger;

// Re-export all repository functions
pub use user_repo::*;
pub use wallet_repo::*;
pub use product_repo::*;
pub use order_repo::*;
pub use transaction_repo::*;
pub use ledger::*;

/// Whether a diesel error is a UNIQUE constraint violation
pub(crate) fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<diesel::result::Error>(),
        Some(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _
        ))
    )
}
