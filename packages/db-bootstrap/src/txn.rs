use std::sync::Arc;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::error::DbBootstrapError;
use crate::txn_policy;

/// A transaction handle that can be cloned into every call that should see
/// the same in-flight transaction. Replaces hidden per-process transaction
/// state with an explicitly threaded value; test harnesses open one, pass it
/// through the code under test, and roll it back at the end.
#[derive(Clone)]
pub struct SharedTxn(Arc<DatabaseTransaction>);

impl SharedTxn {
    /// Begin a transaction on the connection and wrap it for sharing.
    pub async fn open(conn: &DatabaseConnection) -> Result<Self, DbBootstrapError> {
        let txn = conn.begin().await?;
        Ok(Self(Arc::new(txn)))
    }

    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.0
    }

    /// Roll the transaction back. Every other clone must be dropped first,
    /// since rollback consumes the underlying transaction.
    pub async fn rollback(self) -> Result<(), DbBootstrapError> {
        match Arc::try_unwrap(self.0) {
            Ok(txn) => {
                txn.rollback().await?;
                Ok(())
            }
            Err(_) => Err(DbBootstrapError::config(
                "cannot roll back a shared transaction while clones of it are still alive",
            )),
        }
    }
}

/// Execute a closure within a database transaction.
///
/// 1) If a `SharedTxn` is supplied, run against it; its owner controls
///    commit/rollback.
/// 2) Otherwise begin a transaction on `conn`, run the closure, and on `Ok`
///    apply the process transaction policy; on `Err` roll back and preserve
///    the original error.
pub async fn with_txn<R, F>(
    shared: Option<&SharedTxn>,
    conn: &DatabaseConnection,
    f: F,
) -> Result<R, DbBootstrapError>
where
    F: for<'a> FnOnce(
        &'a DatabaseTransaction,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<R, DbBootstrapError>> + 'a>,
    >,
{
    if let Some(shared) = shared {
        return f(shared.transaction()).await;
    }

    let txn = conn.begin().await?;
    let out = f(&txn).await;

    match out {
        Ok(val) => match txn_policy::current() {
            txn_policy::TxnPolicy::CommitOnOk => {
                txn.commit().await?;
                Ok(val)
            }
            txn_policy::TxnPolicy::RollbackOnOk => {
                txn.rollback().await?;
                Ok(val)
            }
        },
        Err(err) => {
            // Best-effort rollback; preserve the original error
            let _ = txn.rollback().await;
            Err(err)
        }
    }
}
