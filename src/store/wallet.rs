use super::TransitStore;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::Ordering;
use tracing::info;

/// Token balance owned by a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: u32,
    pub user_id: String,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Earn,
    Spend,
}

/// A recorded balance change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: u32,
    pub wallet_id: u32,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Always positive; `kind` gives the direction
    pub amount: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for posting a transaction
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
}

/// Wallet ledger errors
#[derive(Debug, PartialEq)]
pub enum WalletError {
    WalletNotFound(u32),
    NonPositiveAmount,
    InsufficientBalance { balance: Decimal, requested: Decimal },
    /// The credited balance would not fit in a `Decimal`
    BalanceOverflow,
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletError::WalletNotFound(id) => write!(f, "Wallet {} not found", id),
            WalletError::NonPositiveAmount => write!(f, "Amount must be greater than zero"),
            WalletError::InsufficientBalance { balance, requested } => write!(
                f,
                "Insufficient balance: {} available, {} requested",
                balance, requested
            ),
            WalletError::BalanceOverflow => write!(f, "Amount would overflow wallet balance"),
        }
    }
}

impl std::error::Error for WalletError {}

impl TransitStore {
    /// Return the user's wallet, creating it with the starting balance if needed
    pub fn wallet_for_user(&self, user_id: &str) -> Wallet {
        // The owner entry stays locked until the wallet is indexed, so two
        // first lookups for the same user create one wallet.
        match self.wallet_owners.entry(user_id.to_string()) {
            Entry::Occupied(mut owner) => {
                if let Some(wallet) = self.wallets.get(owner.get()) {
                    return wallet.clone();
                }
                let wallet = self.create_wallet(user_id, self.starting_balance);
                owner.insert(wallet.id);
                wallet
            }
            Entry::Vacant(owner) => {
                let wallet = self.create_wallet(user_id, self.starting_balance);
                owner.insert(wallet.id);
                wallet
            }
        }
    }

    pub fn get_wallet(&self, wallet_id: u32) -> Option<Wallet> {
        self.wallets.get(&wallet_id).map(|w| w.clone())
    }

    /// Apply a transaction to a wallet and record it.
    ///
    /// The wallet entry stays locked from the balance check until the
    /// transaction is stored, so concurrent posts cannot overdraw it.
    pub fn post_transaction(
        &self,
        wallet_id: u32,
        request: NewTransaction,
    ) -> Result<Transaction, WalletError> {
        if request.amount <= Decimal::ZERO {
            return Err(WalletError::NonPositiveAmount);
        }

        let mut wallet = self
            .wallets
            .get_mut(&wallet_id)
            .ok_or(WalletError::WalletNotFound(wallet_id))?;

        let new_balance = match request.kind {
            TransactionType::Earn => wallet
                .balance
                .checked_add(request.amount)
                .ok_or(WalletError::BalanceOverflow)?,
            TransactionType::Spend => {
                if request.amount > wallet.balance {
                    return Err(WalletError::InsufficientBalance {
                        balance: wallet.balance,
                        requested: request.amount,
                    });
                }
                wallet.balance - request.amount
            }
        };
        wallet.balance = new_balance;

        let transaction = Transaction {
            id: self.next_transaction_id.fetch_add(1, Ordering::SeqCst),
            wallet_id,
            kind: request.kind,
            amount: request.amount,
            description: request.description,
            created_at: Utc::now(),
        };
        self.transactions.insert(transaction.id, transaction.clone());

        info!(
            wallet_id = wallet_id,
            transaction_id = transaction.id,
            kind = ?transaction.kind,
            amount = %transaction.amount,
            balance = %new_balance,
            "Transaction posted"
        );

        Ok(transaction)
    }

    /// Transactions for a wallet, newest first
    pub fn transactions_for_wallet(&self, wallet_id: u32) -> Vec<Transaction> {
        let mut transactions: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| t.wallet_id == wallet_id)
            .map(|t| t.value().clone())
            .collect();
        transactions.sort_by(|a, b| b.id.cmp(&a.id));
        transactions
    }

    pub(super) fn create_wallet(&self, user_id: &str, balance: Decimal) -> Wallet {
        let wallet = Wallet {
            id: self.next_wallet_id.fetch_add(1, Ordering::SeqCst),
            user_id: user_id.to_string(),
            balance,
            created_at: Utc::now(),
        };
        self.wallets.insert(wallet.id, wallet.clone());
        info!(wallet_id = wallet.id, user_id = %user_id, "Wallet created");
        wallet
    }
}
