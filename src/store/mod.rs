//! In-memory entity store for stops, routes, wallets and transactions.
//!
//! Every table is keyed by an auto-incrementing integer id starting at 1.
//! Stops and routes are written once at seed time; wallets and
//! transactions change through the wallet ledger.

mod query;
mod seed;
mod wallet;


pub use seed::DEMO_USER;
pub use wallet::{NewTransaction, Transaction, TransactionType, Wallet, WalletError};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// A named boarding location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: u32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Stop fields supplied by the caller; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewStop {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A one-way service between two stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub start_stop_id: u32,
    pub end_stop_id: u32,
    /// Trip length in minutes
    pub duration: u32,
    pub next_departure: DateTime<Utc>,
    pub token_cost: Decimal,
}

/// Route fields supplied by the caller; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewRoute {
    pub name: String,
    pub description: String,
    pub start_stop_id: u32,
    pub end_stop_id: u32,
    pub duration: u32,
    pub next_departure: DateTime<Utc>,
    pub token_cost: Decimal,
}

/// Rejected stop/route insertions
#[derive(Debug, PartialEq)]
pub enum StoreError {
    UnknownStop(u32),
    InvalidDuration,
    NegativeTokenCost,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::UnknownStop(id) => write!(f, "stop {} does not exist", id),
            StoreError::InvalidDuration => write!(f, "route duration must be positive"),
            StoreError::NegativeTokenCost => write!(f, "token cost must not be negative"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Entity store backing the REST API
pub struct TransitStore {
    stops: DashMap<u32, Stop>,
    routes: DashMap<u32, Route>,
    wallets: DashMap<u32, Wallet>,
    /// Secondary index: user id -> wallet id
    wallet_owners: DashMap<String, u32>,
    transactions: DashMap<u32, Transaction>,
    next_stop_id: AtomicU32,
    next_route_id: AtomicU32,
    next_wallet_id: AtomicU32,
    next_transaction_id: AtomicU32,
    /// Balance for wallets created on first lookup
    starting_balance: Decimal,
}

impl TransitStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            stops: DashMap::new(),
            routes: DashMap::new(),
            wallets: DashMap::new(),
            wallet_owners: DashMap::new(),
            transactions: DashMap::new(),
            next_stop_id: AtomicU32::new(1),
            next_route_id: AtomicU32::new(1),
            next_wallet_id: AtomicU32::new(1),
            next_transaction_id: AtomicU32::new(1),
            starting_balance: Decimal::ZERO,
        }
    }

    /// Set the balance given to wallets created by `wallet_for_user`
    pub fn with_starting_balance(mut self, balance: Decimal) -> Self {
        self.starting_balance = balance.max(Decimal::ZERO);
        self
    }

    pub fn insert_stop(&self, stop: NewStop) -> Stop {
        let id = self.next_stop_id.fetch_add(1, Ordering::SeqCst);
        let stop = Stop {
            id,
            name: stop.name,
            latitude: stop.latitude,
            longitude: stop.longitude,
        };
        self.stops.insert(id, stop.clone());
        stop
    }

    /// Insert a route after checking that both endpoints exist
    pub fn insert_route(&self, route: NewRoute) -> Result<Route, StoreError> {
        for stop_id in [route.start_stop_id, route.end_stop_id] {
            if !self.stops.contains_key(&stop_id) {
                return Err(StoreError::UnknownStop(stop_id));
            }
        }
        if route.duration == 0 {
            return Err(StoreError::InvalidDuration);
        }
        if route.token_cost < Decimal::ZERO {
            return Err(StoreError::NegativeTokenCost);
        }

        let id = self.next_route_id.fetch_add(1, Ordering::SeqCst);
        let route = Route {
            id,
            name: route.name,
            description: route.description,
            start_stop_id: route.start_stop_id,
            end_stop_id: route.end_stop_id,
            duration: route.duration,
            next_departure: route.next_departure,
            token_cost: route.token_cost,
        };
        self.routes.insert(id, route.clone());
        Ok(route)
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }
}

impl Default for TransitStore {
    fn default() -> Self {
        Self::new()
    }
}
