use super::{NewRoute, NewStop, NewTransaction, StoreError, TransactionType, TransitStore};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

/// User id of the wallet created with the sample data
pub const DEMO_USER: &str = "demo-user";

const SAMPLE_STOPS: &[(&str, f64, f64)] = &[
    ("Downtown Transit Center", 36.166340, -86.781620),
    ("TSU Campus", 36.176590, -86.828560),
    ("Vanderbilt Medical Center", 36.144570, -86.802864),
    ("East Nashville", 36.177770, -86.751390),
    ("Fisk University", 36.168900, -86.805000),
    ("Music Row", 36.149800, -86.792600),
];

/// (name, description, start index, end index, minutes, departs in, cost in cents)
const SAMPLE_ROUTES: &[(&str, &str, usize, usize, u32, i64, i64)] = &[
    ("Route 1", "Downtown to TSU Express", 0, 1, 20, 15, 250),
    ("Route 2", "Medical Center Shuttle", 0, 2, 15, 5, 150),
    ("Route 3", "East Side Connector", 0, 3, 18, 9, 200),
    ("Route 4", "Fisk Loop", 0, 4, 12, 7, 100),
    ("Route 5", "Music Row Circulator", 2, 5, 10, 3, 125),
    ("Route 6", "Crosstown", 3, 1, 30, 22, 295),
];

impl TransitStore {
    /// Build a store holding the fixed sample network and the demo wallet
    pub fn with_sample_data() -> Result<Self, StoreError> {
        let store = Self::new();
        store.seed_sample_data()?;
        Ok(store)
    }

    /// Insert the sample stops, routes and demo wallet
    pub fn seed_sample_data(&self) -> Result<(), StoreError> {
        let stops: Vec<_> = SAMPLE_STOPS
            .iter()
            .map(|&(name, latitude, longitude)| {
                self.insert_stop(NewStop {
                    name: name.to_string(),
                    latitude,
                    longitude,
                })
            })
            .collect();

        let now = Utc::now();
        for &(name, description, start, end, duration, departs_in, cents) in SAMPLE_ROUTES {
            self.insert_route(NewRoute {
                name: name.to_string(),
                description: description.to_string(),
                start_stop_id: stops[start].id,
                end_stop_id: stops[end].id,
                duration,
                next_departure: now + Duration::minutes(departs_in),
                token_cost: Decimal::new(cents, 2),
            })?;
        }

        let wallet = self.create_wallet(DEMO_USER, Decimal::ZERO);
        self.wallet_owners.insert(DEMO_USER.to_string(), wallet.id);
        for (kind, cents, description) in [
            (TransactionType::Earn, 3000, "Welcome bonus"),
            (TransactionType::Spend, 500, "Route 1 ride"),
        ] {
            if let Err(e) = self.post_transaction(
                wallet.id,
                NewTransaction {
                    kind,
                    amount: Decimal::new(cents, 2),
                    description: description.to_string(),
                },
            ) {
                warn!(error = %e, "Skipping sample transaction");
            }
        }

        info!(
            stops = self.stop_count(),
            routes = self.route_count(),
            "Sample transit data loaded"
        );
        Ok(())
    }
}
