use super::{Route, Stop, TransitStore};

/// Read-only lookups. Unknown ids produce empty results rather than errors.
impl TransitStore {
    /// All stops ordered by id
    pub fn list_stops(&self) -> Vec<Stop> {
        let mut stops: Vec<Stop> = self.stops.iter().map(|s| s.value().clone()).collect();
        stops.sort_by_key(|s| s.id);
        stops
    }

    /// All routes ordered by id
    pub fn list_routes(&self) -> Vec<Route> {
        self.filter_routes(|_| true)
    }

    pub fn get_stop(&self, id: u32) -> Option<Stop> {
        self.stops.get(&id).map(|s| s.clone())
    }

    pub fn get_route(&self, id: u32) -> Option<Route> {
        self.routes.get(&id).map(|r| r.clone())
    }

    /// Ids of every route, ascending
    pub fn route_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.routes.iter().map(|r| *r.key()).collect();
        ids.sort_unstable();
        ids
    }

    /// Routes that start or end at the given stop
    pub fn routes_by_stop(&self, stop_id: u32) -> Vec<Route> {
        self.filter_routes(|r| r.start_stop_id == stop_id || r.end_stop_id == stop_id)
    }

    /// Routes running exactly from `start_stop_id` to `end_stop_id`.
    ///
    /// Routes are one-way: a route from B to A does not match a query from A to B.
    pub fn routes_between(&self, start_stop_id: u32, end_stop_id: u32) -> Vec<Route> {
        self.filter_routes(|r| r.start_stop_id == start_stop_id && r.end_stop_id == end_stop_id)
    }

    /// Case-insensitive substring match over stop names
    pub fn search_stops(&self, query: &str) -> Vec<Stop> {
        let needle = query.to_lowercase();
        let mut stops: Vec<Stop> = self
            .stops
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .map(|s| s.value().clone())
            .collect();
        stops.sort_by_key(|s| s.id);
        stops
    }

    fn filter_routes<P>(&self, predicate: P) -> Vec<Route>
    where
        P: Fn(&Route) -> bool,
    {
        let mut routes: Vec<Route> = self
            .routes
            .iter()
            .filter(|r| predicate(r.value()))
            .map(|r| r.value().clone())
            .collect();
        routes.sort_by_key(|r| r.id);
        routes
    }
}
