//! Result aggregation for discovered routes and stops
//!
//! Three independent containers, each behind its own mutex. Every `add`
//! performs its whole read-modify-write while holding the lock, so
//! concurrent adds to the same key serialize and none are lost.

use super::lock;
use crate::url::{RouteId, StopId};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

/// Set of discovered route identifiers
#[derive(Debug, Default)]
pub struct RouteSet {
    routes: Mutex<HashSet<RouteId>>,
}

impl RouteSet {
    /// Records a route. Re-adding a known route is a no-op.
    ///
    /// Returns true if the route was new.
    pub fn add(&self, route: RouteId) -> bool {
        lock(&self.routes).insert(route)
    }

    pub fn contains(&self, route: &RouteId) -> bool {
        lock(&self.routes).contains(route)
    }

    pub fn len(&self) -> usize {
        lock(&self.routes).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted copy of the current contents
    pub fn snapshot(&self) -> BTreeSet<RouteId> {
        lock(&self.routes).iter().cloned().collect()
    }
}

/// Mapping from stop identifier to its display name
///
/// When two pages disagree on a name the last write wins.
#[derive(Debug, Default)]
pub struct StopNames {
    names: Mutex<HashMap<StopId, String>>,
}

impl StopNames {
    /// Records a stop name, returning the name it replaced, if any
    pub fn add(&self, stop: StopId, name: String) -> Option<String> {
        lock(&self.names).insert(stop, name)
    }

    pub fn get(&self, stop: &StopId) -> Option<String> {
        lock(&self.names).get(stop).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.names).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> BTreeMap<StopId, String> {
        lock(&self.names)
            .iter()
            .map(|(stop, name)| (stop.clone(), name.clone()))
            .collect()
    }
}

/// Mapping from stop identifier to the routes serving it
///
/// A stop's route set only ever grows: `add` unions the new route into
/// whatever is already recorded.
#[derive(Debug, Default)]
pub struct StopRoutes {
    routes: Mutex<HashMap<StopId, HashSet<RouteId>>>,
}

impl StopRoutes {
    /// Associates `route` with `stop`
    ///
    /// Returns true if the association was new.
    pub fn add(&self, stop: StopId, route: RouteId) -> bool {
        lock(&self.routes).entry(stop).or_default().insert(route)
    }

    pub fn get(&self, stop: &StopId) -> Option<BTreeSet<RouteId>> {
        lock(&self.routes)
            .get(stop)
            .map(|routes| routes.iter().cloned().collect())
    }

    /// Total number of stop/route associations
    pub fn association_count(&self) -> usize {
        lock(&self.routes).values().map(HashSet::len).sum()
    }

    pub fn snapshot(&self) -> BTreeMap<StopId, BTreeSet<RouteId>> {
        lock(&self.routes)
            .iter()
            .map(|(stop, routes)| (stop.clone(), routes.iter().cloned().collect()))
            .collect()
    }
}

/// One row of the stops table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopRecord {
    pub id: StopId,
    pub name: String,
    pub routes: BTreeSet<RouteId>,
}

/// Read-only view of the aggregated results, sorted for stable export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateSnapshot {
    pub routes: BTreeSet<RouteId>,
    pub stops: Vec<StopRecord>,
}

impl AggregateSnapshot {
    /// Total number of stop/route associations across all stops
    pub fn association_count(&self) -> usize {
        self.stops.iter().map(|stop| stop.routes.len()).sum()
    }
}

/// The three result containers filled in during a crawl
#[derive(Debug, Default)]
pub struct ResultAggregator {
    pub routes: RouteSet,
    pub stop_names: StopNames,
    pub stop_routes: StopRoutes,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a sorted snapshot with one row per stop
    ///
    /// The containers are read one after another, not under a common lock.
    /// Call this once the crawl has drained.
    pub fn snapshot(&self) -> AggregateSnapshot {
        let routes = self.routes.snapshot();
        let mut names = self.stop_names.snapshot();
        let mut stop_routes = self.stop_routes.snapshot();

        let ids: BTreeSet<StopId> = names.keys().chain(stop_routes.keys()).cloned().collect();
        let stops = ids
            .into_iter()
            .map(|id| StopRecord {
                name: names.remove(&id).unwrap_or_default(),
                routes: stop_routes.remove(&id).unwrap_or_default(),
                id,
            })
            .collect();

        AggregateSnapshot { routes, stops }
    }
}
