//! Page role definitions for the two-level crawl
//!
//! A page's role is fixed when the link leading to it is followed and
//! travels with the fetch request, so handlers never have to infer it.

use crate::url::RouteId;
use std::fmt;

/// Represents where a page sits relative to the root listing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageRole {
    /// The root route-listing page (depth 0)
    Initial,

    /// A page for one route, reached from the root listing (depth 1)
    RouteDetail {
        /// The route this page describes
        route: RouteId,
    },
}

impl PageRole {
    /// Returns the route a route-detail page belongs to, None for the root
    /// listing
    pub fn route(&self) -> Option<&RouteId> {
        match self {
            Self::Initial => None,
            Self::RouteDetail { route } => Some(route),
        }
    }

    /// Short label used in log lines
    pub fn label(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::RouteDetail { .. } => "route_detail",
        }
    }
}

impl fmt::Display for PageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initial => write!(f, "initial"),
            Self::RouteDetail { route } => write!(f, "route_detail({})", route),
        }
    }
}
