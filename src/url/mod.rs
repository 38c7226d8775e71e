//! URL handling module for Transit-Mapper
//!
//! This module holds the link classifier: given a link found on a page and
//! the role of that page, it decides whether the link names a route, a stop,
//! or nothing of interest, and extracts the identifier from the link's first
//! query parameter (`?q=BX1`, `?q=308323`).
//!
//! Classification never touches the network or shared state.

mod ids;
mod normalize;

use crate::state::PageRole;
use url::Url;

pub use ids::{RouteId, StopId};
pub use normalize::normalize_url;

/// Outcome of classifying one link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkKind {
    /// A route-listing entry; `url` is the absolute, normalized page address
    Route { id: RouteId, url: Url },
    /// A stop entry on a route-detail page
    Stop { id: StopId },
    /// Not a link this crawl cares about
    Unclassified,
}

/// Returns the value of the first query parameter of `url`, if any
///
/// Values are percent-decoded, so `?q=M15%2B` yields `M15+`.
pub fn first_query_value(url: &Url) -> Option<String> {
    url.query_pairs()
        .next()
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Classifies a link found on a page playing `role`
///
/// # Rules
///
/// | Page role     | First query value | Result                     |
/// |---------------|-------------------|----------------------------|
/// | `Initial`     | route pattern     | `Route`                    |
/// | `Initial`     | anything else     | `Unclassified`             |
/// | `RouteDetail` | route pattern     | `Route` (caller ignores it)|
/// | `RouteDetail` | all digits        | `Stop`                     |
/// | `RouteDetail` | anything else     | `Unclassified`             |
///
/// The page role decides which identifier kind is accepted: a numeric value
/// on the root listing is not a route, and a stop is only recognised on a
/// route-detail page.
///
/// Hrefs that cannot be resolved against `base`, or that carry no query
/// parameter, are `Unclassified`. That is a filter, not an error.
///
/// # Examples
///
/// ```
/// use transit_mapper::{classify_link, LinkKind, PageRole};
/// use url::Url;
///
/// let root = Url::parse("https://bustime.example.com/m/routes/").unwrap();
/// match classify_link("/m/?q=BX1", &root, &PageRole::Initial) {
///     LinkKind::Route { id, url } => {
///         assert_eq!(id.as_str(), "BX1");
///         assert_eq!(url.as_str(), "https://bustime.example.com/m/?q=BX1");
///     }
///     other => panic!("unexpected {:?}", other),
/// }
/// assert_eq!(
///     classify_link("/m/?q=ignored", &root, &PageRole::Initial),
///     LinkKind::Unclassified
/// );
/// ```
pub fn classify_link(href: &str, base: &Url, role: &PageRole) -> LinkKind {
    let url = match base.join(href.trim()).map(|u| normalize_url(u.as_str())) {
        Ok(Ok(url)) => url,
        _ => return LinkKind::Unclassified,
    };

    let Some(value) = first_query_value(&url) else {
        return LinkKind::Unclassified;
    };

    match role {
        PageRole::Initial => match RouteId::parse(&value) {
            Some(id) => LinkKind::Route { id, url },
            None => LinkKind::Unclassified,
        },
        PageRole::RouteDetail { .. } => {
            if let Some(id) = StopId::parse(&value) {
                LinkKind::Stop { id }
            } else if let Some(id) = RouteId::parse(&value) {
                LinkKind::Route { id, url }
            } else {
                LinkKind::Unclassified
            }
        }
    }
}
