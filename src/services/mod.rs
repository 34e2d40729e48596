//! Service module that exports interfaces to external applications, APIs, etc.

pub mod geocoding;
pub mod routing;

// rexport the traits and factory functions
pub use geocoding::{new_geocoding_handler, GeocodedPlace, GeocodingService};
pub use routing::{new_routing_handler, RouteSettings, RoutingService};
