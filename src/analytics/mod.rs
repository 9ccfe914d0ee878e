pub mod calendar;
pub mod payout;
pub mod tally;
pub mod timeline;
pub mod top_songs;


pub use calendar::YearMonth;
pub use payout::*;
pub use timeline::*;
pub use top_songs::*;

/// Stateless reporting queries over an enriched event list.
///
/// Every query borrows the events immutably and always returns a value;
/// invalid parameters produce an empty result rather than an error.
pub struct AnalyticsEngine;
