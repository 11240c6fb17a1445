//! Read-only projections of a published table, the queries behind the
//! dashboard's charts.

pub mod palette;
pub mod tally;

pub use palette::party_color;
pub use tally::{available_constituencies, closest_contests, filter_constituencies, party_tally, PartyTally};
