//! Metrics computed from decoded provider data.
//!
//! Everything here is pure and synchronous.

mod fx;
mod per_capita;
mod real_wage;
mod spreads;
mod yoy;

pub use fx::{flip_pair_symbol, invert_instrument_quote, invert_quote, InvertedQuote};
pub use per_capita::{per_capita, rescale, PopulationTable};
pub use real_wage::{real_wage_growth, real_wage_growth_by_country};
pub use spreads::{term_spreads, CurveShape, TermSpread, TreasuryYields};
pub use yoy::{consecutive_yoy, yoy_percent};
