//! Domain entities - the uniform departure model

mod departure;
mod favorite;
mod search_result;

pub use departure::{Departure, DepartureStatus, Leg, delay_label};
pub use favorite::Favorite;
pub use search_result::{GroundingSource, SearchResult};
