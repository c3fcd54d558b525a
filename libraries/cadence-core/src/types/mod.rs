mod ids;
mod track;

pub use ids::TrackId;
pub use track::{format_duration, parse_duration, Track};
