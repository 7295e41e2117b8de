pub mod calendar;
pub mod query;
pub mod timefmt;
pub mod window;

pub use calendar::CivilDate;
pub use query::{Criteria, LastWindow, OutputFormat, PageMode, QueryState};
pub use window::DURATION_LADDER;
