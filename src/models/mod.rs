pub mod row;
pub mod sample;
pub mod session;

pub use row::{GeoPoint, Row, RowStatus};
pub use sample::{GpsSample, LastLocation, ResolvedSample};
pub use session::{SessionInfo, SessionStatus};
