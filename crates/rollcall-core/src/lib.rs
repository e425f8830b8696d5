//! Rollcall Core — domain models, error taxonomy, and the store and
//! collaborator contracts shared across all crates.

pub mod clock;
pub mod error;
pub mod models;
pub mod proximity;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use error::{RollcallError, RollcallResult};
pub use models::attendance::AttendanceRecord;
pub use models::claim::Claim;
pub use models::reason::RejectReason;
pub use models::session::{Session, SessionState};
pub use proximity::{ProximityAttestor, clamp_confidence};
pub use store::SessionStore;
