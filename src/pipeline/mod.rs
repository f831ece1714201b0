//! Pipeline stages for a poll cycle.
//!
//! - `check_response`: Validate the raw API reply
//! - `parse_status`: Render the latest homework as a status message
//! - `Notifier`: Deliver messages, suppressing repeated errors
//! - `Poller`: Drive the cycle in a loop

pub mod memo;
pub mod notify;
pub mod poll;
pub mod translate;
pub mod validate;

pub use memo::ErrorMemo;
pub use notify::{ErrorDelivery, Notifier};
pub use poll::{CycleReport, Poller, check_credentials, prepare};
pub use translate::parse_status;
pub use validate::check_response;
