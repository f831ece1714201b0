//! Service layer for the review watcher.
//!
//! This module contains the two external collaborators:
//! - Review API querying (`PracticumClient`)
//! - Message delivery (`TelegramMessenger`)

mod fetcher;
mod messenger;

pub use fetcher::{HomeworkSource, PracticumClient};
pub use messenger::{Messenger, TelegramMessenger};
