//! Resource Services
//!
//! Thin accessors over the executor and paginator.

pub mod account;
pub mod documents;
pub mod saver;
pub mod users;

pub use account::AccountService;
pub use documents::DocumentsService;
pub use saver::save_json_to_file;
pub use users::{UserAction, UserActionOutcome, UsersService};
