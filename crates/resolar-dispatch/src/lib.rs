//! Command dispatch for the Resolar daemon.
//!
//! Clients send a [`Command`]; the [`CommandDispatcher`] performs it against
//! the notes service through the authenticated client and answers with an
//! [`Outcome`] of the same shape for every action.

mod command;
mod dispatcher;
mod error;
mod outcome;

pub use command::{
    Command, HighlightSubmission, HighlightToggle, LoginParams, NewSubject, PageEndpoint,
    PageSubmission, Subject, SubjectQuery, SubjectSelection,
};
pub use dispatcher::{classify, CommandDispatcher, DispatchResult};
pub use error::{DispatchError, NO_HIGHLIGHTS_SELECTED, PAGE_CONTENT_UNAVAILABLE};
pub use outcome::Outcome;
