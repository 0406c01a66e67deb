//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource area.
//! Handlers delegate to the repositories in `closer_db` (and the calendar
//! client in `closer_calendar`) and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod calendar;
pub mod leads;
pub mod pipeline;
