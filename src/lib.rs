//! Terminal vocabulary trainer: word sets, multiple-choice quizzes,
//! offline translation and bookmarks.

rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod compose;
pub mod config;
pub mod event;
pub mod logging;
pub mod nav;
pub mod quiz;
pub mod store;
pub mod translate;
pub mod ui;
