//! A menu bar indicator showing which Mission Control Space is active.

pub mod actor;
pub mod app;
pub mod common;
pub mod model;
pub mod sys;
pub mod ui;
