//! # CLI Layer
//!
//! One client of the memo library; the browser extension shell is another.
//! This is the only place that knows about terminal I/O, process exit codes
//! and argument parsing.
//!
//! For `capture` the CLI plays every browser role in-process: it opens a
//! single tab over the page given on the command line, routes messages
//! through the same [`memo::relay::BackgroundRouter`] and
//! [`memo::relay::TabAgent`] a browser would, and drives a
//! [`memo::controller::Controller`] with a terminal [`view::TerminalView`].

pub mod commands;
mod print;
mod setup;
mod view;
