//! Role editor dialog of the cim console.
//!
//! The dialog is split the way data flows through it: [`field`] holds the
//! values and their rules, [`dialog`] is the state container and its
//! reducer, [`controller`] runs the reducer's effects against a
//! [`client::RoleApi`], and [`view`] lays the state out for display.

pub mod client;
pub mod config;
pub mod controller;
pub mod dialog;
pub mod field;
pub mod i18n;
pub mod model;
pub mod notify;
pub mod view;

pub use client::{HttpRoleApi, RoleApi};
pub use config::{load, ConsoleConfig};
pub use controller::{CloseHandle, Props, RoleDialog, Submission};
pub use i18n::Locale;
pub use notify::{Notifier, TracingNotifier};
