//! Reusable UI components

pub mod status_bar;
