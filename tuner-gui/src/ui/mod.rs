//! # UI Module
//!
//! This module contains all UI components for the pitch tuner application.

pub mod history;
pub mod keyboard;
pub mod main_display;
pub mod needle;
