//! ECS resources shared by the animator systems.
//!
//! Overview
//! - `actionaliases` – synonym table normalizing script action names
//! - `animatorconfig` – sheet geometry, placement, frame rates, options (INI)
//! - `playerinput` – directional input for the controllable character
//! - `sheetlayout` – layout table, pose resolution, sequence building
pub mod actionaliases;
pub mod animatorconfig;
pub mod playerinput;
pub mod sheetlayout;
