//! # Voxel Task System
//!
//! This module contains tasks related to voxel world generation. They are processed
//! by the task manager's workers so generation of many chunks proceeds in parallel.

pub mod chunk_generation_task;
