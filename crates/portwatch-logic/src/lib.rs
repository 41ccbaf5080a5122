//! Pure ship-layout logic for Portwatch.
//!
//! This crate contains the procedural generation math that is independent
//! of any scene graph, engine, or runtime. Functions take plain data and
//! return plain data, making them unit-testable and portable.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`dimensions`] | Ship dimension generation and validation |
//! | [`layout`] | Center-out structural grid builder (11 part kinds) |
//! | [`spline`] | Cubic Bézier routes and the vector math they need |
//! | [`template`] | 17×9 cargo template and priority-based trimming |

pub mod dimensions;
pub mod layout;
pub mod spline;
pub mod template;
