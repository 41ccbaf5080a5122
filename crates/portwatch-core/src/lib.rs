//! Portwatch core: scene graph, asset pool and harbor traffic.
//!
//! Sits on top of `portwatch-logic` and adds everything stateful:
//!
//! | Module      | Contents                                          |
//! |-------------|---------------------------------------------------|
//! | `scene`     | hecs-backed scene graph and transform components  |
//! | `pool`      | pre-spawned asset pool with tagged selection      |
//! | `placement` | phase-by-phase ship assembly                      |
//! | `walker`    | per-tick spline advancement with one-shot arrival |
//! | `traffic`   | two-slot ship lifecycle orchestration             |
//! | `score`     | routing outcome counters                          |
//! | `interact`  | interactable capability for cargo containers      |
//! | `engine`    | orchestrating root owning one of everything       |

pub mod engine;
pub mod interact;
pub mod placement;
pub mod pool;
pub mod scene;
pub mod score;
pub mod traffic;
pub mod walker;
