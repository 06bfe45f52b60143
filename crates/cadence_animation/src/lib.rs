//! Cadence Animation
//!
//! Host-clocked animation primitives:
//!
//! - **Springs**: RK4 spring physics for counters and indicators
//! - **Easing**: standard curves plus CSS-style cubic Béziers
//! - **Tweens**: delayed, eased transitions sampled by timestamp

pub mod easing;
pub mod spring;
pub mod tween;

pub use easing::Easing;
pub use spring::{Spring, SpringConfig, MAX_SUBSTEPS};
pub use tween::{Interpolate, Tween, TweenPhase};
