//! Testing infrastructure for healthmap.
//!
//! - **[`TestWorld`]**: in-memory catalog, system configuration and fact store
//!   implementing every collaborator trait, with per-entity failure toggles
//! - **Assertion macros**: [`crate::assert_status!`] and
//!   [`crate::assert_result_err!`]
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use healthmap::testkit::TestWorld;
//! use healthmap::engine::Engine;
//!
//! let world = TestWorld::new()
//!     .with_system("shop", &["cart", "checkout"])
//!     .with_checks(MetricSource::SonarQube, "cart", CheckResultSet::new().with("gate", false));
//!
//! let config = HealthmapConfig::default();
//! let result = Engine::new(world.collaborators(), &config)
//!     .evaluate(MetricSource::SonarQube, &world.components(&["cart", "checkout"]));
//! ```

pub mod assertions;
mod world;

pub use world::TestWorld;
