//! Resume data model and HTML renderer.
//!
//! [`Profile`] holds the facts, [`ResumeRenderer`] turns them into a
//! self-describing HTML document under a set of
//! [`folio_params::ResumeParams`], and [`ThemeVariables`] layers CSS custom
//! properties on top of an already rendered document.

pub mod error;
mod profile;
mod renderer;
mod theme;

pub use profile::{ExperienceItem, Link, Personal, Profile, Project, SkillCategory};
pub use renderer::{MARKER_ID, ResumeRenderer};
pub use theme::ThemeVariables;
