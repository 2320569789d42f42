//! The resume data model.
//!
//! A [`Profile`] is the complete set of facts a resume can show. Which
//! sections appear, in what order, and how densely, is decided elsewhere by
//! [`folio_params::ResumeParams`]; the profile itself is layout-agnostic.

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub personal: Personal,
    pub summary: String,
    /// Longer-form paragraphs for the about section.
    pub about: Vec<String>,
    pub skills: Vec<SkillCategory>,
    pub experience: Vec<ExperienceItem>,
    pub projects: Vec<Project>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Personal {
    pub name: String,
    pub title: String,
    pub email: String,
    pub location: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Link {
    pub label: String,
    pub url: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SkillCategory {
    pub name: String,
    pub items: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExperienceItem {
    pub role: String,
    pub company: String,
    pub start: String,
    /// Free-form, `"Present"` for an ongoing position.
    pub end: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    /// One-line replacement for the highlights in the compact variant.
    #[serde(default)]
    pub compact_description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub tech: Vec<String>,
}

impl Profile {
    /// The sample profile embedded in the binary, used when no profile file
    /// is configured.
    pub fn sample() -> Result<Self> {
        let file = crate::renderer::Assets::get("profile.json")
            .ok_or_raise(|| ErrorKind::Asset("profile.json".to_string()))?;
        serde_json::from_slice(&file.data)
            .or_raise(|| ErrorKind::Profile("embedded sample profile".to_string()))
    }

    /// Loads a profile from a JSON file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data =
            std::fs::read(path).or_raise(|| ErrorKind::Profile(path.display().to_string()))?;
        serde_json::from_slice(&data).or_raise(|| ErrorKind::Profile(path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_profile_parses() {
        let profile = Profile::sample().unwrap();
        assert!(!profile.personal.name.is_empty());
        assert!(!profile.summary.is_empty());
        assert!(!profile.experience.is_empty());
    }

    #[test]
    fn test_missing_file_is_profile_error() {
        let err = Profile::from_file("/definitely/not/profile.json").unwrap_err();
        assert!(matches!(&*err, ErrorKind::Profile(_)));
    }
}
