//! Ordered, de-duplicated skill list

use serde::{Deserialize, Serialize};

/// Maximum number of skills a profile may list
pub const MAX_SKILLS: usize = 10;

/// Why a skill could not be added
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillRejection {
    /// Empty after trimming
    Blank,
    /// Already in the set
    Duplicate,
    /// The set already holds `MAX_SKILLS` entries
    CapReached,
}

/// Ordered set of skills.
///
/// Invariants: no duplicates, at most [`MAX_SKILLS`] entries, no blank
/// entries. Lists coming off the wire are normalised on deserialization
/// rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SkillSet(Vec<String>);

impl SkillSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a skill at the end.
    ///
    /// The duplicate check runs before the cap check, so a full set still
    /// reports `Duplicate` for a skill it already holds.
    pub fn try_add(&mut self, skill: &str) -> Result<(), SkillRejection> {
        let skill = skill.trim();
        if skill.is_empty() {
            return Err(SkillRejection::Blank);
        }
        if self.contains(skill) {
            return Err(SkillRejection::Duplicate);
        }
        if self.0.len() >= MAX_SKILLS {
            return Err(SkillRejection::CapReached);
        }
        self.0.push(skill.to_string());
        Ok(())
    }

    /// Remove a skill; returns whether it was present
    pub fn remove(&mut self, skill: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|s| s != skill.trim());
        self.0.len() != before
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.0.iter().any(|s| s == skill)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.0.len() >= MAX_SKILLS
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for SkillSet {
    fn from(skills: Vec<String>) -> Self {
        let mut set = SkillSet::new();
        for skill in &skills {
            // Rejections are dropped: this is normalisation, not user input
            let _ = set.try_add(skill);
        }
        set
    }
}

impl From<SkillSet> for Vec<String> {
    fn from(set: SkillSet) -> Self {
        set.0
    }
}

impl<'a> FromIterator<&'a str> for SkillSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>()
            .into()
    }
}
