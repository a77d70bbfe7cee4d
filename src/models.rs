use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Developer,
    Designer,
    Manager,
}

impl Position {
    pub const ALL: [Position; 3] = [Position::Developer, Position::Designer, Position::Manager];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Developer => "Developer",
            Position::Designer => "Designer",
            Position::Manager => "Manager",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Skill {
    JavaScript,
    #[serde(rename = "CSS")]
    Css,
    Python,
}

impl Skill {
    pub const ALL: [Skill; 3] = [Skill::JavaScript, Skill::Css, Skill::Python];

    pub fn as_str(&self) -> &'static str {
        match self {
            Skill::JavaScript => "JavaScript",
            Skill::Css => "CSS",
            Skill::Python => "Python",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FullName,
    Email,
    PhoneNumber,
    ApplyingFor,
    RelevantExperience,
    PortfolioUrl,
    ManagementExperience,
    AdditionalSkills,
    PreferredInterviewTime,
}

impl Field {
    pub fn wire_name(&self) -> &'static str {
        match self {
            Field::FullName => "fullName",
            Field::Email => "email",
            Field::PhoneNumber => "phoneNumber",
            Field::ApplyingFor => "applyingFor",
            Field::RelevantExperience => "relevantExperience",
            Field::PortfolioUrl => "portfolioURL",
            Field::ManagementExperience => "managementExperience",
            Field::AdditionalSkills => "additionalSkills",
            Field::PreferredInterviewTime => "preferredInterviewTime",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::FullName => "Full Name",
            Field::Email => "Email",
            Field::PhoneNumber => "Phone Number",
            Field::ApplyingFor => "Applying for Position",
            Field::RelevantExperience => "Relevant Experience (Years)",
            Field::PortfolioUrl => "Portfolio URL",
            Field::ManagementExperience => "Management Experience",
            Field::AdditionalSkills => "Additional Skills",
            Field::PreferredInterviewTime => "Preferred Interview Time",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationRecord {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(with = "position_or_empty")]
    pub applying_for: Option<Position>,
    pub relevant_experience: String,
    #[serde(rename = "portfolioURL")]
    pub portfolio_url: String,
    pub management_experience: String,
    pub additional_skills: BTreeSet<Skill>,
    pub preferred_interview_time: String,
}

impl ApplicationRecord {
    pub fn text(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::FullName => &self.full_name,
            Field::Email => &self.email,
            Field::PhoneNumber => &self.phone_number,
            Field::RelevantExperience => &self.relevant_experience,
            Field::PortfolioUrl => &self.portfolio_url,
            Field::ManagementExperience => &self.management_experience,
            Field::PreferredInterviewTime => &self.preferred_interview_time,
            Field::ApplyingFor | Field::AdditionalSkills => return None,
        };
        Some(value.as_str())
    }
}

// An unselected position travels as "" so the JSON matches what the form shows.
mod position_or_empty {
    use super::Position;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Position>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.map(|p| p.as_str()).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Position>, D::Error> {
        let raw = String::deserialize(d)?;
        if raw.is_empty() {
            return Ok(None);
        }
        Position::ALL
            .into_iter()
            .find(|p| p.as_str() == raw)
            .map(Some)
            .ok_or_else(|| {
                D::Error::custom(format!(
                    "unknown position '{}', expected Developer, Designer, Manager or \"\"",
                    raw
                ))
            })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(flatten)]
    pub record: ApplicationRecord,
    pub submitted_at: String,
}

impl Submission {
    pub fn new(record: ApplicationRecord) -> Self {
        Self {
            record,
            submitted_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
