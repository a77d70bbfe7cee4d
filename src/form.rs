use crate::models::{ApplicationRecord, Field, Position, Skill};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    FullName(String),
    Email(String),
    PhoneNumber(String),
    ApplyingFor(Option<Position>),
    RelevantExperience(String),
    PortfolioUrl(String),
    ManagementExperience(String),
    PreferredInterviewTime(String),
}

impl FieldUpdate {
    /// `None` for the position selector and skills, which have their own update paths.
    pub fn text(field: Field, value: String) -> Option<Self> {
        let update = match field {
            Field::FullName => FieldUpdate::FullName(value),
            Field::Email => FieldUpdate::Email(value),
            Field::PhoneNumber => FieldUpdate::PhoneNumber(value),
            Field::RelevantExperience => FieldUpdate::RelevantExperience(value),
            Field::PortfolioUrl => FieldUpdate::PortfolioUrl(value),
            Field::ManagementExperience => FieldUpdate::ManagementExperience(value),
            Field::PreferredInterviewTime => FieldUpdate::PreferredInterviewTime(value),
            Field::ApplyingFor | Field::AdditionalSkills => return None,
        };
        Some(update)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    record: ApplicationRecord,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: ApplicationRecord) -> Self {
        Self { record }
    }

    pub fn record(&self) -> &ApplicationRecord {
        &self.record
    }

    pub fn set_field(&mut self, update: FieldUpdate) {
        let record = &mut self.record;
        match update {
            FieldUpdate::FullName(v) => record.full_name = v,
            FieldUpdate::Email(v) => record.email = v,
            FieldUpdate::PhoneNumber(v) => record.phone_number = v,
            FieldUpdate::ApplyingFor(v) => record.applying_for = v,
            FieldUpdate::RelevantExperience(v) => record.relevant_experience = v,
            FieldUpdate::PortfolioUrl(v) => record.portfolio_url = v,
            FieldUpdate::ManagementExperience(v) => record.management_experience = v,
            FieldUpdate::PreferredInterviewTime(v) => record.preferred_interview_time = v,
        }
    }

    pub fn toggle_skill(&mut self, skill: Skill) {
        let skills = &mut self.record.additional_skills;
        if !skills.remove(&skill) {
            skills.insert(skill);
        }
    }

    pub fn visible_fields(&self) -> Vec<Field> {
        visible_fields(self.record.applying_for)
    }
}

// Hidden fields keep their values.
pub fn visible_fields(applying_for: Option<Position>) -> Vec<Field> {
    let mut fields = vec![
        Field::FullName,
        Field::Email,
        Field::PhoneNumber,
        Field::ApplyingFor,
    ];
    match applying_for {
        Some(Position::Developer) => fields.push(Field::RelevantExperience),
        Some(Position::Designer) => {
            fields.push(Field::RelevantExperience);
            fields.push(Field::PortfolioUrl);
        }
        Some(Position::Manager) => fields.push(Field::ManagementExperience),
        None => {}
    }
    fields.push(Field::AdditionalSkills);
    fields.push(Field::PreferredInterviewTime);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_field_stores_malformed_values() {
        let mut form = FormState::new();
        form.set_field(FieldUpdate::Email("not an email".to_string()));
        form.set_field(FieldUpdate::PhoneNumber("call me".to_string()));
        assert_eq!(form.record().email, "not an email");
        assert_eq!(form.record().phone_number, "call me");
    }

    #[test]
    fn test_toggle_skill_twice_restores_set() {
        let mut form = FormState::new();
        form.toggle_skill(Skill::Css);
        let before = form.record().additional_skills.clone();

        form.toggle_skill(Skill::Python);
        assert!(form.record().additional_skills.contains(&Skill::Python));
        form.toggle_skill(Skill::Python);
        assert_eq!(form.record().additional_skills, before);
    }

    #[test]
    fn test_text_update_only_for_text_fields() {
        assert_eq!(
            FieldUpdate::text(Field::PortfolioUrl, "x".to_string()),
            Some(FieldUpdate::PortfolioUrl("x".to_string()))
        );
        assert_eq!(FieldUpdate::text(Field::ApplyingFor, "Manager".to_string()), None);
        assert_eq!(FieldUpdate::text(Field::AdditionalSkills, "CSS".to_string()), None);
    }

    #[test]
    fn test_visible_fields_follow_position() {
        let none = visible_fields(None);
        assert!(!none.contains(&Field::RelevantExperience));
        assert!(!none.contains(&Field::PortfolioUrl));
        assert!(!none.contains(&Field::ManagementExperience));
        assert_eq!(none.len(), 6);

        let dev = visible_fields(Some(Position::Developer));
        assert!(dev.contains(&Field::RelevantExperience));
        assert!(!dev.contains(&Field::PortfolioUrl));

        let designer = visible_fields(Some(Position::Designer));
        assert!(designer.contains(&Field::RelevantExperience));
        assert!(designer.contains(&Field::PortfolioUrl));

        let manager = visible_fields(Some(Position::Manager));
        assert_eq!(
            manager,
            vec![
                Field::FullName,
                Field::Email,
                Field::PhoneNumber,
                Field::ApplyingFor,
                Field::ManagementExperience,
                Field::AdditionalSkills,
                Field::PreferredInterviewTime,
            ]
        );
    }

    #[test]
    fn test_changing_position_keeps_hidden_values() {
        let mut form = FormState::new();
        form.set_field(FieldUpdate::ApplyingFor(Some(Position::Designer)));
        form.set_field(FieldUpdate::PortfolioUrl("https://ada.design".to_string()));
        form.set_field(FieldUpdate::ApplyingFor(Some(Position::Manager)));
        assert!(!form.visible_fields().contains(&Field::PortfolioUrl));
        assert_eq!(form.record().portfolio_url, "https://ada.design");
    }
}
