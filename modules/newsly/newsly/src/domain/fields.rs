use std::fmt;
use std::str::FromStr;

use newsly_sdk::{Location, UserProfile};

use super::error::WizardError;
use super::options::{MAX_YEAR_IN_PROGRAM, REGION_COUNTRIES};

/// Shape of the value a profile field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    List,
    Number,
    Flag,
    Location,
}

impl FieldKind {
    fn expected(self) -> &'static str {
        match self {
            Self::Text => "a text value",
            Self::List => "a list of options",
            Self::Number => "a number",
            Self::Flag => "true or false",
            Self::Location => "a location",
        }
    }
}

/// Addressable field of [`UserProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Name,
    Email,
    AgeRange,
    PrimaryInterests,
    EducationLevel,
    Location,
    Region,
    FieldOfStudy,
    SecondaryField,
    YearInProgram,
    CareerStage,
    TargetIndustries,
    SecondaryInterests,
    AcademicSubjects,
    Hobbies,
    TopicsToAvoid,
    PreferredComplexity,
    PreferredArticleLength,
    NewsFrequency,
    PreferredContentTypes,
    PoliticalOrientation,
    InternationalFocus,
    LocalFocus,
    BreakingNewsPriority,
    ReadingTimePreference,
    DevicePreference,
}

impl ProfileField {
    pub const ALL: [Self; 26] = [
        Self::Name,
        Self::Email,
        Self::AgeRange,
        Self::PrimaryInterests,
        Self::EducationLevel,
        Self::Location,
        Self::Region,
        Self::FieldOfStudy,
        Self::SecondaryField,
        Self::YearInProgram,
        Self::CareerStage,
        Self::TargetIndustries,
        Self::SecondaryInterests,
        Self::AcademicSubjects,
        Self::Hobbies,
        Self::TopicsToAvoid,
        Self::PreferredComplexity,
        Self::PreferredArticleLength,
        Self::NewsFrequency,
        Self::PreferredContentTypes,
        Self::PoliticalOrientation,
        Self::InternationalFocus,
        Self::LocalFocus,
        Self::BreakingNewsPriority,
        Self::ReadingTimePreference,
        Self::DevicePreference,
    ];

    /// Key used in the stored profile JSON.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::AgeRange => "ageRange",
            Self::PrimaryInterests => "primaryInterests",
            Self::EducationLevel => "educationLevel",
            Self::Location => "location",
            Self::Region => "region",
            Self::FieldOfStudy => "fieldOfStudy",
            Self::SecondaryField => "secondaryField",
            Self::YearInProgram => "yearInProgram",
            Self::CareerStage => "careerStage",
            Self::TargetIndustries => "targetIndustries",
            Self::SecondaryInterests => "secondaryInterests",
            Self::AcademicSubjects => "academicSubjects",
            Self::Hobbies => "hobbies",
            Self::TopicsToAvoid => "topicsToAvoid",
            Self::PreferredComplexity => "preferredComplexity",
            Self::PreferredArticleLength => "preferredArticleLength",
            Self::NewsFrequency => "newsFrequency",
            Self::PreferredContentTypes => "preferredContentTypes",
            Self::PoliticalOrientation => "politicalOrientation",
            Self::InternationalFocus => "internationalFocus",
            Self::LocalFocus => "localFocus",
            Self::BreakingNewsPriority => "breakingNewsPriority",
            Self::ReadingTimePreference => "readingTimePreference",
            Self::DevicePreference => "devicePreference",
        }
    }

    #[must_use]
    pub fn kind(self) -> FieldKind {
        match self {
            Self::PrimaryInterests
            | Self::TargetIndustries
            | Self::SecondaryInterests
            | Self::AcademicSubjects
            | Self::Hobbies
            | Self::TopicsToAvoid
            | Self::PreferredContentTypes => FieldKind::List,
            Self::YearInProgram => FieldKind::Number,
            Self::InternationalFocus | Self::LocalFocus | Self::BreakingNewsPriority => {
                FieldKind::Flag
            }
            Self::Location => FieldKind::Location,
            _ => FieldKind::Text,
        }
    }

    /// Current selection of a list field; empty for other kinds.
    #[must_use]
    pub fn list(self, profile: &UserProfile) -> &[String] {
        match self {
            Self::PrimaryInterests => &profile.primary_interests,
            Self::TargetIndustries => &profile.target_industries,
            Self::SecondaryInterests => &profile.secondary_interests,
            Self::AcademicSubjects => &profile.academic_subjects,
            Self::Hobbies => &profile.hobbies,
            Self::TopicsToAvoid => &profile.topics_to_avoid,
            Self::PreferredContentTypes => &profile.preferred_content_types,
            _ => &[],
        }
    }

    /// Current answer of a text field.
    #[must_use]
    pub fn text(self, profile: &UserProfile) -> Option<&str> {
        let value = match self {
            Self::Name => &profile.name,
            Self::Email => &profile.email,
            Self::AgeRange => &profile.age_range,
            Self::EducationLevel => &profile.education_level,
            Self::FieldOfStudy => &profile.field_of_study,
            Self::SecondaryField => &profile.secondary_field,
            Self::CareerStage => &profile.career_stage,
            Self::PreferredComplexity => &profile.preferred_complexity,
            Self::PreferredArticleLength => &profile.preferred_article_length,
            Self::NewsFrequency => &profile.news_frequency,
            Self::PoliticalOrientation => &profile.political_orientation,
            Self::ReadingTimePreference => &profile.reading_time_preference,
            Self::DevicePreference => &profile.device_preference,
            Self::Region => {
                return profile
                    .location
                    .as_ref()
                    .and_then(|l| l.region.as_deref());
            }
            _ => return None,
        };
        value.as_deref()
    }

    #[must_use]
    pub fn flag(self, profile: &UserProfile) -> Option<bool> {
        match self {
            Self::InternationalFocus => profile.international_focus,
            Self::LocalFocus => profile.local_focus,
            Self::BreakingNewsPriority => profile.breaking_news_priority,
            _ => None,
        }
    }

    fn text_slot(self, profile: &mut UserProfile) -> Option<&mut Option<String>> {
        Some(match self {
            Self::Name => &mut profile.name,
            Self::Email => &mut profile.email,
            Self::AgeRange => &mut profile.age_range,
            Self::EducationLevel => &mut profile.education_level,
            Self::FieldOfStudy => &mut profile.field_of_study,
            Self::SecondaryField => &mut profile.secondary_field,
            Self::CareerStage => &mut profile.career_stage,
            Self::PreferredComplexity => &mut profile.preferred_complexity,
            Self::PreferredArticleLength => &mut profile.preferred_article_length,
            Self::NewsFrequency => &mut profile.news_frequency,
            Self::PoliticalOrientation => &mut profile.political_orientation,
            Self::ReadingTimePreference => &mut profile.reading_time_preference,
            Self::DevicePreference => &mut profile.device_preference,
            _ => return None,
        })
    }

    fn list_slot(self, profile: &mut UserProfile) -> Option<&mut Vec<String>> {
        Some(match self {
            Self::PrimaryInterests => &mut profile.primary_interests,
            Self::TargetIndustries => &mut profile.target_industries,
            Self::SecondaryInterests => &mut profile.secondary_interests,
            Self::AcademicSubjects => &mut profile.academic_subjects,
            Self::Hobbies => &mut profile.hobbies,
            Self::TopicsToAvoid => &mut profile.topics_to_avoid,
            Self::PreferredContentTypes => &mut profile.preferred_content_types,
            _ => return None,
        })
    }

    fn flag_slot(self, profile: &mut UserProfile) -> Option<&mut Option<bool>> {
        Some(match self {
            Self::InternationalFocus => &mut profile.international_focus,
            Self::LocalFocus => &mut profile.local_focus,
            Self::BreakingNewsPriority => &mut profile.breaking_news_priority,
            _ => return None,
        })
    }

    fn mismatch(self) -> WizardError {
        WizardError::TypeMismatch {
            field: self,
            expected: self.kind().expected(),
        }
    }

    /// Merge `value` into `profile`.
    ///
    /// # Errors
    /// `WizardError::TypeMismatch` when the value does not fit the field.
    pub fn apply(self, profile: &mut UserProfile, value: FieldValue) -> Result<(), WizardError> {
        match value {
            FieldValue::Clear => {
                self.clear(profile);
                Ok(())
            }
            FieldValue::Text(text) if self == Self::Region => {
                profile.location.get_or_insert_with(Location::default).region = Some(text);
                Ok(())
            }
            FieldValue::Text(text) => {
                let slot = self.text_slot(profile).ok_or_else(|| self.mismatch())?;
                *slot = Some(text);
                Ok(())
            }
            FieldValue::List(items) => {
                let slot = self.list_slot(profile).ok_or_else(|| self.mismatch())?;
                *slot = items;
                Ok(())
            }
            FieldValue::Flag(flag) => {
                let slot = self.flag_slot(profile).ok_or_else(|| self.mismatch())?;
                *slot = Some(flag);
                Ok(())
            }
            FieldValue::Number(n) if self == Self::YearInProgram => {
                if n == 0 || n > MAX_YEAR_IN_PROGRAM {
                    return Err(WizardError::TypeMismatch {
                        field: self,
                        expected: "a year from 1 to 10",
                    });
                }
                profile.year_in_program = Some(n);
                Ok(())
            }
            FieldValue::Location(mut location) if self == Self::Location => {
                // A region only means something for countries that ask for one.
                if !REGION_COUNTRIES.contains(&location.country.as_str()) {
                    location.region = None;
                }
                profile.location = Some(location);
                Ok(())
            }
            FieldValue::Number(_) | FieldValue::Location(_) => Err(self.mismatch()),
        }
    }

    fn clear(self, profile: &mut UserProfile) {
        match self {
            Self::YearInProgram => profile.year_in_program = None,
            Self::Location => profile.location = None,
            Self::Region => {
                if let Some(location) = profile.location.as_mut() {
                    location.region = None;
                }
            }
            _ => {
                if let Some(slot) = self.text_slot(profile) {
                    *slot = None;
                } else if let Some(slot) = self.list_slot(profile) {
                    slot.clear();
                } else if let Some(slot) = self.flag_slot(profile) {
                    *slot = None;
                }
            }
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ProfileField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| format!("unknown profile field '{s}'"))
    }
}

/// New value for a profile field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Number(u32),
    Flag(bool),
    Location(Location),
    /// Remove the answer.
    Clear,
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}
