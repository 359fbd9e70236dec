use std::fmt;
use std::str::FromStr;

use newsly_sdk::UserProfile;

use super::fields::ProfileField;
use super::options::REGION_COUNTRIES;

/// Identifier of an onboarding step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepId {
    Name,
    Email,
    Age,
    Interests,
    Education,
    Location,
    Region,
    Field,
    SecondaryField,
    YearInProgram,
    Career,
    TargetIndustries,
    SecondaryInterests,
    AcademicSubjects,
    Hobbies,
    TopicsToAvoid,
    PreferredComplexity,
    ArticleLength,
    NewsFrequency,
    ContentTypes,
    PoliticalOrientation,
    NewsFocus,
    BreakingNews,
    ReadingTime,
    DevicePreference,
}

impl StepId {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Age => "age",
            Self::Interests => "interests",
            Self::Education => "education",
            Self::Location => "location",
            Self::Region => "region",
            Self::Field => "field",
            Self::SecondaryField => "secondaryField",
            Self::YearInProgram => "yearInProgram",
            Self::Career => "career",
            Self::TargetIndustries => "targetIndustries",
            Self::SecondaryInterests => "secondaryInterests",
            Self::AcademicSubjects => "academicSubjects",
            Self::Hobbies => "hobbies",
            Self::TopicsToAvoid => "topicsToAvoid",
            Self::PreferredComplexity => "preferredComplexity",
            Self::ArticleLength => "articleLength",
            Self::NewsFrequency => "newsFrequency",
            Self::ContentTypes => "contentTypes",
            Self::PoliticalOrientation => "politicalOrientation",
            Self::NewsFocus => "newsFocus",
            Self::BreakingNews => "breakingNews",
            Self::ReadingTime => "readingTime",
            Self::DevicePreference => "devicePreference",
        }
    }

    /// Profile fields the step writes.
    #[must_use]
    pub fn fields(self) -> &'static [ProfileField] {
        match self {
            Self::Name => &[ProfileField::Name],
            Self::Email => &[ProfileField::Email],
            Self::Age => &[ProfileField::AgeRange],
            Self::Interests => &[ProfileField::PrimaryInterests],
            Self::Education => &[ProfileField::EducationLevel],
            Self::Location => &[ProfileField::Location],
            Self::Region => &[ProfileField::Region],
            Self::Field => &[ProfileField::FieldOfStudy],
            Self::SecondaryField => &[ProfileField::SecondaryField],
            Self::YearInProgram => &[ProfileField::YearInProgram],
            Self::Career => &[ProfileField::CareerStage],
            Self::TargetIndustries => &[ProfileField::TargetIndustries],
            Self::SecondaryInterests => &[ProfileField::SecondaryInterests],
            Self::AcademicSubjects => &[ProfileField::AcademicSubjects],
            Self::Hobbies => &[ProfileField::Hobbies],
            Self::TopicsToAvoid => &[ProfileField::TopicsToAvoid],
            Self::PreferredComplexity => &[ProfileField::PreferredComplexity],
            Self::ArticleLength => &[ProfileField::PreferredArticleLength],
            Self::NewsFrequency => &[ProfileField::NewsFrequency],
            Self::ContentTypes => &[ProfileField::PreferredContentTypes],
            Self::PoliticalOrientation => &[ProfileField::PoliticalOrientation],
            Self::NewsFocus => &[ProfileField::InternationalFocus, ProfileField::LocalFocus],
            Self::BreakingNews => &[ProfileField::BreakingNewsPriority],
            Self::ReadingTime => &[ProfileField::ReadingTimePreference],
            Self::DevicePreference => &[ProfileField::DevicePreference],
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATALOG
            .iter()
            .map(|step| step.id)
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown onboarding step '{s}'"))
    }
}

/// Immutable entry of the step catalog.
#[derive(Debug, Clone, Copy)]
pub struct StepDescriptor {
    pub id: StepId,
    pub title: &'static str,
    pub required: bool,
    /// Step is shown only while this holds for the profile.
    pub conditional: Option<fn(&UserProfile) -> bool>,
}

impl StepDescriptor {
    const fn required(id: StepId, title: &'static str) -> Self {
        Self {
            id,
            title,
            required: true,
            conditional: None,
        }
    }

    const fn optional(id: StepId, title: &'static str) -> Self {
        Self {
            id,
            title,
            required: false,
            conditional: None,
        }
    }

    #[must_use]
    pub fn is_visible(&self, profile: &UserProfile) -> bool {
        self.conditional.is_none_or(|shown| shown(profile))
    }
}

fn has_regional_country(profile: &UserProfile) -> bool {
    profile
        .location
        .as_ref()
        .is_some_and(|l| REGION_COUNTRIES.contains(&l.country.as_str()))
}

/// Every onboarding step in presentation order, which is also `StepId`
/// declaration order.
pub static CATALOG: [StepDescriptor; 25] = [
    StepDescriptor::required(StepId::Name, "Name"),
    StepDescriptor::required(StepId::Email, "Email"),
    StepDescriptor::required(StepId::Age, "Age Range"),
    StepDescriptor::required(StepId::Interests, "Primary Interests"),
    StepDescriptor::required(StepId::Education, "Education Level"),
    StepDescriptor::optional(StepId::Location, "Location"),
    StepDescriptor {
        id: StepId::Region,
        title: "Region",
        required: false,
        conditional: Some(has_regional_country),
    },
    StepDescriptor::optional(StepId::Field, "Field of Study"),
    StepDescriptor::optional(StepId::SecondaryField, "Secondary Field"),
    StepDescriptor::optional(StepId::YearInProgram, "Year in Program"),
    StepDescriptor::optional(StepId::Career, "Career Stage"),
    StepDescriptor::optional(StepId::TargetIndustries, "Target Industries"),
    StepDescriptor::optional(StepId::SecondaryInterests, "Secondary Interests"),
    StepDescriptor::optional(StepId::AcademicSubjects, "Academic Subjects"),
    StepDescriptor::optional(StepId::Hobbies, "Hobbies"),
    StepDescriptor::optional(StepId::TopicsToAvoid, "Topics to Avoid"),
    StepDescriptor::optional(StepId::PreferredComplexity, "Preferred Complexity"),
    StepDescriptor::optional(StepId::ArticleLength, "Preferred Article Length"),
    StepDescriptor::optional(StepId::NewsFrequency, "News Reading Frequency"),
    StepDescriptor::optional(StepId::ContentTypes, "Preferred Content Types"),
    StepDescriptor::optional(StepId::PoliticalOrientation, "Political Orientation"),
    StepDescriptor::optional(StepId::NewsFocus, "News Focus"),
    StepDescriptor::optional(StepId::BreakingNews, "Breaking News Priority"),
    StepDescriptor::optional(StepId::ReadingTime, "Reading Time Preference"),
    StepDescriptor::optional(StepId::DevicePreference, "Device Preference"),
];

/// Catalog entries whose condition holds for `profile`, in catalog order.
#[must_use]
pub fn visible_steps(profile: &UserProfile) -> Vec<&'static StepDescriptor> {
    CATALOG.iter().filter(|step| step.is_visible(profile)).collect()
}

/// Catalog entry of `id`.
#[must_use]
pub fn descriptor(id: StepId) -> &'static StepDescriptor {
    // CATALOG lists the steps in StepId declaration order.
    &CATALOG[id as usize]
}
