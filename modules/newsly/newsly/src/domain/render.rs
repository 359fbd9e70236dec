use newsly_sdk::UserProfile;

use super::catalog::{StepDescriptor, StepId};
use super::fields::ProfileField;
use super::options::{
    ACADEMIC_SUBJECTS, AGE_RANGES, ARTICLE_LENGTHS, CAREER_STAGES, COMPLEXITY_LEVELS,
    CONTENT_TYPES, DEVICES, EDUCATION_LEVELS, HOBBIES, MAX_PRIMARY_INTERESTS, MAX_YEAR_IN_PROGRAM,
    NEWS_FREQUENCIES, POLITICAL_ORIENTATIONS, PRIMARY_INTERESTS, READING_TIMES, TARGET_INDUSTRIES,
    TOPICS_TO_AVOID,
};

/// Everything a front end needs to draw one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView {
    pub id: StepId,
    pub title: &'static str,
    pub prompt: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub form: StepForm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggle {
    pub field: ProfileField,
    pub label: &'static str,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepForm {
    Text {
        field: ProfileField,
        placeholder: &'static str,
        value: String,
    },
    SingleChoice {
        field: ProfileField,
        options: &'static [&'static str],
        selected: Option<String>,
    },
    MultiChoice {
        field: ProfileField,
        options: &'static [&'static str],
        selection: MultiSelectState,
    },
    Number {
        field: ProfileField,
        max: u32,
        value: Option<u32>,
    },
    Toggles(Vec<Toggle>),
    Location {
        country: String,
    },
}

/// Most options a list field accepts, when capped.
#[must_use]
pub fn selection_cap(field: ProfileField) -> Option<usize> {
    (field == ProfileField::PrimaryInterests).then_some(MAX_PRIMARY_INTERESTS)
}

/// Local mirror of a list field while its step is on screen.
///
/// Toggling adds an absent option and removes a present one. At the cap a new
/// option is refused and the selection stays as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSelectState {
    field: ProfileField,
    selected: Vec<String>,
    max: Option<usize>,
}

impl MultiSelectState {
    #[must_use]
    pub fn mirror(field: ProfileField, profile: &UserProfile) -> Self {
        Self {
            field,
            selected: field.list(profile).to_vec(),
            max: selection_cap(field),
        }
    }

    /// Apply a click on `option`. Returns the new selection, or `None` when
    /// the click was refused.
    pub fn toggle(&mut self, option: &str) -> Option<Vec<String>> {
        if let Some(pos) = self.selected.iter().position(|s| s == option) {
            self.selected.remove(pos);
        } else if self.is_full() {
            return None;
        } else {
            self.selected.push(option.to_owned());
        }
        Some(self.selected.clone())
    }

    #[must_use]
    pub fn field(&self) -> ProfileField {
        self.field
    }

    #[must_use]
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    #[must_use]
    pub fn max(&self) -> Option<usize> {
        self.max
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.max.is_some_and(|max| self.selected.len() >= max)
    }

    /// Option can be clicked: it is selected, or there is room for it.
    #[must_use]
    pub fn is_enabled(&self, option: &str) -> bool {
        !self.is_full() || self.selected.iter().any(|s| s == option)
    }
}

fn text(field: ProfileField, placeholder: &'static str, profile: &UserProfile) -> StepForm {
    StepForm::Text {
        field,
        placeholder,
        value: field.text(profile).unwrap_or_default().to_owned(),
    }
}

fn single(field: ProfileField, options: &'static [&'static str], profile: &UserProfile) -> StepForm {
    StepForm::SingleChoice {
        field,
        options,
        selected: field.text(profile).map(str::to_owned),
    }
}

fn multi(field: ProfileField, options: &'static [&'static str], profile: &UserProfile) -> StepForm {
    StepForm::MultiChoice {
        field,
        options,
        selection: MultiSelectState::mirror(field, profile),
    }
}

fn toggle(field: ProfileField, label: &'static str, profile: &UserProfile) -> Toggle {
    Toggle {
        field,
        label,
        value: field.flag(profile).unwrap_or(false),
    }
}

struct StepCopy {
    id: StepId,
    prompt: &'static str,
    description: &'static str,
}

const fn copy(id: StepId, prompt: &'static str, description: &'static str) -> StepCopy {
    StepCopy {
        id,
        prompt,
        description,
    }
}

static STEP_COPY: [StepCopy; 25] = [
    copy(StepId::Name, "What's your name?", "This helps us personalize your experience"),
    copy(
        StepId::Email,
        "What's your email address?",
        "We'll use this to send you personalized news updates",
    ),
    copy(
        StepId::Age,
        "What's your age range?",
        "This helps us tailor content to your life stage",
    ),
    copy(
        StepId::Interests,
        "What are your primary interests?",
        "Select 3-5 topics that interest you most. This helps us personalize your news feed.",
    ),
    copy(
        StepId::Education,
        "What's your education level?",
        "This helps us understand your academic context",
    ),
    copy(
        StepId::Location,
        "Where are you based?",
        "Optional: Helps us include news from home",
    ),
    copy(
        StepId::Region,
        "Which region are you in?",
        "Optional: Helps us include regional developments",
    ),
    copy(
        StepId::Field,
        "What do you study or do for work?",
        "Optional: Tell us about your field of study or profession",
    ),
    copy(
        StepId::SecondaryField,
        "Any secondary field of study or work?",
        "Optional: Do you have a minor, second major, or additional professional focus?",
    ),
    copy(
        StepId::YearInProgram,
        "What year are you in?",
        "Optional: Helps us understand your academic timeline",
    ),
    copy(
        StepId::Career,
        "What's your career stage?",
        "Optional: Helps us include relevant career news",
    ),
    copy(
        StepId::TargetIndustries,
        "What industries interest you?",
        "Optional: Select industries you're interested in working in",
    ),
    copy(
        StepId::SecondaryInterests,
        "Any secondary interests?",
        "Optional: Select additional topics you're interested in",
    ),
    copy(
        StepId::AcademicSubjects,
        "What academic subjects interest you?",
        "Optional: Select subjects you're interested in learning about",
    ),
    copy(
        StepId::Hobbies,
        "What are your hobbies?",
        "Optional: Select activities you enjoy in your free time",
    ),
    copy(
        StepId::TopicsToAvoid,
        "What topics would you like to avoid?",
        "Optional: Select topics you don't want to see in your news feed",
    ),
    copy(
        StepId::PreferredComplexity,
        "What complexity level do you prefer?",
        "Optional: Helps us adjust the depth of content",
    ),
    copy(
        StepId::ArticleLength,
        "What length articles do you prefer?",
        "Optional: Helps us prioritize article length in your feed",
    ),
    copy(
        StepId::NewsFrequency,
        "How often do you read news?",
        "Optional: Helps us adjust the frequency of updates",
    ),
    copy(
        StepId::ContentTypes,
        "What types of content do you prefer?",
        "Optional: Select the types of news content you want to see",
    ),
    copy(
        StepId::PoliticalOrientation,
        "What's your political orientation?",
        "Optional: Helps us balance your political news coverage",
    ),
    copy(
        StepId::NewsFocus,
        "What's your news focus?",
        "Optional: Select your preferred news scope",
    ),
    copy(
        StepId::BreakingNews,
        "Breaking news priority",
        "Optional: Should we show you breaking news first?",
    ),
    copy(
        StepId::ReadingTime,
        "When do you prefer to read news?",
        "Optional: Helps us time your news delivery",
    ),
    copy(
        StepId::DevicePreference,
        "What device do you prefer for reading news?",
        "Optional: Helps us optimize content for your preferred device",
    ),
];

fn step_form(id: StepId, profile: &UserProfile) -> StepForm {
    use ProfileField as F;

    match id {
        StepId::Name => text(F::Name, "Enter your full name", profile),
        StepId::Email => text(F::Email, "Enter your email address", profile),
        StepId::Age => single(F::AgeRange, AGE_RANGES, profile),
        StepId::Interests => multi(F::PrimaryInterests, PRIMARY_INTERESTS, profile),
        StepId::Education => single(F::EducationLevel, EDUCATION_LEVELS, profile),
        StepId::Location => StepForm::Location {
            country: profile
                .location
                .as_ref()
                .map(|l| l.country.clone())
                .unwrap_or_default(),
        },
        StepId::Region => text(F::Region, "e.g., California, Ontario, Bavaria", profile),
        StepId::Field => text(
            F::FieldOfStudy,
            "e.g., Computer Science, Marketing, Medicine, etc.",
            profile,
        ),
        StepId::SecondaryField => text(
            F::SecondaryField,
            "e.g., Psychology minor, Business certificate, etc.",
            profile,
        ),
        StepId::YearInProgram => StepForm::Number {
            field: F::YearInProgram,
            max: MAX_YEAR_IN_PROGRAM,
            value: profile.year_in_program,
        },
        StepId::Career => single(F::CareerStage, CAREER_STAGES, profile),
        StepId::TargetIndustries => multi(F::TargetIndustries, TARGET_INDUSTRIES, profile),
        StepId::SecondaryInterests => multi(F::SecondaryInterests, PRIMARY_INTERESTS, profile),
        StepId::AcademicSubjects => multi(F::AcademicSubjects, ACADEMIC_SUBJECTS, profile),
        StepId::Hobbies => multi(F::Hobbies, HOBBIES, profile),
        StepId::TopicsToAvoid => multi(F::TopicsToAvoid, TOPICS_TO_AVOID, profile),
        StepId::PreferredComplexity => single(F::PreferredComplexity, COMPLEXITY_LEVELS, profile),
        StepId::ArticleLength => single(F::PreferredArticleLength, ARTICLE_LENGTHS, profile),
        StepId::NewsFrequency => single(F::NewsFrequency, NEWS_FREQUENCIES, profile),
        StepId::ContentTypes => multi(F::PreferredContentTypes, CONTENT_TYPES, profile),
        StepId::PoliticalOrientation => {
            single(F::PoliticalOrientation, POLITICAL_ORIENTATIONS, profile)
        }
        StepId::NewsFocus => StepForm::Toggles(vec![
            toggle(F::InternationalFocus, "I want international news", profile),
            toggle(F::LocalFocus, "I want local news", profile),
        ]),
        StepId::BreakingNews => StepForm::Toggles(vec![toggle(
            F::BreakingNewsPriority,
            "Show me breaking news first",
            profile,
        )]),
        StepId::ReadingTime => single(F::ReadingTimePreference, READING_TIMES, profile),
        StepId::DevicePreference => single(F::DevicePreference, DEVICES, profile),
    }
}

/// Pure mapping from a step and the current answers to its view.
#[must_use]
pub fn render_step(step: &StepDescriptor, profile: &UserProfile) -> StepView {
    let (prompt, description) = STEP_COPY
        .iter()
        .find(|c| c.id == step.id)
        .map_or((step.title, ""), |c| (c.prompt, c.description));

    StepView {
        id: step.id,
        title: step.title,
        prompt,
        description,
        required: step.required,
        form: step_form(step.id, profile),
    }
}
