//! Answer choices offered by the onboarding steps.

pub const PRIMARY_INTERESTS: &[&str] = &[
    "Technology",
    "Politics",
    "Health",
    "Business",
    "Sports",
    "Entertainment",
    "Science",
    "Education",
    "Arts & Culture",
    "Environment",
    "Finance",
];

pub const EDUCATION_LEVELS: &[&str] = &[
    "High School",
    "Undergraduate",
    "Graduate",
    "Postdoc",
    "Professional",
];

pub const AGE_RANGES: &[&str] = &["16-18", "19-22", "23-25", "26-30", "31-35", "36+"];

pub const CAREER_STAGES: &[&str] = &[
    "Student",
    "Recent Graduate",
    "Early Career",
    "Mid Career",
    "Senior",
    "Academic",
];

pub const TARGET_INDUSTRIES: &[&str] = &[
    "Technology",
    "Finance",
    "Healthcare",
    "Education",
    "Government",
    "Non-profit",
    "Consulting",
    "Media",
    "Entertainment",
    "Sports",
    "Real Estate",
    "Manufacturing",
    "Retail",
    "Energy",
    "Transportation",
];

pub const ACADEMIC_SUBJECTS: &[&str] = &[
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "Computer Science",
    "Engineering",
    "Medicine",
    "Law",
    "Business",
    "Economics",
    "Psychology",
    "Sociology",
    "History",
    "Literature",
    "Philosophy",
    "Political Science",
    "International Relations",
    "Art",
    "Music",
    "Theater",
];

pub const HOBBIES: &[&str] = &[
    "Reading",
    "Writing",
    "Photography",
    "Painting",
    "Music",
    "Sports",
    "Cooking",
    "Gardening",
    "Travel",
    "Gaming",
    "Crafting",
    "Dancing",
    "Hiking",
    "Swimming",
    "Cycling",
    "Yoga",
    "Meditation",
    "Volunteering",
    "Collecting",
    "DIY Projects",
];

pub const NEWS_FREQUENCIES: &[&str] = &[
    "Multiple Times Daily",
    "Daily",
    "Few Times a Week",
    "Weekly",
    "Occasional",
];

pub const POLITICAL_ORIENTATIONS: &[&str] = &[
    "Very Progressive",
    "Progressive",
    "Liberal",
    "Center-Left",
    "Moderate",
    "Center-Right",
    "Conservative",
    "Libertarian",
    "Prefer Not to Say",
];

pub const ARTICLE_LENGTHS: &[&str] = &["short", "medium", "long", "mixed"];

pub const COMPLEXITY_LEVELS: &[&str] = &["beginner", "intermediate", "advanced"];

pub const CONTENT_TYPES: &[&str] = &["news", "analysis", "opinion"];

pub const TOPICS_TO_AVOID: &[&str] = &[
    "Celebrity News",
    "Sports",
    "Crime",
    "Politics",
    "Violence",
    "Business",
    "Technology",
];

pub const READING_TIMES: &[&str] = &["morning", "afternoon", "evening", "night", "flexible"];

pub const DEVICES: &[&str] = &["mobile", "desktop", "tablet", "mixed"];

/// Countries that get the follow-up region question.
pub const REGION_COUNTRIES: &[&str] = &[
    "United States",
    "Canada",
    "Australia",
    "Germany",
    "United Kingdom",
];

pub const MAX_YEAR_IN_PROGRAM: u32 = 10;

pub const MIN_PRIMARY_INTERESTS: usize = 3;
pub const MAX_PRIMARY_INTERESTS: usize = 5;
