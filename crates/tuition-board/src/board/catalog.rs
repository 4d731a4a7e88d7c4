//! Option lists offered by the board's filter form.

/// Class levels a guardian can pick when publishing a post.
pub const CLASS_LEVELS: &[&str] = &[
    "Pre-Schooling",
    "Playgroup",
    "Nursery",
    "KG-1",
    "KG-2",
    "Class-1",
    "Class-2",
    "Class-3",
    "Class-4",
    "Class-5",
    "Class-6",
    "Class-7",
    "Class-8",
    "Class-9",
    "Class-10",
    "O'Level",
    "A'Level(AS)",
    "A'Level(A2)",
    "SSC Candidate",
    "HSC 1st Year",
    "HSC 2nd Year",
    "HSC Candidate",
    "Alim 1st Year",
    "Alim 2nd Year",
    "Alim Candidate",
    "Addmission",
];

/// Subject values stored on posts.
pub const SUBJECTS: &[&str] = &[
    "All-Subject",
    "All-Arts",
    "All-Commerce",
    "All-Science",
    "English,Math,Science",
    "Physics",
    "Chemistry",
    "Biology",
    "Mathematics",
    "ICT",
    "Statistics",
    "Accounting",
    "Finance",
    "Management",
    "Marketing",
    "Business Studies",
    "Economics",
    "History",
    "Geography",
    "Political Science",
    "Philosophy",
    "Sociology",
    "Psychology",
    "English",
    "Bangla",
    "Islamic Studies",
    "Quran Majeed & Tajweed",
    "Hadith",
    "Fiqh",
    "Aqaid",
    "Arabic",
    "Tafsir",
    "Islamic History",
    "Balagah",
    "Mantik",
    "Sarf",
    "Nahw",
    "Tasauf",
    "Mantiq & Falsafa",
    "Ilmul Kalam",
];

pub fn is_known_class_level(value: &str) -> bool {
    CLASS_LEVELS.contains(&value)
}

pub fn is_known_subject(value: &str) -> bool {
    SUBJECTS.contains(&value)
}
