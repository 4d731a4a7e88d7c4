use chrono::{DateTime, Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tuition_board::board::{Gender, Post, PostId, ViewerId};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_gender(raw: &str) -> Result<Gender, String> {
    raw.trim().parse::<Gender>().map_err(|err| err.to_string())
}

pub(crate) const DEMO_GUARDIAN: &str = "guardian-rahman";
pub(crate) const DEMO_TUTOR: &str = "tutor-nadia";

struct SamplePost {
    id: &'static str,
    class_level: &'static str,
    subject: &'static str,
    location: &'static str,
    gender: Gender,
    salary: f64,
    group: Option<&'static str>,
    requirement: Option<&'static str>,
    owner: &'static str,
    booked: bool,
    age_days: i64,
}

const SAMPLE_POSTS: &[SamplePost] = &[
    SamplePost {
        id: "101",
        class_level: "Class-8",
        subject: "Mathematics",
        location: "Mirpur-10, Dhaka",
        gender: Gender::Any,
        salary: 5000.0,
        group: None,
        requirement: Some("3 days a week, evening"),
        owner: DEMO_GUARDIAN,
        booked: false,
        age_days: 1,
    },
    SamplePost {
        id: "102",
        class_level: "HSC 1st Year",
        subject: "Physics",
        location: "Dhanmondi, Dhaka",
        gender: Gender::Male,
        salary: 8000.0,
        group: Some("Science"),
        requirement: Some("Must cover basic math for mechanics"),
        owner: "guardian-karim",
        booked: false,
        age_days: 2,
    },
    SamplePost {
        id: "103",
        class_level: "Class-5",
        subject: "English",
        location: "Agrabad, Chattogram",
        gender: Gender::Female,
        salary: 3500.0,
        group: None,
        requirement: None,
        owner: "guardian-sultana",
        booked: false,
        age_days: 4,
    },
    SamplePost {
        id: "104",
        class_level: "O'Level",
        subject: "Chemistry",
        location: "Gulshan-2, Dhaka",
        gender: Gender::Any,
        salary: 12000.0,
        group: Some("Science"),
        requirement: Some("Cambridge syllabus experience"),
        owner: "guardian-hossain",
        booked: true,
        age_days: 9,
    },
    SamplePost {
        id: "105",
        class_level: "Alim 1st Year",
        subject: "Arabic",
        location: "Zindabazar, Sylhet",
        gender: Gender::Any,
        salary: 4000.0,
        group: None,
        requirement: None,
        owner: DEMO_TUTOR,
        booked: false,
        age_days: 12,
    },
];

/// Sample board used by the demo command, timestamped relative to `now`.
pub(crate) fn demo_posts(now: DateTime<Utc>) -> Vec<Post> {
    SAMPLE_POSTS
        .iter()
        .map(|sample| Post {
            id: PostId::new(sample.id),
            class_level: sample.class_level.to_string(),
            subject: sample.subject.to_string(),
            location: sample.location.to_string(),
            gender: sample.gender,
            salary: sample.salary,
            group: sample.group.map(str::to_string),
            requirement: sample.requirement.map(str::to_string),
            owner: ViewerId::new(sample.owner),
            booked: sample.booked,
            created_at: now - Duration::days(sample.age_days),
        })
        .collect()
}
