//! Fixed sample data behind the peripheral pages
//!
//! Feedback, Library, Reports, Matching and Session Record pages have no
//! backend endpoints; they work on these in-memory records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Book,
    Video,
    Notes,
    PastPaper,
}

impl ResourceKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceKind::Book => "Book",
            ResourceKind::Video => "Video",
            ResourceKind::Notes => "Notes",
            ResourceKind::PastPaper => "Past paper",
        }
    }
}

/// A library entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryResource {
    pub id: u32,
    pub title: String,
    pub subject: String,
    pub author: String,
    pub kind: ResourceKind,
}

/// A completed (or missed) tutoring session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: u32,
    pub tutor_name: String,
    pub student_name: String,
    pub subject: String,
    pub faculty: String,
    pub date: NaiveDate,
    pub duration_minutes: u32,
    pub attended: bool,
    pub rating: Option<u8>,
    pub notes: String,
}

/// Tutor profile used by the matching tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorProfile {
    pub id: u32,
    pub name: String,
    pub faculty: String,
    pub subjects: Vec<String>,
    pub rating: f32,
}

/// Student looking for a tutor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentNeed {
    pub id: u32,
    pub name: String,
    pub faculty: String,
    pub subjects: Vec<String>,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    // Literal dates below are all valid
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn library_resources() -> Vec<LibraryResource> {
    let rows = [
        (1, "Calculus: Early Transcendentals", "Mathematics", "J. Stewart", ResourceKind::Book),
        (2, "Linear Algebra Done Right", "Mathematics", "S. Axler", ResourceKind::Book),
        (3, "Intro to Data Structures", "Computer Science", "Tutoring Centre", ResourceKind::Video),
        (4, "Organic Chemistry Summary", "Chemistry", "Tutoring Centre", ResourceKind::Notes),
        (5, "Microeconomics Midterm 2025", "Economics", "Faculty of Economics", ResourceKind::PastPaper),
        (6, "Academic Writing Workshop", "English", "Writing Centre", ResourceKind::Video),
        (7, "Thermodynamics Problem Set", "Physics", "Tutoring Centre", ResourceKind::Notes),
    ];
    rows.into_iter()
        .map(|(id, title, subject, author, kind)| LibraryResource {
            id,
            title: title.to_string(),
            subject: subject.to_string(),
            author: author.to_string(),
            kind,
        })
        .collect()
}

pub fn session_records() -> Vec<SessionRecord> {
    let rows = [
        (1, "Dana Ortiz", "Lee Park", "Mathematics", "Science", date(2026, 9, 2), 60, true, Some(5)),
        (2, "Dana Ortiz", "Sam Reyes", "Mathematics", "Science", date(2026, 9, 4), 45, true, Some(4)),
        (3, "Omar Haddad", "Lee Park", "Computer Science", "Engineering", date(2026, 9, 8), 60, false, None),
        (4, "Omar Haddad", "Kim Nguyen", "Computer Science", "Engineering", date(2026, 9, 10), 90, true, Some(5)),
        (5, "Ruth Mensah", "Ava Cohen", "Economics", "Business", date(2026, 9, 15), 60, true, Some(3)),
        (6, "Ruth Mensah", "Sam Reyes", "Economics", "Business", date(2026, 9, 17), 60, true, None),
    ];
    rows.into_iter()
        .map(
            |(id, tutor, student, subject, faculty, date, duration, attended, rating)| SessionRecord {
                id,
                tutor_name: tutor.to_string(),
                student_name: student.to_string(),
                subject: subject.to_string(),
                faculty: faculty.to_string(),
                date,
                duration_minutes: duration,
                attended,
                rating,
                notes: String::new(),
            },
        )
        .collect()
}

pub fn tutor_profiles() -> Vec<TutorProfile> {
    vec![
        TutorProfile {
            id: 1,
            name: "Dana Ortiz".to_string(),
            faculty: "Science".to_string(),
            subjects: strings(&["Mathematics", "Statistics"]),
            rating: 4.8,
        },
        TutorProfile {
            id: 2,
            name: "Omar Haddad".to_string(),
            faculty: "Engineering".to_string(),
            subjects: strings(&["Computer Science", "Mathematics"]),
            rating: 4.6,
        },
        TutorProfile {
            id: 3,
            name: "Ruth Mensah".to_string(),
            faculty: "Business".to_string(),
            subjects: strings(&["Economics", "Accounting"]),
            rating: 4.2,
        },
        TutorProfile {
            id: 4,
            name: "Ivo Petrov".to_string(),
            faculty: "Science".to_string(),
            subjects: strings(&["Chemistry", "Physics"]),
            rating: 4.5,
        },
    ]
}

pub fn student_needs() -> Vec<StudentNeed> {
    vec![
        StudentNeed {
            id: 1,
            name: "Lee Park".to_string(),
            faculty: "Science".to_string(),
            subjects: strings(&["Mathematics", "Physics"]),
        },
        StudentNeed {
            id: 2,
            name: "Ava Cohen".to_string(),
            faculty: "Business".to_string(),
            subjects: strings(&["Economics"]),
        },
        StudentNeed {
            id: 3,
            name: "Kim Nguyen".to_string(),
            faculty: "Engineering".to_string(),
            subjects: strings(&["Computer Science", "Statistics"]),
        },
    ]
}
