//! Report aggregates and tutor matching over sample records

use std::collections::BTreeMap;

use crate::catalog::{SessionRecord, StudentNeed, TutorProfile};

/// Per-faculty usage summary
#[derive(Debug, Clone, PartialEq)]
pub struct FacultySummary {
    pub faculty: String,
    pub sessions: usize,
    pub attended: usize,
    pub total_minutes: u32,
}

/// Headline numbers for the reports page
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOverview {
    pub total_sessions: usize,
    /// Share of sessions attended, 0.0 to 1.0
    pub completion_rate: f64,
    /// Mean of the ratings given, if any
    pub average_rating: Option<f64>,
    pub by_faculty: Vec<FacultySummary>,
}

pub fn report_overview(records: &[SessionRecord]) -> ReportOverview {
    let total_sessions = records.len();
    let attended = records.iter().filter(|r| r.attended).count();
    let completion_rate = if total_sessions == 0 {
        0.0
    } else {
        attended as f64 / total_sessions as f64
    };

    let ratings: Vec<f64> = records.iter().filter_map(|r| r.rating).map(f64::from).collect();
    let average_rating = if ratings.is_empty() {
        None
    } else {
        Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
    };

    let mut faculties: BTreeMap<&str, FacultySummary> = BTreeMap::new();
    for record in records {
        let summary = faculties
            .entry(record.faculty.as_str())
            .or_insert_with(|| FacultySummary {
                faculty: record.faculty.clone(),
                sessions: 0,
                attended: 0,
                total_minutes: 0,
            });
        summary.sessions += 1;
        if record.attended {
            summary.attended += 1;
            summary.total_minutes += record.duration_minutes;
        }
    }

    ReportOverview {
        total_sessions,
        completion_rate,
        average_rating,
        by_faculty: faculties.into_values().collect(),
    }
}

/// A ranked tutor suggestion
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSuggestion {
    pub tutor_id: u32,
    pub tutor_name: String,
    pub shared_subjects: Vec<String>,
    pub score: f32,
}

/// Rank tutors for a student.
///
/// Score is two points per shared subject, one for the same faculty, plus
/// the tutor's rating scaled to 0..1. Tutors sharing no subject are left out.
pub fn rank_tutors(student: &StudentNeed, tutors: &[TutorProfile]) -> Vec<MatchSuggestion> {
    let mut suggestions: Vec<MatchSuggestion> = tutors
        .iter()
        .filter_map(|tutor| {
            let shared: Vec<String> = tutor
                .subjects
                .iter()
                .filter(|s| student.subjects.iter().any(|need| need.eq_ignore_ascii_case(s)))
                .cloned()
                .collect();
            if shared.is_empty() {
                return None;
            }

            let faculty_bonus = if tutor.faculty.eq_ignore_ascii_case(&student.faculty) {
                1.0
            } else {
                0.0
            };
            let score = shared.len() as f32 * 2.0 + faculty_bonus + tutor.rating / 5.0;

            Some(MatchSuggestion {
                tutor_id: tutor.id,
                tutor_name: tutor.name.clone(),
                shared_subjects: shared,
                score,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.tutor_id.cmp(&b.tutor_id)));
    suggestions
}
