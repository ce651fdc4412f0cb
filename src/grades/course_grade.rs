use serde::Serialize;

use crate::models::{Assignment, GradeCategory};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub name: String,
    pub weight: f64,
    pub graded_count: usize,
    /// Mean of the graded assignments; `None` when nothing is graded yet.
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeBreakdown {
    pub percentage: Option<f64>,
    pub categories: Vec<CategoryBreakdown>,
    /// Share of the nominal weighting that has graded work, 0..=1 when
    /// weights sum to 100.
    pub weight_covered: f64,
    /// Graded assignments whose category names none of the course's
    /// categories. They do not count toward the percentage.
    pub unmatched: Vec<i64>,
}

/// Weighted course percentage, renormalised over the categories that have
/// at least one graded assignment. `None` when there is nothing to grade.
pub fn compute_course_grade(assignments: &[Assignment], categories: &[GradeCategory]) -> Option<f64> {
    if assignments.is_empty() || categories.is_empty() {
        return None;
    }
    course_grade_breakdown(assignments, categories).percentage
}

pub fn course_grade_breakdown(assignments: &[Assignment], categories: &[GradeCategory]) -> GradeBreakdown {
    let mut weighted_score = 0.0;
    let mut weight_used = 0.0;

    let breakdown: Vec<CategoryBreakdown> = categories
        .iter()
        .map(|category| {
            let grades: Vec<f64> = assignments
                .iter()
                .filter(|a| a.category == category.name)
                .filter_map(|a| a.grade)
                .collect();

            let average = if grades.is_empty() {
                None
            } else {
                Some(grades.iter().sum::<f64>() / grades.len() as f64)
            };

            if let Some(avg) = average {
                let weight = category.weight / 100.0;
                weighted_score += avg * weight;
                weight_used += weight;
            }

            CategoryBreakdown {
                name: category.name.clone(),
                weight: category.weight,
                graded_count: grades.len(),
                average,
            }
        })
        .collect();

    let unmatched = assignments
        .iter()
        .filter(|a| a.grade.is_some())
        .filter(|a| !categories.iter().any(|c| c.name == a.category))
        .map(|a| a.id)
        .collect();

    let percentage = if weight_used > 0.0 {
        Some(weighted_score / weight_used)
    } else {
        None
    };

    GradeBreakdown {
        percentage,
        categories: breakdown,
        weight_covered: weight_used,
        unmatched,
    }
}
