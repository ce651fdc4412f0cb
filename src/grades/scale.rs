use serde::Serialize;

/// Inclusive lower bound, letter, 4.0-scale point. Checked top to bottom.
const BREAKPOINTS: [(f64, &str, f64); 11] = [
    (97.0, "A+", 4.0),
    (93.0, "A", 3.7),
    (90.0, "A-", 3.3),
    (87.0, "B+", 3.0),
    (83.0, "B", 2.7),
    (80.0, "B-", 2.3),
    (77.0, "C+", 2.0),
    (73.0, "C", 1.7),
    (70.0, "C-", 1.3),
    (67.0, "D+", 1.0),
    (60.0, "D", 0.7),
];

const FAILING: (&str, f64) = ("F", 0.0);

fn lookup(percentage: f64) -> (&'static str, f64) {
    BREAKPOINTS
        .iter()
        .find(|(floor, _, _)| percentage >= *floor)
        .map(|(_, letter, point)| (*letter, *point))
        .unwrap_or(FAILING)
}

/// Out-of-range input is not rejected: above 100 is still `A+`, below 0
/// (and NaN) is `F`.
pub fn letter_grade(percentage: f64) -> &'static str {
    lookup(percentage).0
}

pub fn grade_point(percentage: f64) -> f64 {
    lookup(percentage).1
}

/// Coarse display tier for a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeBand {
    Excellent,
    Good,
    Fair,
    Poor,
    Failing,
}

pub fn grade_band(percentage: f64) -> GradeBand {
    match percentage {
        p if p >= 90.0 => GradeBand::Excellent,
        p if p >= 80.0 => GradeBand::Good,
        p if p >= 70.0 => GradeBand::Fair,
        p if p >= 60.0 => GradeBand::Poor,
        _ => GradeBand::Failing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoints_are_inclusive() {
        assert_eq!(letter_grade(97.0), "A+");
        assert_eq!(letter_grade(96.99), "A");
        assert_eq!(letter_grade(93.0), "A");
        assert_eq!(letter_grade(60.0), "D");
        assert_eq!(letter_grade(59.99), "F");
        assert_eq!(grade_point(87.0), 3.0);
        assert_eq!(grade_point(86.9), 2.7);
    }

    #[test]
    fn test_letter_and_point_share_the_table() {
        assert_eq!(letter_grade(92.9), "A-");
        assert_eq!(grade_point(92.9), 3.3);
        assert_eq!(letter_grade(100.0), "A+");
        assert_eq!(grade_point(100.0), 4.0);

        let samples = [
            (98.0, "A+", 4.0),
            (95.0, "A", 3.7),
            (88.0, "B+", 3.0),
            (84.0, "B", 2.7),
            (81.0, "B-", 2.3),
            (78.0, "C+", 2.0),
            (74.0, "C", 1.7),
            (71.0, "C-", 1.3),
            (68.0, "D+", 1.0),
            (61.0, "D", 0.7),
            (10.0, "F", 0.0),
        ];
        for (p, letter, point) in samples {
            assert_eq!(letter_grade(p), letter, "letter for {}", p);
            assert_eq!(grade_point(p), point, "point for {}", p);
        }
    }

    #[test]
    fn test_out_of_range_input() {
        assert_eq!(letter_grade(140.0), "A+");
        assert_eq!(grade_point(140.0), 4.0);
        assert_eq!(letter_grade(-5.0), "F");
        assert_eq!(grade_point(-5.0), 0.0);
        assert_eq!(letter_grade(f64::NAN), "F");
    }

    #[test]
    fn test_grade_band() {
        assert_eq!(grade_band(90.0), GradeBand::Excellent);
        assert_eq!(grade_band(89.9), GradeBand::Good);
        assert_eq!(grade_band(70.0), GradeBand::Fair);
        assert_eq!(grade_band(65.0), GradeBand::Poor);
        assert_eq!(grade_band(12.0), GradeBand::Failing);
    }
}
