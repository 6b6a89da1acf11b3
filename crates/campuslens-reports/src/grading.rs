//! Grade arithmetic on a 10 point scale.
//!
//! SGPA and CGPA are credit-weighted means of grade points. A grade below
//! [`PASS_GRADE_POINTS`] is a failed subject and earns no credits.

use std::collections::BTreeMap;

use campuslens_models::{
    AcademicStatus, GradeDetail, SemesterPerformanceReport, SemesterSgpa, Student,
};

pub const PASS_GRADE_POINTS: f64 = 4.0;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Credit-weighted mean of grade points, rounded to two decimals.
/// Zero when no credits are graded.
pub fn weighted_average<'a, I>(grades: I) -> f64
where
    I: IntoIterator<Item = &'a GradeDetail>,
{
    let (points, credits) = grades.into_iter().fold((0.0, 0i64), |(p, c), g| {
        (p + g.grade_points * f64::from(g.credits), c + i64::from(g.credits))
    });

    if credits == 0 {
        0.0
    } else {
        round2(points / credits as f64)
    }
}

pub fn cgpa(grades: &[GradeDetail]) -> f64 {
    weighted_average(grades)
}

pub fn is_passed(grade: &GradeDetail) -> bool {
    grade.grade_points >= PASS_GRADE_POINTS
}

pub fn total_credits(grades: &[GradeDetail]) -> i32 {
    grades.iter().map(|g| g.credits).sum()
}

pub fn earned_credits(grades: &[GradeDetail]) -> i32 {
    grades.iter().filter(|g| is_passed(g)).map(|g| g.credits).sum()
}

pub fn failed_subjects(grades: &[GradeDetail]) -> Vec<GradeDetail> {
    grades.iter().filter(|g| !is_passed(g)).cloned().collect()
}

/// Per-semester figures, ascending by semester.
pub fn sgpa_by_semester(grades: &[GradeDetail]) -> Vec<SemesterSgpa> {
    let mut by_semester: BTreeMap<i32, Vec<&GradeDetail>> = BTreeMap::new();
    for grade in grades {
        by_semester.entry(grade.semester).or_default().push(grade);
    }

    by_semester
        .into_iter()
        .map(|(semester, grades)| SemesterSgpa {
            semester,
            sgpa: weighted_average(grades.iter().copied()),
            earned_credits: grades
                .iter()
                .filter(|g| is_passed(g))
                .map(|g| g.credits)
                .sum(),
            total_credits: grades.iter().map(|g| g.credits).sum(),
        })
        .collect()
}

/// SGPA of the highest graded semester.
pub fn latest_sgpa(grades: &[GradeDetail]) -> Option<f64> {
    sgpa_by_semester(grades).last().map(|s| s.sgpa)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterGrade {
    pub letter: &'static str,
    pub color: &'static str,
}

/// Letter grades from best to worst.
pub const LETTER_GRADES: [LetterGrade; 7] = [
    LetterGrade { letter: "A+", color: "#4caf50" },
    LetterGrade { letter: "A", color: "#8bc34a" },
    LetterGrade { letter: "B+", color: "#cddc39" },
    LetterGrade { letter: "B", color: "#ffeb3b" },
    LetterGrade { letter: "C+", color: "#ffc107" },
    LetterGrade { letter: "C", color: "#ff9800" },
    LetterGrade { letter: "F", color: "#f44336" },
];

pub fn letter_grade(grade_points: f64) -> LetterGrade {
    let index = if grade_points >= 9.0 {
        0
    } else if grade_points >= 8.0 {
        1
    } else if grade_points >= 7.0 {
        2
    } else if grade_points >= 6.0 {
        3
    } else if grade_points >= 5.0 {
        4
    } else if grade_points >= 4.0 {
        5
    } else {
        6
    };
    LETTER_GRADES[index]
}

/// Count of grades per letter, in [`LETTER_GRADES`] order.
pub fn grade_distribution(grades: &[GradeDetail]) -> [(LetterGrade, usize); 7] {
    let mut counts = LETTER_GRADES.map(|l| (l, 0usize));
    for grade in grades {
        let letter = letter_grade(grade.grade_points);
        if let Some(slot) = counts.iter_mut().find(|(l, _)| *l == letter) {
            slot.1 += 1;
        }
    }
    counts
}

/// Advice lines for a report. An ungraded student has a CGPA of zero.
pub fn recommendations(failed_count: usize, cgpa: f64) -> Vec<String> {
    let mut lines = Vec::new();

    if failed_count > 0 {
        lines.push(format!("Focus on clearing {failed_count} failed subjects."));
    }

    if cgpa < 6.0 {
        lines.push("Consider additional academic support to improve performance.".to_string());
    } else if cgpa >= 8.5 {
        lines.push(
            "Excellent performance! Consider advanced courses or research opportunities."
                .to_string(),
        );
    }

    lines
}

/// Assembles the full performance report for one student.
pub fn build_performance_report(
    student: Student,
    grades: Vec<GradeDetail>,
) -> SemesterPerformanceReport {
    let cgpa = cgpa(&grades);
    let failed = failed_subjects(&grades);
    let recommendations = recommendations(failed.len(), cgpa);

    SemesterPerformanceReport {
        student,
        sgpa_by_semester: sgpa_by_semester(&grades),
        cgpa,
        status: AcademicStatus::from_cgpa(cgpa),
        total_credits: total_credits(&grades),
        earned_credits: earned_credits(&grades),
        failed_subjects: failed,
        recommendations,
        semester_grades: grades,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    pub fn grade(code: &str, semester: i32, credits: i32, grade_points: f64) -> GradeDetail {
        GradeDetail {
            id: Uuid::new_v4(),
            registration_number: "21A91A0501".to_string(),
            course_code: code.to_string(),
            course_name: format!("Course {code}"),
            credits,
            semester,
            grade_points,
        }
    }

    pub fn student(reg: &str, name: &str) -> Student {
        Student {
            registration_number: reg.to_string(),
            name: name.to_string(),
            email: Some(format!("{}@college.test", reg.to_lowercase())),
            phone: None,
            gender: Some("Female".to_string()),
            branch: "CSE".to_string(),
            current_semester: 3,
            address_line: None,
            city: Some("Vizag".to_string()),
            state: None,
            pincode: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn report(reg: &str, name: &str) -> SemesterPerformanceReport {
        build_performance_report(
            student(reg, name),
            vec![
                grade("CS101", 1, 4, 9.0),
                grade("MA101", 1, 3, 7.0),
                grade("CS201", 2, 4, 8.0),
                grade("EE201", 2, 2, 3.0),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn cgpa_is_credit_weighted() {
        let grades = vec![grade("CS101", 1, 4, 9.0), grade("MA101", 1, 2, 6.0)];
        // (36 + 12) / 6
        assert_eq!(cgpa(&grades), 8.0);
    }

    #[test]
    fn cgpa_without_credits_is_zero() {
        assert_eq!(cgpa(&[]), 0.0);
    }

    #[test]
    fn averages_round_to_two_decimals() {
        let grades = vec![
            grade("A", 1, 3, 7.0),
            grade("B", 1, 3, 8.0),
            grade("C", 1, 3, 8.0),
        ];
        assert_eq!(weighted_average(&grades), 7.67);
    }

    #[test]
    fn semesters_are_grouped_and_sorted() {
        let grades = vec![
            grade("CS301", 3, 4, 6.0),
            grade("CS101", 1, 4, 9.0),
            grade("MA101", 1, 4, 3.0),
        ];
        let sgpa = sgpa_by_semester(&grades);
        assert_eq!(sgpa.len(), 2);
        assert_eq!(sgpa[0].semester, 1);
        assert_eq!(sgpa[0].sgpa, 6.0);
        assert_eq!(sgpa[0].earned_credits, 4);
        assert_eq!(sgpa[0].total_credits, 8);
        assert_eq!(sgpa[1].semester, 3);
        assert_eq!(latest_sgpa(&grades), Some(6.0));
    }

    #[test]
    fn failing_grades_earn_no_credits() {
        let grades = vec![grade("CS101", 1, 4, 4.0), grade("MA101", 1, 3, 3.99)];
        assert_eq!(earned_credits(&grades), 4);
        assert_eq!(total_credits(&grades), 7);
        assert_eq!(failed_subjects(&grades).len(), 1);
        assert_eq!(failed_subjects(&grades)[0].course_code, "MA101");
    }

    #[test]
    fn letter_grade_boundaries() {
        assert_eq!(letter_grade(10.0).letter, "A+");
        assert_eq!(letter_grade(9.0).letter, "A+");
        assert_eq!(letter_grade(8.99).letter, "A");
        assert_eq!(letter_grade(7.0).letter, "B+");
        assert_eq!(letter_grade(6.5).letter, "B");
        assert_eq!(letter_grade(5.0).letter, "C+");
        assert_eq!(letter_grade(4.0).letter, "C");
        assert_eq!(letter_grade(3.9).letter, "F");
        assert_eq!(letter_grade(3.9).color, "#f44336");
    }

    #[test]
    fn distribution_counts_every_letter() {
        let grades = vec![
            grade("A", 1, 3, 9.5),
            grade("B", 1, 3, 9.1),
            grade("C", 1, 3, 2.0),
        ];
        let dist = grade_distribution(&grades);
        assert_eq!(dist[0], (LETTER_GRADES[0], 2));
        assert_eq!(dist[6].1, 1);
        assert_eq!(dist.iter().map(|(_, n)| n).sum::<usize>(), 3);
    }

    #[test]
    fn recommendation_rules() {
        assert_eq!(
            recommendations(2, 5.5),
            vec![
                "Focus on clearing 2 failed subjects.".to_string(),
                "Consider additional academic support to improve performance.".to_string(),
            ]
        );
        assert_eq!(
            recommendations(0, 9.0),
            vec![
                "Excellent performance! Consider advanced courses or research opportunities."
                    .to_string()
            ]
        );
        assert!(recommendations(0, 7.2).is_empty());
        assert_eq!(
            recommendations(0, 0.0),
            vec!["Consider additional academic support to improve performance.".to_string()]
        );
    }

    #[test]
    fn performance_report_summarises_grades() {
        let report = report("21A91A0501", "Asha Rao");
        // (36 + 21 + 32 + 6) / 13
        assert_eq!(report.cgpa, 7.31);
        assert_eq!(report.status, AcademicStatus::Good);
        assert_eq!(report.total_credits, 13);
        assert_eq!(report.earned_credits, 11);
        assert_eq!(report.failed_subjects.len(), 1);
        assert_eq!(report.sgpa_by_semester.len(), 2);
        assert_eq!(
            report.recommendations,
            vec!["Focus on clearing 1 failed subjects.".to_string()]
        );
    }

    #[test]
    fn ungraded_student_gets_support_advice() {
        let report = build_performance_report(student("X1", "New Student"), Vec::new());
        assert_eq!(report.cgpa, 0.0);
        assert_eq!(report.status, AcademicStatus::AtRisk);
        assert_eq!(
            report.recommendations,
            vec!["Consider additional academic support to improve performance.".to_string()]
        );
    }
}
