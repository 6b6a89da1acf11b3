//! Achievement export helpers shared by the PDF, Excel and CSV outputs.

use std::collections::HashMap;

use chrono::NaiveDate;

use campuslens_models::Achievement;

use crate::export::{Cell, Column, Table};

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStat {
    pub category: String,
    pub count: usize,
    /// Share of all achievements, 0-100 with one decimal
    pub percentage: f64,
}

/// Achievements per category, most frequent first.
pub fn category_stats(achievements: &[Achievement]) -> Vec<CategoryStat> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for a in achievements {
        *counts.entry(a.category.as_str()).or_default() += 1;
    }

    let total = achievements.len().max(1) as f64;
    let mut stats: Vec<CategoryStat> = counts
        .into_iter()
        .map(|(category, count)| CategoryStat {
            category: category.to_string(),
            count,
            percentage: (count as f64 * 1000.0 / total).round() / 10.0,
        })
        .collect();

    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    stats
}

pub(crate) fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

/// Rows for the Excel and CSV exports.
pub fn achievements_table(achievements: &[Achievement], include_details: bool) -> Table {
    let mut columns = vec![
        Column::new("Student Name", 20.0),
        Column::new("Registration Number", 20.0),
        Column::new("Title", 30.0),
        Column::new("Category", 15.0),
        Column::new("Date", 15.0),
        Column::new("Scope", 20.0),
    ];
    if include_details {
        columns.push(Column::new("Description", 40.0));
    }

    let rows = achievements
        .iter()
        .map(|a| {
            let mut row = vec![
                Cell::text(a.student_name.clone().unwrap_or_default()),
                Cell::text(a.registration_number.clone()),
                Cell::text(a.title.clone()),
                Cell::text(a.category.clone()),
                Cell::text(format_date(a.achievement_date)),
                Cell::text(a.scope.clone()),
            ];
            if include_details {
                row.push(Cell::text(a.description.clone().unwrap_or_default()));
            }
            row
        })
        .collect();

    Table {
        sheet_name: "Achievements".to_string(),
        columns,
        rows,
    }
}

/// File name stem for an export produced on `date`.
pub fn export_file_stem(date: NaiveDate) -> String {
    format!("achievements_{}", date.format("%Y-%m-%d"))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    pub fn achievement(reg: &str, title: &str, category: &str) -> Achievement {
        Achievement {
            id: Uuid::new_v4(),
            registration_number: reg.to_string(),
            student_name: Some(format!("Student {reg}")),
            title: title.to_string(),
            description: Some(format!("{title} description")),
            category: category.to_string(),
            achievement_date: NaiveDate::from_ymd_opt(2024, 8, 15),
            scope: "Inside the College".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::achievement;
    use super::*;

    #[test]
    fn stats_are_sorted_by_count() {
        let list = vec![
            achievement("A1", "Chess", "Sports"),
            achievement("A2", "Hackathon", "Technical"),
            achievement("A3", "Football", "Sports"),
        ];
        let stats = category_stats(&list);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].category, "Sports");
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[0].percentage, 66.7);
        assert_eq!(stats[1].percentage, 33.3);
    }

    #[test]
    fn stats_of_nothing_are_empty() {
        assert!(category_stats(&[]).is_empty());
    }

    #[test]
    fn description_column_only_with_details() {
        let list = vec![achievement("A1", "Chess", "Sports")];

        let plain = achievements_table(&list, false);
        assert_eq!(plain.columns.len(), 6);
        assert_eq!(plain.columns[1].title, "Registration Number");

        let detailed = achievements_table(&list, true);
        assert_eq!(detailed.columns.len(), 7);
        assert_eq!(detailed.rows[0][6], Cell::text("Chess description"));
        assert_eq!(detailed.rows[0][4], Cell::text("2024-08-15"));
    }

    #[test]
    fn file_stem_is_dated() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        assert_eq!(export_file_stem(date), "achievements_2024-01-09");
    }
}
