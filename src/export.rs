use anyhow::Context;
use serde_json::json;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::session::Student;

pub const EXPORT_HEADER: [&str; 6] = [
    "Name",
    "Presence",
    "Discipline",
    "Teamwork",
    "Participation",
    "Total Points",
];

/// Flat tabular projection of the roster: one row per student, in roster
/// order, under the fixed six-column header.
pub fn table_model(students: &[Student]) -> (Vec<&'static str>, Vec<serde_json::Value>) {
    let rows = students
        .iter()
        .map(|s| {
            json!([
                s.name,
                s.presence,
                s.discipline,
                s.teamwork,
                s.participation,
                s.total_points
            ])
        })
        .collect();
    (EXPORT_HEADER.to_vec(), rows)
}

/// Writes the projection as CSV. Returns the number of data rows written.
pub fn write_csv(out_path: &Path, students: &[Student]) -> anyhow::Result<usize> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create directory {}", parent.to_string_lossy())
            })?;
        }
    }

    let mut csv = String::from("Name,Presence,Discipline,Teamwork,Participation,Total Points\n");
    for s in students {
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            csv_quote(&s.name),
            fmt_number(s.presence),
            fmt_number(s.discipline),
            fmt_number(s.teamwork),
            fmt_number(s.participation),
            fmt_number(s.total_points),
        ));
    }

    let mut f = File::create(out_path).with_context(|| {
        format!(
            "failed to create output file {}",
            out_path.to_string_lossy()
        )
    })?;
    f.write_all(csv.as_bytes()).context("failed to write csv")?;

    Ok(students.len())
}

fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Whole marks print without a trailing ".0"; fractional marks keep their
/// shortest representation.
fn fmt_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Student;

    fn student(name: &str, scores: [f64; 4]) -> Student {
        Student::from_scores(name.to_string(), scores[0], scores[1], scores[2], scores[3])
    }

    #[test]
    fn table_model_header_and_row_order() {
        let students = vec![
            student("Alice", [1.0, 0.0, 2.0, 0.0]),
            student("Bob", [0.0, 0.0, 0.0, 0.0]),
        ];
        let (header, rows) = table_model(&students);
        assert_eq!(header[0], "Name");
        assert_eq!(header[5], "Total Points");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "Alice");
        assert_eq!(rows[0][5], 3.0);
        assert_eq!(rows[1][0], "Bob");
        assert_eq!(rows[1][5], 0.0);
    }

    #[test]
    fn csv_quote_escapes_commas_and_quotes() {
        assert_eq!(csv_quote("Alice"), "Alice");
        assert_eq!(csv_quote("Lee, Ann"), "\"Lee, Ann\"");
        assert_eq!(csv_quote("Bob \"Bo\""), "\"Bob \"\"Bo\"\"\"");
    }

    #[test]
    fn fmt_number_drops_trailing_zero_fraction() {
        assert_eq!(fmt_number(0.0), "0");
        assert_eq!(fmt_number(3.0), "3");
        assert_eq!(fmt_number(-2.0), "-2");
        assert_eq!(fmt_number(1.5), "1.5");
    }

    #[test]
    fn write_csv_emits_header_plus_rows() {
        let dir = std::env::temp_dir().join(format!(
            "gradebook-export-test-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let out = dir.join("roster.csv");

        let students = vec![
            student("Lee, Ann", [1.0, 0.0, 0.0, 0.5]),
            student("Bob", [0.0, 2.0, 0.0, 0.0]),
        ];
        let rows = write_csv(&out, &students).expect("write csv");
        assert_eq!(rows, 2);

        let text = std::fs::read_to_string(&out).expect("read csv");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Name,Presence,Discipline,Teamwork,Participation,Total Points"
        );
        assert_eq!(lines[1], "\"Lee, Ann\",1,0,0,0.5,1.5");
        assert_eq!(lines[2], "Bob,0,2,0,0,2");

        let _ = std::fs::remove_dir_all(dir);
    }
}
