use chrono::Utc;
use rusqlite::Connection;
use std::path::Path;
use uuid::Uuid;

use crate::session::Student;

pub const DB_FILE: &str = "gradebook.sqlite3";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join(DB_FILE);
    let conn = Connection::open(db_path)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS roster(
            id TEXT PRIMARY KEY,
            sort_order INTEGER NOT NULL,
            name TEXT NOT NULL,
            presence REAL NOT NULL,
            discipline REAL NOT NULL,
            teamwork REAL NOT NULL,
            participation REAL NOT NULL,
            total_points REAL NOT NULL,
            updated_at TEXT
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_roster_sort ON roster(sort_order)",
        [],
    )?;

    // Workspaces created before snapshots carried timestamps lack this column.
    ensure_roster_updated_at(&conn)?;

    Ok(conn)
}

/// Writes a full deep snapshot of the roster, replacing whatever the store
/// held. One transaction, so a crash mid-save never leaves a half-written
/// roster behind.
pub fn save_roster(conn: &mut Connection, students: &[Student]) -> anyhow::Result<usize> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM roster", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO roster(
                id, sort_order, name,
                presence, discipline, teamwork, participation,
                total_points, updated_at
            ) VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )?;
        let now = Utc::now().to_rfc3339();
        for (i, s) in students.iter().enumerate() {
            stmt.execute((
                Uuid::new_v4().to_string(),
                i as i64,
                &s.name,
                s.presence,
                s.discipline,
                s.teamwork,
                s.participation,
                s.total_points,
                &now,
            ))?;
        }
    }
    tx.commit()?;
    Ok(students.len())
}

/// Loads the persisted snapshot in roster order. Totals are rederived from
/// the four category columns, so a hand-edited store cannot smuggle in a
/// total that disagrees with its scores.
pub fn load_roster(conn: &Connection) -> anyhow::Result<Vec<Student>> {
    let mut stmt = conn.prepare(
        "SELECT name, presence, discipline, teamwork, participation
         FROM roster ORDER BY sort_order",
    )?;
    let students = stmt
        .query_map([], |row| {
            Ok(Student::from_scores(
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(students)
}

fn ensure_roster_updated_at(conn: &Connection) -> anyhow::Result<()> {
    if table_has_column(conn, "roster", "updated_at")? {
        return Ok(());
    }
    conn.execute("ALTER TABLE roster ADD COLUMN updated_at TEXT", [])?;
    Ok(())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> anyhow::Result<bool> {
    let sql = format!("PRAGMA table_info({})", table);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}
