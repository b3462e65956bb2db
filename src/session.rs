use serde::{Deserialize, Serialize};
use std::fmt;

/// The four fixed mark categories of a roster record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Presence,
    Discipline,
    Teamwork,
    Participation,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Presence,
        Category::Discipline,
        Category::Teamwork,
        Category::Participation,
    ];

    /// Wire names as the front end sends them. Unknown strings are rejected
    /// at the IPC boundary; the core only ever sees a valid category.
    pub fn parse(s: &str) -> Option<Category> {
        match s {
            "presence" => Some(Category::Presence),
            "discipline" => Some(Category::Discipline),
            "teamwork" => Some(Category::Teamwork),
            "participation" => Some(Category::Participation),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Presence => "presence",
            Category::Discipline => "discipline",
            Category::Teamwork => "teamwork",
            Category::Participation => "participation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub name: String,
    pub presence: f64,
    pub discipline: f64,
    pub teamwork: f64,
    pub participation: f64,
    pub total_points: f64,
}

impl Student {
    fn new(name: String) -> Student {
        Student {
            name,
            presence: 0.0,
            discipline: 0.0,
            teamwork: 0.0,
            participation: 0.0,
            total_points: 0.0,
        }
    }

    /// Rebuilds a record from stored scores. The total is always derived
    /// here, never trusted from the store.
    pub fn from_scores(
        name: String,
        presence: f64,
        discipline: f64,
        teamwork: f64,
        participation: f64,
    ) -> Student {
        let mut s = Student {
            name,
            presence,
            discipline,
            teamwork,
            participation,
            total_points: 0.0,
        };
        s.recompute_total();
        s
    }

    pub fn score(&self, category: Category) -> f64 {
        match category {
            Category::Presence => self.presence,
            Category::Discipline => self.discipline,
            Category::Teamwork => self.teamwork,
            Category::Participation => self.participation,
        }
    }

    fn score_mut(&mut self, category: Category) -> &mut f64 {
        match category {
            Category::Presence => &mut self.presence,
            Category::Discipline => &mut self.discipline,
            Category::Teamwork => &mut self.teamwork,
            Category::Participation => &mut self.participation,
        }
    }

    fn recompute_total(&mut self) {
        self.total_points = self.presence + self.discipline + self.teamwork + self.participation;
    }
}

#[derive(Debug, PartialEq)]
pub enum SessionError {
    EmptyName,
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::EmptyName => write!(f, "student name must be non-empty"),
            SessionError::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range for roster of {}", index, len)
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// Ordered collection of student records. Position matters for display and
/// remove-by-index only; the redo-remove path identifies records by name.
#[derive(Debug, Default, Clone)]
pub struct Roster {
    students: Vec<Student>,
}

impl Roster {
    pub fn add_student(&mut self, name: &str) -> Result<usize, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        self.students.push(Student::new(name.to_string()));
        Ok(self.students.len() - 1)
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Student, SessionError> {
        if index >= self.students.len() {
            return Err(SessionError::IndexOutOfRange {
                index,
                len: self.students.len(),
            });
        }
        Ok(self.students.remove(index))
    }

    pub fn adjust_mark(
        &mut self,
        index: usize,
        category: Category,
        delta: f64,
    ) -> Result<(), SessionError> {
        let len = self.students.len();
        let student = self
            .students
            .get_mut(index)
            .ok_or(SessionError::IndexOutOfRange { index, len })?;
        *student.score_mut(category) += delta;
        student.recompute_total();
        Ok(())
    }

    pub fn set_mark(
        &mut self,
        index: usize,
        category: Category,
        value: f64,
    ) -> Result<(), SessionError> {
        let len = self.students.len();
        let student = self
            .students
            .get_mut(index)
            .ok_or(SessionError::IndexOutOfRange { index, len })?;
        *student.score_mut(category) = value;
        student.recompute_total();
        Ok(())
    }

    pub fn clear_all_marks(&mut self) {
        for student in &mut self.students {
            for category in Category::ALL {
                *student.score_mut(category) = 0.0;
            }
            student.total_points = 0.0;
        }
    }

    pub fn replace_all(&mut self, snapshot: Vec<Student>) {
        self.students = snapshot;
    }

    /// Deep copy of the current content. `Student` owns all of its fields,
    /// so a cloned vec shares nothing with the live roster.
    pub fn snapshot(&self) -> Vec<Student> {
        self.students.clone()
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn get(&self, index: usize) -> Option<&Student> {
        self.students.get(index)
    }

    fn push(&mut self, student: Student) {
        self.students.push(student);
    }

    fn pop_last(&mut self) -> Option<Student> {
        self.students.pop()
    }

    fn remove_by_name(&mut self, name: &str) -> Option<Student> {
        let index = self.students.iter().position(|s| s.name == name)?;
        Some(self.students.remove(index))
    }
}

/// One recorded, reversible mutation.
///
/// `Modify` carries a deep copy of the whole roster taken before a bulk
/// mutation; later edits to the live roster cannot reach into it.
#[derive(Debug, Clone)]
pub enum HistoryEntry {
    Add(Student),
    Remove(Student),
    Modify(Vec<Student>),
}

#[derive(Debug, Default)]
pub struct HistoryLog {
    undo: Vec<HistoryEntry>,
    redo: Vec<HistoryEntry>,
}

impl HistoryLog {
    /// Recording a fresh user action invalidates whatever was undone:
    /// redo history is only valid immediately after an undo.
    fn record(&mut self, entry: HistoryEntry) {
        self.undo.push(entry);
        self.redo.clear();
    }

    fn invalidate_redo(&mut self) {
        self.redo.clear();
    }

    fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

/// The in-memory gradebook session: the roster plus its undo/redo history.
///
/// Owned by `AppState`, one per daemon process. Mutations route through here
/// so the history log stays consistent with the roster; mark edits are the
/// deliberate exception and are not undoable, though they still invalidate
/// redo history like any other fresh edit.
#[derive(Debug, Default)]
pub struct Session {
    roster: Roster,
    history: HistoryLog,
}

impl Session {
    pub fn add_student(&mut self, name: &str) -> Result<usize, SessionError> {
        let index = self.roster.add_student(name)?;
        let record = self.roster.students()[index].clone();
        self.history.record(HistoryEntry::Add(record));
        Ok(index)
    }

    pub fn remove_student(&mut self, index: usize) -> Result<Student, SessionError> {
        let removed = self.roster.remove_at(index)?;
        self.history.record(HistoryEntry::Remove(removed.clone()));
        Ok(removed)
    }

    pub fn adjust_mark(
        &mut self,
        index: usize,
        category: Category,
        delta: f64,
    ) -> Result<(), SessionError> {
        self.roster.adjust_mark(index, category, delta)?;
        self.history.invalidate_redo();
        Ok(())
    }

    pub fn set_mark(
        &mut self,
        index: usize,
        category: Category,
        value: f64,
    ) -> Result<(), SessionError> {
        self.roster.set_mark(index, category, value)?;
        self.history.invalidate_redo();
        Ok(())
    }

    pub fn clear_all_marks(&mut self) {
        let before = self.roster.snapshot();
        self.roster.clear_all_marks();
        self.history.record(HistoryEntry::Modify(before));
    }

    /// Reverses the most recent recorded action. Returns false on an empty
    /// undo stack. Every branch pushes a compensating entry onto the redo
    /// stack, so a full undo/redo cycle round-trips the roster.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.undo.pop() else {
            return false;
        };
        match entry {
            HistoryEntry::Add(student) => {
                // Positional reversal: drop the last record, whichever it is.
                self.roster.pop_last();
                self.history.redo.push(HistoryEntry::Add(student));
            }
            HistoryEntry::Remove(student) => {
                // Reinsertion happens at the end, not the original index.
                self.roster.push(student.clone());
                self.history.redo.push(HistoryEntry::Remove(student));
            }
            HistoryEntry::Modify(snapshot) => {
                self.history
                    .redo
                    .push(HistoryEntry::Modify(self.roster.snapshot()));
                self.roster.replace_all(snapshot);
            }
        }
        true
    }

    /// Reapplies the most recently undone action. Returns false on an empty
    /// redo stack. A redo-remove whose name no longer matches any record is
    /// a silent no-op and pushes nothing back onto the undo stack.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.redo.pop() else {
            return false;
        };
        match entry {
            HistoryEntry::Add(student) => {
                self.roster.push(student.clone());
                self.history.undo.push(HistoryEntry::Add(student));
            }
            HistoryEntry::Remove(student) => {
                // First match wins; duplicate names are not disambiguated.
                if let Some(removed) = self.roster.remove_by_name(&student.name) {
                    self.history.undo.push(HistoryEntry::Remove(removed));
                }
            }
            HistoryEntry::Modify(snapshot) => {
                self.history
                    .undo
                    .push(HistoryEntry::Modify(self.roster.snapshot()));
                self.roster.replace_all(snapshot);
            }
        }
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn students(&self) -> &[Student] {
        self.roster.students()
    }

    pub fn get(&self, index: usize) -> Option<&Student> {
        self.roster.get(index)
    }

    pub fn snapshot(&self) -> Vec<Student> {
        self.roster.snapshot()
    }

    /// Replaces the session content with a persisted snapshot. History does
    /// not survive a reload; the stacks start empty.
    pub fn hydrate(&mut self, snapshot: Vec<Student>) {
        self.roster.replace_all(snapshot);
        self.history.clear();
    }
}
