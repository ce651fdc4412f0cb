use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::AppError;
use crate::models::{Assignment, Class, Course};

/// An entity the repository can store: it knows its id and how to build
/// itself from a create request and apply a partial update.
pub trait Record: Clone + Send + Sync + 'static {
    type New: Send + 'static;
    type Patch: Send + 'static;

    const KIND: &'static str;

    fn id(&self) -> i64;
    fn create(id: i64, new: Self::New) -> Result<Self, AppError>;
    fn apply(&mut self, patch: Self::Patch) -> Result<(), AppError>;

    /// Re-runs the create-time checks on a record that was built some other
    /// way, such as seed data. May normalise fields in place.
    fn validate(&mut self) -> Result<(), AppError>;
}

#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// Snapshot of every record, ascending by id.
    async fn get_all(&self) -> Result<Vec<R>, AppError>;
    async fn get_by_id(&self, id: i64) -> Result<R, AppError>;
    async fn create(&self, new: R::New) -> Result<R, AppError>;
    async fn update(&self, id: i64, patch: R::Patch) -> Result<R, AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

struct Table<R> {
    rows: BTreeMap<i64, R>,
    next_id: i64,
}

/// Repository over an in-memory map. Ids come from a counter that starts
/// past the largest seeded id and never goes back, so deleted ids are not
/// reused.
pub struct InMemoryRepository<R> {
    table: RwLock<Table<R>>,
}

impl<R: Record> InMemoryRepository<R> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<R>) -> Self {
        let rows: BTreeMap<i64, R> = records.into_iter().map(|r| (r.id(), r)).collect();
        let next_id = rows.keys().next_back().map_or(1, |max| max + 1);
        Self {
            table: RwLock::new(Table { rows, next_id }),
        }
    }
}

impl<R: Record> Default for InMemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> Repository<R> for InMemoryRepository<R> {
    async fn get_all(&self) -> Result<Vec<R>, AppError> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<R, AppError> {
        let table = self.table.read().await;
        table
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(R::KIND, id))
    }

    async fn create(&self, new: R::New) -> Result<R, AppError> {
        let mut table = self.table.write().await;
        let id = table.next_id;
        let record = R::create(id, new)?;
        table.next_id += 1;
        table.rows.insert(id, record.clone());
        info!("created {} {}", R::KIND, id);
        Ok(record)
    }

    async fn update(&self, id: i64, patch: R::Patch) -> Result<R, AppError> {
        let mut table = self.table.write().await;
        let current = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(R::KIND, id))?;

        // Apply to a copy so a rejected patch leaves the stored row untouched.
        let mut updated = current.clone();
        updated.apply(patch)?;
        *current = updated.clone();
        debug!("updated {} {}", R::KIND, id);
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut table = self.table.write().await;
        match table.rows.remove(&id) {
            Some(_) => {
                info!("deleted {} {}", R::KIND, id);
                Ok(())
            }
            None => Err(AppError::not_found(R::KIND, id)),
        }
    }
}

/// Initial contents for the three collections, usually read from a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub classes: Vec<Class>,
}

impl SeedData {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let seed = Self::parse(&raw)?;
        info!(
            "loaded seed data from {}: {} courses, {} assignments, {} classes",
            path.display(),
            seed.courses.len(),
            seed.assignments.len(),
            seed.classes.len()
        );
        Ok(seed)
    }

    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let mut seed: SeedData = serde_json::from_str(raw)?;
        seed.validate()?;
        Ok(seed)
    }

    /// Holds seeded records to the same rules as created ones. Ids must be
    /// unique per collection and every course reference must resolve.
    pub fn validate(&mut self) -> Result<(), AppError> {
        validate_records(&mut self.courses)?;
        validate_records(&mut self.assignments)?;
        validate_records(&mut self.classes)?;

        let course_ids: BTreeSet<i64> = self.courses.iter().map(|c| c.id).collect();
        let dangling = self
            .assignments
            .iter()
            .map(|a| (Assignment::KIND, a.id, a.course_id))
            .chain(self.classes.iter().map(|c| (Class::KIND, c.id, c.course_id)))
            .find(|(_, _, course_id)| !course_ids.contains(course_id));

        match dangling {
            Some((kind, id, course_id)) => Err(AppError::InvalidSeed(format!(
                "{} {} refers to unknown course {}",
                kind, id, course_id
            ))),
            None => Ok(()),
        }
    }
}

fn validate_records<R: Record>(records: &mut [R]) -> Result<(), AppError> {
    let mut seen = BTreeSet::new();
    for record in records.iter_mut() {
        let id = record.id();
        if !seen.insert(id) {
            return Err(AppError::InvalidSeed(format!("duplicate {} id {}", R::KIND, id)));
        }
        record
            .validate()
            .map_err(|e| AppError::InvalidSeed(format!("{} {}: {}", R::KIND, id, e)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewCourseRequest, UpdateCourseRequest};

    fn course_req(name: &str) -> NewCourseRequest {
        NewCourseRequest {
            name: name.to_string(),
            code: "CS 101".to_string(),
            instructor: "Prof. Lindqvist".to_string(),
            credits: 3,
            color: String::new(),
            semester: "Fall 2026".to_string(),
            grade_categories: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let repo: InMemoryRepository<Course> = InMemoryRepository::new();

        let first = repo.create(course_req("Programming I")).await.expect("Failed to create");
        let second = repo.create(course_req("Programming II")).await.expect("Failed to create");
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let all = repo.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Programming I");

        let fetched = repo.get_by_id(2).await.unwrap();
        assert_eq!(fetched.name, "Programming II");
    }

    #[tokio::test]
    async fn test_ids_continue_after_seed_and_are_not_reused() {
        let seeded = Course::create(41, course_req("Seeded")).unwrap();
        let repo = InMemoryRepository::with_records(vec![seeded]);

        let created = repo.create(course_req("Next")).await.unwrap();
        assert_eq!(created.id, 42);

        repo.delete(42).await.unwrap();
        let again = repo.create(course_req("After delete")).await.unwrap();
        assert_eq!(again.id, 43);
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let repo: InMemoryRepository<Course> = InMemoryRepository::new();

        assert!(matches!(repo.get_by_id(9).await, Err(AppError::NotFound(_))));
        assert!(matches!(repo.delete(9).await, Err(AppError::NotFound(_))));
        let patch = UpdateCourseRequest::default();
        assert!(matches!(repo.update(9, patch).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_rejected_create_does_not_consume_an_id() {
        let repo: InMemoryRepository<Course> = InMemoryRepository::new();
        let mut bad = course_req("Broken");
        bad.credits = 0;
        assert!(repo.create(bad).await.is_err());

        let ok = repo.create(course_req("Fine")).await.unwrap();
        assert_eq!(ok.id, 1);
    }

    #[tokio::test]
    async fn test_rejected_update_leaves_row_untouched() {
        let repo: InMemoryRepository<Course> = InMemoryRepository::new();
        let course = repo.create(course_req("Physics")).await.unwrap();

        let patch = UpdateCourseRequest {
            name: Some("Physics II".to_string()),
            credits: Some(0),
            ..Default::default()
        };
        assert!(repo.update(course.id, patch).await.is_err());

        let stored = repo.get_by_id(course.id).await.unwrap();
        assert_eq!(stored.name, "Physics");
        assert_eq!(stored.credits, 3);
    }

    #[tokio::test]
    async fn test_snapshots_are_copies() {
        let repo: InMemoryRepository<Course> = InMemoryRepository::new();
        repo.create(course_req("History")).await.unwrap();

        let mut snapshot = repo.get_all().await.unwrap();
        snapshot[0].name = "Changed locally".to_string();

        assert_eq!(repo.get_by_id(1).await.unwrap().name, "History");
    }

    #[test]
    fn test_seed_data_parses() {
        let json = r#"{
            "courses": [{"Id": 1, "name": "Biology", "code": "BIO 110", "credits": 4,
                         "gradeCategories": [{"name": "Labs", "weight": 100}]}],
            "assignments": [{"Id": 3, "courseId": 1, "title": "Lab 1", "dueDate": "2026-09-01",
                             "priority": "high", "status": "completed", "category": "Labs", "grade": 95}],
            "classes": [{"Id": 2, "courseId": 1, "dayOfWeek": 4, "startTime": "8:05", "endTime": "09:20"}]
        }"#;
        let seed = SeedData::parse(json).expect("Failed to parse seed");
        assert_eq!(seed.courses.len(), 1);
        assert_eq!(seed.assignments[0].grade, Some(95.0));
        assert_eq!(seed.classes[0].start_time, "08:05");
    }

    fn seed_with(courses: &str, assignments: &str, classes: &str) -> Result<SeedData, AppError> {
        SeedData::parse(&format!(
            r#"{{"courses": [{}], "assignments": [{}], "classes": [{}]}}"#,
            courses, assignments, classes
        ))
    }

    const BIOLOGY: &str = r#"{"Id": 1, "name": "Biology", "code": "BIO 110", "credits": 4}"#;

    #[test]
    fn test_seed_rejects_invalid_categories() {
        let course = r#"{"Id": 1, "name": "Biology", "code": "BIO 110", "credits": 4,
                         "gradeCategories": [{"name": "Homework", "weight": 30},
                                             {"name": "Homework", "weight": -10}]}"#;
        let result = seed_with(course, "", "");
        assert!(matches!(result, Err(AppError::InvalidSeed(_))));
    }

    #[test]
    fn test_seed_rejects_out_of_range_credits() {
        let course = r#"{"Id": 1, "name": "Biology", "code": "BIO 110", "credits": 4294967295}"#;
        assert!(matches!(seed_with(course, "", ""), Err(AppError::InvalidSeed(_))));
    }

    #[test]
    fn test_seed_rejects_bad_class_schedule() {
        let class = r#"{"Id": 1, "courseId": 1, "dayOfWeek": 9, "startTime": "9am", "endTime": "10:00"}"#;
        assert!(matches!(seed_with(BIOLOGY, "", class), Err(AppError::InvalidSeed(_))));
    }

    #[test]
    fn test_seed_rejects_duplicate_ids() {
        let twice = format!("{}, {}", BIOLOGY, BIOLOGY);
        match seed_with(&twice, "", "") {
            Err(AppError::InvalidSeed(msg)) => assert!(msg.contains("duplicate Course id 1")),
            other => panic!("expected duplicate id error, got {:?}", other.map(|s| s.courses.len())),
        }
    }

    #[test]
    fn test_seed_rejects_dangling_course_reference() {
        let assignment = r#"{"Id": 5, "courseId": 8, "title": "Lab 1", "dueDate": "2026-09-01",
                             "category": "Homework"}"#;
        match seed_with(BIOLOGY, assignment, "") {
            Err(AppError::InvalidSeed(msg)) => assert!(msg.contains("unknown course 8")),
            other => panic!("expected dangling reference error, got {:?}", other.map(|s| s.assignments.len())),
        }
    }
}
