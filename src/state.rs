use std::sync::Arc;

use chrono::NaiveDate;

use crate::dates::DateStatus;
use crate::models::{Assignment, Class, Course};
use crate::repository::{InMemoryRepository, Repository, SeedData};
use crate::services::{DashboardService, GradeService, PlannerService};

#[derive(Clone)]
pub struct AppState {
    pub courses: Arc<dyn Repository<Course>>,
    pub assignments: Arc<dyn Repository<Assignment>>,
    pub classes: Arc<dyn Repository<Class>>,
    /// Fixed reference day; the local clock is read per request when unset.
    pinned_day: Option<NaiveDate>,
}

impl AppState {
    pub fn in_memory() -> Self {
        Self::from_seed(SeedData::default())
    }

    pub fn from_seed(seed: SeedData) -> Self {
        Self {
            courses: Arc::new(InMemoryRepository::with_records(seed.courses)),
            assignments: Arc::new(InMemoryRepository::with_records(seed.assignments)),
            classes: Arc::new(InMemoryRepository::with_records(seed.classes)),
            pinned_day: None,
        }
    }

    pub fn pinned_to(mut self, day: NaiveDate) -> Self {
        self.pinned_day = Some(day);
        self
    }

    pub fn date_status(&self) -> DateStatus {
        match self.pinned_day {
            Some(day) => DateStatus::on(day),
            None => DateStatus::today(),
        }
    }

    pub fn planner(&self) -> PlannerService {
        PlannerService::new(self.courses.clone(), self.assignments.clone(), self.classes.clone())
    }

    pub fn grades(&self) -> GradeService {
        GradeService::new(self.courses.clone(), self.assignments.clone())
    }

    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.courses.clone(), self.assignments.clone(), self.classes.clone())
    }
}
