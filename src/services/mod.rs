pub mod assignments;
pub mod dashboard;
pub mod grading;
pub mod planner;

pub use assignments::{
    AssignmentList, AssignmentQuery, AssignmentView, SortKey, SortOrder, StatusCounts, StatusFilter, status_counts,
};
pub use dashboard::{Dashboard, DashboardService};
pub use grading::{AwaitingGrade, CourseBreakdown, CourseGrade, GradeReport, GradeService};
pub use planner::PlannerService;
