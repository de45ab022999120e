mod handler;
mod model;

pub use handler::{delete_confession, list_reports, update_report, update_user};
pub use model::{DeleteResponse, ReportQuery, UpdateReportRequest, UpdateUserRequest};
