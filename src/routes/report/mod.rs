mod handler;
mod model;

pub use handler::create_report;
pub use model::CreateReportRequest;
