/// State management module
///
/// This module holds everything the controller owns:
/// - Processing parameters forwarded to the comparison program (params.rs)
/// - Form fields and their validation (form.rs)
/// - Job lifecycle tracking (job.rs)

pub mod form;
pub mod job;
pub mod params;
