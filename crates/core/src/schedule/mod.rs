//! Schedule endpoints

pub mod service;

pub use service::ScheduleService;
