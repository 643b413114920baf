//! Study analytics.

pub mod report;

pub use report::{format_duration, DailyStudyTime, ReportPeriod, StatsReport, SubjectStudyTime};
