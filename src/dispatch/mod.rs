pub mod batch;
pub mod dates;
pub mod group;
pub mod mileage;
pub mod report;

pub use dates::expand_date_range;
pub use group::{group_all, group_consecutive};
pub use mileage::{distribute_mileage, DailyMileage};
pub use report::monthly_driving_log;
