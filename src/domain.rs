mod month_year;
mod service_name;

pub use month_year::MonthYear;
pub use service_name::ServiceName;
