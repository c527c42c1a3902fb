//! Domain models for the scheduling service

pub mod employee;
pub mod schedule;

// Re-export for convenience
pub use employee::{
    Employee, EmployeeResponse, NewEmployee, ROLE_ADMIN, ROLE_EMPLOYEE, RoleSet, UpdateEmployee,
};
pub use schedule::{
    EmployeeSummary, NewSchedule, Position, Schedule, ScheduleResponse, UpdateSchedule,
};
