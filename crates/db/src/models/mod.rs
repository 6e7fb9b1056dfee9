pub mod dead_letter;
pub mod employee;
pub mod organization;
pub mod payroll;
