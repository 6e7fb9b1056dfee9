pub mod company_currency_config_repo;
pub mod company_level_repo;
pub mod currency_repo;
pub mod dead_letter_repo;
pub mod department_leadership_repo;
pub mod department_repo;
pub mod employee_repo;
pub mod grade_level_repo;
pub mod holiday_repo;
pub mod job_title_repo;
pub mod overtime_payment_tier_repo;
pub mod overtime_repo;
pub mod pay_period_repo;
pub mod payroll_company_repo;

pub use company_currency_config_repo::CompanyCurrencyConfigRepo;
pub use company_level_repo::CompanyLevelRepo;
pub use currency_repo::CurrencyRepo;
pub use dead_letter_repo::DeadLetterRepo;
pub use department_leadership_repo::DepartmentLeadershipRepo;
pub use department_repo::DepartmentRepo;
pub use employee_repo::EmployeeRepo;
pub use grade_level_repo::GradeLevelRepo;
pub use holiday_repo::HolidayRepo;
pub use job_title_repo::JobTitleRepo;
pub use overtime_payment_tier_repo::OvertimePaymentTierRepo;
pub use overtime_repo::OvertimeRepo;
pub use pay_period_repo::PayPeriodRepo;
pub use payroll_company_repo::PayrollCompanyRepo;
