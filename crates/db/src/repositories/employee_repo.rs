//! Repository for `employees` and the child tables filled from the same
//! snapshot (`employee_account_infos`, `employee_pay_infos`).

use hrsync_core::sync::{EmployeeAccountInfo as AccountInput, EmployeePayload};
use hrsync_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::employee::{Employee, EmployeeAccountInfo, EmployeeDetail, EmployeePayInfo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, company_id, department_id, job_title_id, grade_level_id, \
    first_name, last_name, email, employee_number, hire_date, status, \
    created_at, updated_at";

const ACCOUNT_COLUMNS: &str = "\
    id, employee_id, bank_name, account_name, account_number, is_primary, \
    created_at, updated_at";

const PAY_COLUMNS: &str =
    "employee_id, basic_pay, currency_id, pay_frequency, created_at, updated_at";

/// Mirror operations for employees.
pub struct EmployeeRepo;

impl EmployeeRepo {
    /// Upsert the employee row and replace its account infos and pay info.
    ///
    /// Runs in one transaction: accounts absent from the snapshot are
    /// removed, present ones are upserted by their upstream id, and a missing
    /// `employeePayInfo` clears the stored pay info.
    pub async fn upsert(
        pool: &PgPool,
        input: &EmployeePayload,
    ) -> Result<EmployeeDetail, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let employee = Self::upsert_row(&mut tx, input).await?;

        let keep: Vec<DbId> = input.employee_account_info.iter().map(|a| a.id).collect();
        sqlx::query("DELETE FROM employee_account_infos WHERE employee_id = $1 AND id <> ALL($2)")
            .bind(input.id)
            .bind(&keep)
            .execute(&mut *tx)
            .await?;

        let mut account_infos = Vec::with_capacity(input.employee_account_info.len());
        for account in &input.employee_account_info {
            account_infos.push(Self::upsert_account(&mut tx, input.id, account).await?);
        }

        let pay_info = match &input.employee_pay_info {
            Some(pay) => {
                let query = format!(
                    "INSERT INTO employee_pay_infos (employee_id, basic_pay, currency_id, pay_frequency)
                     VALUES ($1, $2, $3, $4)
                     ON CONFLICT (employee_id) DO UPDATE SET
                        basic_pay = EXCLUDED.basic_pay,
                        currency_id = EXCLUDED.currency_id,
                        pay_frequency = EXCLUDED.pay_frequency,
                        updated_at = NOW()
                     RETURNING {PAY_COLUMNS}"
                );
                let row = sqlx::query_as::<_, EmployeePayInfo>(&query)
                    .bind(input.id)
                    .bind(pay.basic_pay)
                    .bind(pay.currency_id)
                    .bind(&pay.pay_frequency)
                    .fetch_one(&mut *tx)
                    .await?;
                Some(row)
            }
            None => {
                sqlx::query("DELETE FROM employee_pay_infos WHERE employee_id = $1")
                    .bind(input.id)
                    .execute(&mut *tx)
                    .await?;
                None
            }
        };

        tx.commit().await?;

        Ok(EmployeeDetail {
            employee,
            account_infos,
            pay_info,
        })
    }

    async fn upsert_row(
        tx: &mut Transaction<'_, Postgres>,
        input: &EmployeePayload,
    ) -> Result<Employee, sqlx::Error> {
        let query = format!(
            "INSERT INTO employees
                (id, company_id, department_id, job_title_id, grade_level_id,
                 first_name, last_name, email, employee_number, hire_date, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             ON CONFLICT (id) DO UPDATE SET
                company_id = EXCLUDED.company_id,
                department_id = EXCLUDED.department_id,
                job_title_id = EXCLUDED.job_title_id,
                grade_level_id = EXCLUDED.grade_level_id,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                email = EXCLUDED.email,
                employee_number = EXCLUDED.employee_number,
                hire_date = EXCLUDED.hire_date,
                status = EXCLUDED.status,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(input.id)
            .bind(input.company_id)
            .bind(input.department_id)
            .bind(input.job_title_id)
            .bind(input.grade_level_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.employee_number)
            .bind(input.hire_date)
            .bind(&input.status)
            .fetch_one(&mut **tx)
            .await
    }

    async fn upsert_account(
        tx: &mut Transaction<'_, Postgres>,
        employee_id: DbId,
        account: &AccountInput,
    ) -> Result<EmployeeAccountInfo, sqlx::Error> {
        // An account id moving between employees follows the latest snapshot.
        let query = format!(
            "INSERT INTO employee_account_infos
                (id, employee_id, bank_name, account_name, account_number, is_primary)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (id) DO UPDATE SET
                employee_id = EXCLUDED.employee_id,
                bank_name = EXCLUDED.bank_name,
                account_name = EXCLUDED.account_name,
                account_number = EXCLUDED.account_number,
                is_primary = EXCLUDED.is_primary,
                updated_at = NOW()
             RETURNING {ACCOUNT_COLUMNS}"
        );
        sqlx::query_as::<_, EmployeeAccountInfo>(&query)
            .bind(account.id)
            .bind(employee_id)
            .bind(&account.bank_name)
            .bind(&account.account_name)
            .bind(&account.account_number)
            .bind(account.is_primary)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find an employee with its account infos and pay info.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<EmployeeDetail>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE id = $1");
        let Some(employee) = sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let query = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM employee_account_infos
             WHERE employee_id = $1
             ORDER BY is_primary DESC, id"
        );
        let account_infos = sqlx::query_as::<_, EmployeeAccountInfo>(&query)
            .bind(id)
            .fetch_all(pool)
            .await?;

        let query = format!("SELECT {PAY_COLUMNS} FROM employee_pay_infos WHERE employee_id = $1");
        let pay_info = sqlx::query_as::<_, EmployeePayInfo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(Some(EmployeeDetail {
            employee,
            account_infos,
            pay_info,
        }))
    }

    /// Delete by id. Account and pay infos cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
