use crate::error::AppError;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Converts Diesel errors into `AppError` variants.
///
/// Unique violations become `AppError::Duplicate` so that services can turn
/// them into their own duplicate-key messages. Everything else is reported as
/// a database failure tagged with the operation that triggered it.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::convert_unique_violation(info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::not_found("Record not found"),
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_unique_violation(
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let entity = info
            .table_name()
            .map(str::to_string)
            .or_else(|| {
                info.constraint_name()
                    .and_then(|name| name.split('_').next())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "record".to_string());

        match info.details().and_then(Self::extract_key_value) {
            Some((field, value)) => AppError::Duplicate {
                entity,
                field,
                value,
            },
            None => AppError::Duplicate {
                entity,
                field: info.constraint_name().unwrap_or("key").to_string(),
                value: operation.to_string(),
            },
        }
    }

    /// Extracts `(columns, values)` from a PostgreSQL detail line such as
    /// `Key (product_id, review_id)=(1, 1) already exists.`
    fn extract_key_value(details: &str) -> Option<(String, String)> {
        let start = details.find("Key (")? + "Key (".len();
        let rest = &details[start..];
        let columns_end = rest.find(")=(")?;
        let columns = &rest[..columns_end];
        let values_rest = &rest[columns_end + ")=(".len()..];
        let values_end = values_rest.find(')')?;
        Some((columns.to_string(), values_rest[..values_end].to_string()))
    }
}
