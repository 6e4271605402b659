//! The record data model and single-row database operations.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, auth::UserID, database_id::RecordId};

/// Which of the two record collections an operation targets.
///
/// Expenses and incomes have identical shapes but live in separate
/// tables. Every shared query takes a [RecordKind] to pick the table,
/// so both features flow through the same code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Money spent.
    Expense,
    /// Money earned.
    Income,
}

impl RecordKind {
    /// The SQL table backing this kind of record.
    pub(crate) fn table(self) -> &'static str {
        match self {
            RecordKind::Expense => "expense",
            RecordKind::Income => "income",
        }
    }

    /// Lower-case singular noun for user-facing messages.
    pub fn noun(self) -> &'static str {
        match self {
            RecordKind::Expense => "expense",
            RecordKind::Income => "income",
        }
    }
}

/// A single expense or income entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The ID of the record.
    pub id: RecordId,
    /// The user that created the record. Set at creation and never
    /// changed by updates.
    pub user_id: UserID,
    /// A text description of what the entry was for.
    pub description: String,
    /// The amount of money in whole rupiah.
    pub amount: i64,
    /// When the expense or income happened.
    pub date: Date,
    /// When the record was inserted.
    pub created_at: OffsetDateTime,
    /// When the record was last modified.
    pub updated_at: OffsetDateTime,
}

/// A validated record payload, ready to be written to the store.
///
/// Use [RecordForm::validate](crate::record::RecordForm::validate) to
/// obtain one; the invariants (non-empty description of at most 255
/// characters, non-negative amount) are enforced there, at the
/// boundary, not by the tables.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
    /// A text description of what the entry was for.
    pub description: String,
    /// The amount of money in whole rupiah.
    pub amount: i64,
    /// When the expense or income happened.
    pub date: Date,
}

/// The columns selected by every record query, in [map_record_row] order.
pub(crate) const RECORD_COLUMNS: &str =
    "id, user_id, description, amount, date, created_at, updated_at";

/// Map a database row to a [Record].
pub(crate) fn map_record_row(row: &Row) -> Result<Record, rusqlite::Error> {
    Ok(Record {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        description: row.get(2)?,
        amount: row.get(3)?,
        date: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Create the expense and income tables in the database.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL
/// error.
pub fn create_record_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    for kind in [RecordKind::Expense, RecordKind::Income] {
        connection.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id INTEGER PRIMARY KEY,
                    user_id INTEGER NOT NULL,
                    description TEXT NOT NULL,
                    amount INTEGER NOT NULL,
                    date TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
                kind.table()
            ),
            (),
        )?;
    }

    Ok(())
}

/// Insert a new record owned by `user_id` into the store and return it.
///
/// The store manages `created_at` and `updated_at` itself.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error, e.g. when
/// `user_id` does not refer to an existing user.
pub fn create_record(
    kind: RecordKind,
    draft: RecordDraft,
    user_id: UserID,
    connection: &Connection,
) -> Result<Record, Error> {
    let now = OffsetDateTime::now_utc();

    let record = connection
        .prepare(&format!(
            "INSERT INTO {} (user_id, description, amount, date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {RECORD_COLUMNS}",
            kind.table()
        ))?
        .query_row(
            params![
                user_id.as_i64(),
                draft.description,
                draft.amount,
                draft.date,
                now,
                now
            ],
            map_record_row,
        )?;

    Ok(record)
}

/// Retrieve a record from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an existing record,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_record(kind: RecordKind, id: RecordId, connection: &Connection) -> Result<Record, Error> {
    let record = connection
        .prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM {} WHERE id = :id",
            kind.table()
        ))?
        .query_row(&[(":id", &id)], map_record_row)?;

    Ok(record)
}

/// Overwrite the description, amount, and date of the record with `id`.
///
/// The owner is deliberately excluded from the mutation; `updated_at`
/// is bumped by the store.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingRecord] if `id` does not refer to an existing record,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_record(
    kind: RecordKind,
    id: RecordId,
    draft: RecordDraft,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        &format!(
            "UPDATE {} SET description = ?1, amount = ?2, date = ?3, updated_at = ?4
             WHERE id = ?5",
            kind.table()
        ),
        params![
            draft.description,
            draft.amount,
            draft.date,
            OffsetDateTime::now_utc(),
            id
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingRecord);
    }

    Ok(())
}

/// Delete the record with `id`. Deletion is immediate and permanent.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingRecord] if `id` does not refer to an existing record,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_record(kind: RecordKind, id: RecordId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        &format!("DELETE FROM {} WHERE id = :id", kind.table()),
        &[(":id", &id)],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingRecord);
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        auth::{PasswordHash, UserID, create_user},
        db::initialize,
    };

    use super::{
        Record, RecordDraft, RecordKind, create_record, delete_record, get_record, update_record,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_user(PasswordHash::new_unchecked("hunter2"), &conn).unwrap();
        conn
    }

    fn lunch_draft() -> RecordDraft {
        RecordDraft {
            description: "Makan siang".to_owned(),
            amount: 50_000,
            date: date!(2024 - 01 - 10),
        }
    }

    #[test]
    fn create_returns_stored_record() {
        let conn = get_test_connection();
        let draft = lunch_draft();

        let record =
            create_record(RecordKind::Expense, draft.clone(), UserID::new(1), &conn).unwrap();

        assert!(record.id > 0);
        assert_eq!(record.user_id, UserID::new(1));
        assert_eq!(record.description, draft.description);
        assert_eq!(record.amount, draft.amount);
        assert_eq!(record.date, draft.date);
    }

    #[test]
    fn create_fails_with_unknown_user() {
        let conn = get_test_connection();

        let result = create_record(RecordKind::Expense, lunch_draft(), UserID::new(42), &conn);

        assert!(
            matches!(result, Err(Error::SqlError(_))),
            "want SQL error for unknown user, got {result:?}"
        );
    }

    #[test]
    fn expense_and_income_tables_are_separate() {
        let conn = get_test_connection();

        create_record(RecordKind::Expense, lunch_draft(), UserID::new(1), &conn).unwrap();

        assert_eq!(
            get_record(RecordKind::Income, 1, &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn get_returns_created_record() {
        let conn = get_test_connection();
        let created =
            create_record(RecordKind::Income, lunch_draft(), UserID::new(1), &conn).unwrap();

        let fetched = get_record(RecordKind::Income, created.id, &conn).unwrap();

        assert_eq!(created, fetched);
    }

    #[test]
    fn get_fails_with_invalid_id() {
        let conn = get_test_connection();

        assert_eq!(
            get_record(RecordKind::Expense, 1337, &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn update_overwrites_fields_but_not_owner() {
        let conn = get_test_connection();
        let created =
            create_record(RecordKind::Expense, lunch_draft(), UserID::new(1), &conn).unwrap();
        let new_draft = RecordDraft {
            description: "Makan malam".to_owned(),
            amount: 75_000,
            date: date!(2024 - 01 - 11),
        };

        update_record(RecordKind::Expense, created.id, new_draft.clone(), &conn).unwrap();

        let updated = get_record(RecordKind::Expense, created.id, &conn).unwrap();
        assert_eq!(
            updated,
            Record {
                id: created.id,
                user_id: created.user_id,
                description: new_draft.description,
                amount: new_draft.amount,
                date: new_draft.date,
                created_at: created.created_at,
                updated_at: updated.updated_at,
            }
        );
        assert!(updated.updated_at >= created.updated_at);
    }

    #[test]
    fn update_fails_with_missing_record() {
        let conn = get_test_connection();

        let result = update_record(RecordKind::Expense, 99, lunch_draft(), &conn);

        assert_eq!(result, Err(Error::UpdateMissingRecord));
    }

    #[test]
    fn delete_removes_record() {
        let conn = get_test_connection();
        let created =
            create_record(RecordKind::Expense, lunch_draft(), UserID::new(1), &conn).unwrap();

        delete_record(RecordKind::Expense, created.id, &conn).unwrap();

        assert_eq!(
            get_record(RecordKind::Expense, created.id, &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_fails_with_missing_record() {
        let conn = get_test_connection();

        let result = delete_record(RecordKind::Income, 99, &conn);

        assert_eq!(result, Err(Error::DeleteMissingRecord));
    }
}
