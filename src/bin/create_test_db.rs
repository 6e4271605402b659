//! Creates a database with sample data for local development.
//!
//! The seeded password is "catatan dev password", hashed with a low
//! bcrypt cost since this data never leaves the developer's machine.

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use catatan::{
    PasswordHash, RecordDraft, RecordKind, create_record, create_user, initialize_db,
};

/// Creates a test database with sample expenses and incomes.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path for the SQLite database to create.
    #[arg(long, default_value = "test.db")]
    db_path: String,
}

const SAMPLE_EXPENSES: [(&str, i64); 8] = [
    ("Makan siang", 50_000),
    ("Kopi pagi", 25_000),
    ("Bensin motor", 30_000),
    ("Belanja mingguan", 350_000),
    ("Langganan internet", 299_000),
    ("Parkir", 5_000),
    ("Nasi goreng", 28_000),
    ("Pulsa", 100_000),
];

const SAMPLE_INCOMES: [(&str, i64); 3] = [
    ("Gaji bulanan", 8_000_000),
    ("Bonus proyek", 1_500_000),
    ("Penjualan barang bekas", 250_000),
];

fn main() {
    let args = Args::parse();

    let connection = Connection::open(&args.db_path).expect("Could not open the database file");
    initialize_db(&connection).expect("Could not initialize the database");

    let password_hash = bcrypt::hash("catatan dev password", 4).expect("Could not hash password");
    let user = create_user(PasswordHash::new_unchecked(&password_hash), &connection)
        .expect("Could not create the test user");

    let today = OffsetDateTime::now_utc().date();

    for (days_ago, (description, amount)) in SAMPLE_EXPENSES.iter().enumerate() {
        create_record(
            RecordKind::Expense,
            RecordDraft {
                description: (*description).to_owned(),
                amount: *amount,
                date: days_before(today, days_ago as i64),
            },
            user.id,
            &connection,
        )
        .expect("Could not create sample expense");
    }

    for (days_ago, (description, amount)) in SAMPLE_INCOMES.iter().enumerate() {
        create_record(
            RecordKind::Income,
            RecordDraft {
                description: (*description).to_owned(),
                amount: *amount,
                date: days_before(today, days_ago as i64 * 14),
            },
            user.id,
            &connection,
        )
        .expect("Could not create sample income");
    }

    println!(
        "Created {} with {} expenses and {} incomes.",
        args.db_path,
        SAMPLE_EXPENSES.len(),
        SAMPLE_INCOMES.len()
    );
}

fn days_before(date: Date, days: i64) -> Date {
    date.saturating_sub(Duration::days(days))
}
