// src/db.rs

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

pub async fn connect_sqlite(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new();
    let pool = if database_url.contains(":memory:") {
        // every connection to :memory: is its own database; keep exactly one alive
        pool.max_connections(1).idle_timeout(None).max_lifetime(None)
    } else {
        pool.max_connections(5)
    };

    pool.connect_with(opts).await
}

/// Create tables if needed and seed an empty database.
pub async fn init(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    create_tables(pool).await?;
    seed_if_empty(pool).await?;
    Ok(())
}

pub async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS patients (
          id    INTEGER PRIMARY KEY AUTOINCREMENT,
          name  TEXT NOT NULL,
          age   INTEGER NOT NULL,
          phone TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS doctors (
          id        INTEGER PRIMARY KEY AUTOINCREMENT,
          name      TEXT NOT NULL,
          specialty TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
          id         INTEGER PRIMARY KEY AUTOINCREMENT,
          patient_id INTEGER NOT NULL REFERENCES patients(id),
          doctor_id  INTEGER NOT NULL REFERENCES doctors(id),
          date       TEXT NOT NULL,
          time       TEXT NOT NULL,
          reason     TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

const SEED_PATIENTS: &[(&str, i64, &str)] = &[
    ("Ali Khan", 30, "0300-1234567"),
    ("Sara Ahmed", 25, "0321-9876543"),
    ("John Doe", 40, "0333-5555555"),
    ("Fatima Hassan", 35, "0345-1122334"),
    ("Ahmed Raza", 50, "0311-9988776"),
    ("Zainab Ali", 28, "0301-2233445"),
    ("Hassan Mahmood", 45, "0322-6677889"),
    ("Ayesha Malik", 8, "0333-4455667"),
    ("Omar Farooq", 55, "0300-7788990"),
    ("Maria Khan", 32, "0321-5566778"),
];

const SEED_DOCTORS: &[(&str, &str)] = &[
    ("Smith", "Cardiologist"),
    ("Ayesha", "Dentist"),
    ("Ahmed", "Neurologist"),
    ("Fatima", "Orthopedic Surgeon"),
    ("Hassan", "Dermatologist"),
    ("Zain", "General Physician"),
    ("Noor", "Pediatrician"),
    ("Usman", "ENT Specialist"),
];

/// (patient index, doctor index, date, time, reason), indexes into the tables above.
const SEED_APPOINTMENTS: &[(usize, usize, &str, &str, &str)] = &[
    (0, 0, "2024-01-15", "10:00 AM", "Chest Pain"),
    (1, 1, "2024-01-16", "11:30 AM", "Root Canal"),
    (2, 5, "2024-01-17", "09:00 AM", "Regular Checkup"),
    (3, 4, "2024-01-18", "02:00 PM", "Skin Rash"),
    (4, 2, "2024-01-19", "10:30 AM", "Migraine"),
    (5, 1, "2024-01-20", "03:00 PM", "Tooth Cleaning"),
    (6, 3, "2024-01-21", "11:00 AM", "Knee Pain"),
    (7, 6, "2024-01-22", "01:00 PM", "Vaccination"),
    (8, 0, "2024-01-23", "09:30 AM", "Blood Pressure Check"),
    (9, 7, "2024-01-24", "04:00 PM", "Ear Infection"),
];

/// Returns true when sample data was inserted.
pub async fn seed_if_empty(pool: &SqlitePool) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM patients")
        .fetch_one(pool)
        .await?
        .try_get("n")?;

    if count > 0 {
        tracing::info!("Database already has data.");
        return Ok(false);
    }

    tracing::info!("Populating database with sample data...");
    let mut tx = pool.begin().await?;

    let mut patient_ids = Vec::with_capacity(SEED_PATIENTS.len());
    for &(name, age, phone) in SEED_PATIENTS {
        let id = sqlx::query("INSERT INTO patients (name, age, phone) VALUES (?, ?, ?)")
            .bind(name)
            .bind(age)
            .bind(phone)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();
        patient_ids.push(id);
    }

    let mut doctor_ids = Vec::with_capacity(SEED_DOCTORS.len());
    for &(name, specialty) in SEED_DOCTORS {
        let id = sqlx::query("INSERT INTO doctors (name, specialty) VALUES (?, ?)")
            .bind(name)
            .bind(specialty)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();
        doctor_ids.push(id);
    }

    for &(p, d, date, time, reason) in SEED_APPOINTMENTS {
        sqlx::query(
            "INSERT INTO appointments (patient_id, doctor_id, date, time, reason) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(patient_ids[p])
        .bind(doctor_ids[d])
        .bind(date)
        .bind(time)
        .bind(reason)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!(
        "Database populated with {} patients, {} doctors, and {} appointments!",
        SEED_PATIENTS.len(),
        SEED_DOCTORS.len(),
        SEED_APPOINTMENTS.len()
    );
    Ok(true)
}

/// Drop every user table. The next `init` starts from fresh sample data.
pub async fn reset(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_all(pool)
    .await?;

    let mut tables: Vec<String> = rows
        .iter()
        .map(|r| r.try_get::<String, _>("name"))
        .collect::<Result<_, _>>()?;

    // children before parents
    tables.sort_by_key(|t| match t.as_str() {
        "appointments" => 0,
        "patients" | "doctors" => 1,
        _ => 2,
    });

    for table in &tables {
        sqlx::query(&format!("DROP TABLE IF EXISTS \"{table}\""))
            .execute(pool)
            .await?;
        tracing::info!("Deleted table: {table}");
    }
    Ok(tables)
}
