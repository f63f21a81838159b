use std::env;
use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use jsonwebtoken::EncodingKey;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime, Time};

use donidam::{
    DEFAULT_TIMEZONE, UserId, encode_token, format_timestamp, get_local_offset, initialize_db,
};

/// A utility for creating a test database for the REST API server of donidam.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The ID of the test user, i.e. the `sub` claim of their tokens.
    #[arg(long, default_value = "test-user")]
    user_id: String,

    /// The test user's monthly budget in won.
    #[arg(long, default_value_t = 1_000_000)]
    monthly_budget: i64,
}

/// (type, category, amount, is fixed, day of month, hour)
const SAMPLE_TRANSACTIONS: [(&str, &str, i64, bool, u8, u8); 8] = [
    ("IN", "ETC", 3_200_000, true, 1, 9),
    ("OUT", "HOUSING", 450_000, true, 1, 10),
    ("OUT", "TELECOM", 55_000, true, 2, 11),
    ("OUT", "FOOD", 12_000, false, 3, 12),
    ("OUT", "CAFE", 4_800, false, 3, 15),
    ("OUT", "TRANSPORT", 1_550, false, 4, 8),
    ("OUT", "SHOPPING", 89_000, false, 5, 20),
    ("OUT", "FOOD", 23_500, false, 6, 19),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    if args.monthly_budget < 0 {
        eprintln!("The monthly budget cannot be negative.");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let local_offset =
        get_local_offset(DEFAULT_TIMEZONE).ok_or("Could not get the local timezone")?;
    let now = OffsetDateTime::now_utc().to_offset(local_offset);
    let now_text = format_timestamp(now);

    println!("Creating profile for {}...", args.user_id);
    conn.execute(
        "INSERT INTO profile (user_id, monthly_budget, created_at) VALUES (?1, ?2, ?3)",
        (&args.user_id, args.monthly_budget, &now_text),
    )?;

    println!("Creating transactions for the current month...");
    let first_of_month = now.replace_day(1)?;
    for (transaction_type, category, amount, is_fixed, day, hour) in SAMPLE_TRANSACTIONS {
        let created_at = first_of_month
            .replace_time(Time::from_hms(hour, 0, 0)?)
            .saturating_add(Duration::days(i64::from(day - 1)));

        // Keep to the days of the month that have already happened.
        if created_at > now {
            continue;
        }

        let created_at = format_timestamp(created_at);
        conn.execute(
            "INSERT INTO \"transaction\" \
            (user_id, type, category, amount, is_fixed, created_at, updated_at) \
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            (
                &args.user_id,
                transaction_type,
                category,
                amount,
                is_fixed,
                &created_at,
            ),
        )?;
    }

    match env::var("JWT_SECRET") {
        Ok(secret) => {
            let token = encode_token(
                &UserId::new(args.user_id),
                Duration::days(30),
                &EncodingKey::from_secret(secret.as_bytes()),
            )?;
            println!("Bearer token (valid for 30 days):\n{token}");
        }
        Err(_) => println!("Set JWT_SECRET to also print a bearer token for the test user."),
    }

    println!("Success!");

    Ok(())
}
