// src/bin/book.rs
// Command line booking client for the intake endpoint
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use optimum_bookings::client::{
    compress_to_data_url, encode_issue_photos, is_urgent, today_local, BookingFlow, FeeSchedule,
    IntakeClient, LocalBookings, SubmissionStatus, DEFAULT_PAYLOAD_BUDGET, PAYMENT_SCREENSHOT,
};
use optimum_bookings::models::{BookingSubmission, ImagePayload};
use std::env;
use std::path::{Path, PathBuf};

// --- ANSI colours ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

const DEFAULT_LOCAL_BOOKINGS: &str = "data/my_bookings.json";

#[derive(Parser)]
#[command(name = "book")]
#[command(about = "Book an Optimum Electricals visit from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show free and booked time slots for a date
    Slots {
        /// Booking date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
    },
    /// Price a visit for a locality and date
    Quote {
        #[arg(short, long)]
        locality: String,
        /// Booking date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
    },
    /// Submit a booking described by a JSON file
    Submit {
        /// Booking fields in the camelCase shape the endpoint accepts
        #[arg(short, long)]
        file: PathBuf,
        /// Photo of the problem (repeatable, at most 6)
        #[arg(short, long = "image")]
        images: Vec<PathBuf>,
        /// Payment screenshot; required unless the JSON file already carries one
        #[arg(short, long)]
        screenshot: Option<PathBuf>,
    },
    /// List bookings made from this machine
    List,
}

fn fee_schedule() -> Result<FeeSchedule> {
    match env::var("FEE_SCHEDULE") {
        Ok(value) => Ok(value.parse()?),
        Err(_) => Ok(FeeSchedule::default()),
    }
}

fn local_bookings() -> LocalBookings {
    LocalBookings::new(
        env::var("LOCAL_BOOKINGS_PATH").unwrap_or_else(|_| DEFAULT_LOCAL_BOOKINGS.to_string()),
    )
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image.jpg".to_string())
}

async fn show_slots(client: &IntakeClient, date: &str) {
    let slots = client.available_slots(date).await;

    println!("{}{}Time slots for {}{}", BOLD, CYAN, date, RESET);
    for slot in &slots.all {
        if slots.is_available(slot) {
            println!("  {}✓ {}{}", GREEN, slot, RESET);
        } else {
            println!("  {}✗ {} (booked){}", RED, slot, RESET);
        }
    }
    if slots.degraded {
        println!(
            "{}Could not reach the booking service; every slot is shown as free{}",
            YELLOW, RESET
        );
    }
}

fn show_quote(schedule: FeeSchedule, locality: &str, date: &str) {
    let urgent = is_urgent(date, today_local());
    let fees = schedule.breakdown(locality, urgent);

    println!("{}Visit charge for {} on {}{}", BOLD, locality, date, RESET);
    println!("  Visit fee:       ₹{}", fees.locality_fee);
    if fees.urgent_fee > 0 {
        println!("  Same-day charge: ₹{}", fees.urgent_fee);
    }
    if fees.discount > 0 {
        println!("  Discount:       -₹{}", fees.discount);
    }
    println!("  {}Total:           ₹{}{}", BOLD, fees.total, RESET);
}

async fn submit(
    client: &IntakeClient,
    schedule: FeeSchedule,
    file: &Path,
    images: &[PathBuf],
    screenshot: Option<&Path>,
) -> Result<()> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    let mut booking: BookingSubmission =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", file.display()))?;

    if !images.is_empty() {
        let mut files = Vec::with_capacity(images.len());
        for path in images {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            files.push((file_name(path), bytes));
        }
        booking.images = encode_issue_photos(&files, DEFAULT_PAYLOAD_BUDGET)?;
    }

    if let Some(path) = screenshot {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        booking.payment_screenshot = Some(ImagePayload {
            name: file_name(path),
            data: Some(compress_to_data_url(&bytes, PAYMENT_SCREENSHOT)?),
        });
    }

    let local = local_bookings();
    let flow = BookingFlow {
        client,
        local: &local,
        schedule,
    };
    let outcome = flow.confirm(booking, today_local()).await?;
    let saved = &outcome.record.booking;

    match &outcome.status {
        SubmissionStatus::Confirmed(_) => println!(
            "{}{}Booking confirmed{} for {} on {} ({}), total ₹{}",
            BOLD, GREEN, RESET, saved.customer_name, saved.booking_date,
            saved.preferred_time_slot, saved.total_fee
        ),
        SubmissionStatus::NotConfigured => println!(
            "{}Booking saved on this machine only; set BOOKING_API_URL to send it{}",
            YELLOW, RESET
        ),
        SubmissionStatus::Failed(error) => {
            bail!("booking was not saved by the service: {}", error)
        }
    }

    Ok(())
}

async fn list() {
    let records = local_bookings().load().await;
    if records.is_empty() {
        println!("No bookings yet");
        return;
    }

    // Newest first
    for record in records.iter().rev() {
        let b = &record.booking;
        println!(
            "{}{}{} {} {} | {} | ₹{} | {}",
            BOLD, b.booking_date, RESET, b.preferred_time_slot, b.customer_name,
            b.locality, b.total_fee, record.sync_status
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "warn");
    }
    env_logger::init();

    let cli = Cli::parse();
    let client = IntakeClient::from_env();

    match cli.command {
        Command::Slots { date } => show_slots(&client, &date).await,
        Command::Quote { locality, date } => show_quote(fee_schedule()?, &locality, &date),
        Command::Submit {
            file,
            images,
            screenshot,
        } => {
            submit(&client, fee_schedule()?, &file, &images, screenshot.as_deref()).await?
        }
        Command::List => list().await,
    }

    Ok(())
}
