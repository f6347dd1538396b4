//! Format a timestamp

use anyhow::Result;
use chrono::{Local, Utc};
use web::{format_now, format_timestamp, format_unix_millis, ClockStyle};

pub async fn run(unix_ms: Option<i64>, utc: bool, clock: ClockStyle) -> Result<()> {
    let rendered = match (unix_ms, utc) {
        (Some(ms), true) => format_unix_millis(ms, &Utc, clock)?,
        (Some(ms), false) => format_unix_millis(ms, &Local, clock)?,
        (None, true) => format_timestamp(&Utc::now(), clock),
        (None, false) => format_now(clock),
    };
    println!("{}", rendered);
    Ok(())
}
