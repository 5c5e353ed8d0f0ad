use std::path::Path;

use crate::session::{Session, parse_date_parts};

pub fn run(dir: &Path, date: &[String], adjust: Option<i64>) -> Result<(), String> {
    let mut session = Session::load(dir)?;

    if let Some(days) = adjust {
        session
            .calendar
            .adjust_date(days)
            .map_err(|e| e.to_string())?;
        session.save()?;
    } else if !date.is_empty() {
        let parts = parse_date_parts(date)?;
        session
            .calendar
            .set_date(parts)
            .map_err(|e| e.to_string())?;
        session.save()?;
    }

    println!("{}", session.calendar.format_current_date());
    Ok(())
}
