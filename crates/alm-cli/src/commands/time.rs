use std::path::Path;

use crate::session::{Session, parse_time};

pub fn run(
    dir: &Path,
    time: Option<&str>,
    adjust_hours: i64,
    adjust_minutes: i64,
) -> Result<(), String> {
    let mut session = Session::load(dir)?;

    if let Some(text) = time {
        let time = parse_time(text)?;
        session.clock.set_time(time).map_err(|e| e.to_string())?;
        session.save()?;
    } else if adjust_hours != 0 || adjust_minutes != 0 {
        let days = session.clock.adjust_time(adjust_hours, adjust_minutes);
        if days != 0 {
            session
                .calendar
                .adjust_date(days)
                .map_err(|e| e.to_string())?;
        }
        session.save()?;
    }

    println!(
        "{}  {}",
        session.clock.time(),
        session.calendar.format_current_date()
    );
    Ok(())
}
