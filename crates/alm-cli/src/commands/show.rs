use std::path::Path;

use alm_core::{Almanac, AlmError};
use colored::Colorize;

use crate::session::Session;

pub fn run(dir: &Path) -> Result<(), String> {
    let session = Session::load(dir)?;
    let calendar = &session.calendar;
    let definition = calendar.definition();

    println!("  {}", definition.name().bold());
    println!();
    println!("  date:     {}", calendar.format_current_date());
    println!("  time:     {}", session.clock.time());
    let hemisphere = if session.latitude < 0.0 { "S" } else { "N" };
    println!("  latitude: {}°{hemisphere}", session.latitude.abs());

    let anchors = calendar.seasonal_dates_in_month(&calendar.current_date().month);
    for season in anchors {
        println!(
            "  {}",
            format!("{} on day {} this month", season.name, season.day).dimmed()
        );
    }

    // Calendars without a winter_solstice season still support date and
    // time tracking; they just have no sky to report.
    let Ok(almanac) = Almanac::for_calendar(calendar) else {
        return Ok(());
    };
    let date = calendar.current_date();

    println!();
    match (
        almanac.sunrise(date, session.latitude),
        almanac.sunset(date, session.latitude),
    ) {
        (Ok(sunrise), Ok(sunset)) => {
            let now = session.clock.time();
            let marker = if sunrise.date == *date
                && sunset.date == *date
                && now >= sunrise.time
                && now < sunset.time
            {
                "☀ day"
            } else {
                "☾ night"
            };
            println!("  sun:      {} – {}  ({marker})", sunrise.time, sunset.time);
        }
        (Err(AlmError::NoSolarEvent { .. }), _) | (_, Err(AlmError::NoSolarEvent { .. })) => {
            println!("  sun:      {}", "no rise or set (polar day or night)".dimmed());
        }
        (Err(e), _) | (_, Err(e)) => return Err(e.to_string()),
    }

    for moon in definition.moons() {
        let phase = almanac
            .moon_phase(&moon.key, date)
            .map_err(|e| e.to_string())?;
        println!(
            "  {}:   {} {}",
            moon.name,
            super::phase_icon(&phase.phase),
            phase.phase
        );
    }

    Ok(())
}
