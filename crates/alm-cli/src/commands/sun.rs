use std::path::Path;

use alm_core::{AlmError, Almanac, Calendar, Date, SolarMoment};

use crate::session::{Session, parse_query_date};

pub fn run(dir: &Path, date: &[String]) -> Result<(), String> {
    let session = Session::load(dir)?;
    let calendar = &session.calendar;
    let date = parse_query_date(date, calendar)?;
    let almanac = Almanac::for_calendar(calendar).map_err(|e| e.to_string())?;
    let latitude = session.latitude;

    let hemisphere = if latitude < 0.0 { "S" } else { "N" };
    println!(
        "Sun on {} at {}°{hemisphere}",
        calendar.definition().format_date(&date),
        latitude.abs()
    );

    let dawn = almanac.dawn(&date, latitude);
    let sunrise = almanac.sunrise(&date, latitude);
    let sunset = almanac.sunset(&date, latitude);
    let dusk = almanac.dusk(&date, latitude);

    print_event(calendar, &date, "dawn", &dawn)?;
    print_event(calendar, &date, "sunrise", &sunrise)?;
    print_event(calendar, &date, "sunset", &sunset)?;
    print_event(calendar, &date, "dusk", &dusk)?;

    if let (Ok(sunrise), Ok(sunset)) = (&sunrise, &sunset) {
        let up = minutes_into_day(calendar, &date, sunrise)?;
        let down = minutes_into_day(calendar, &date, sunset)?;
        let minutes_in_hour = i64::from(calendar.definition().minutes_in_hour());
        let daylight = down - up;
        println!(
            "  daylight {}h {:02}m",
            daylight / minutes_in_hour,
            daylight % minutes_in_hour
        );
    }

    Ok(())
}

fn print_event(
    calendar: &Calendar,
    query: &Date,
    label: &str,
    event: &Result<SolarMoment, AlmError>,
) -> Result<(), String> {
    match event {
        Ok(moment) if moment.date == *query => {
            println!("  {label:<8} {}", moment.time);
        }
        Ok(moment) => {
            // Normalization pushed the event onto an adjacent day.
            println!(
                "  {label:<8} {} on {}",
                moment.time,
                calendar.definition().format_date(&moment.date)
            );
        }
        Err(AlmError::NoSolarEvent { .. }) => {
            println!("  {label:<8} none (polar day or night)");
        }
        Err(e) => return Err(e.to_string()),
    }
    Ok(())
}

/// Minutes from the query date's midnight, negative or past the day length
/// when the event fell on an adjacent day.
fn minutes_into_day(
    calendar: &Calendar,
    query: &Date,
    moment: &SolarMoment,
) -> Result<i64, String> {
    let definition = calendar.definition();
    let minutes_in_hour = i64::from(definition.minutes_in_hour());
    let day_minutes = i64::from(definition.hours_in_day()) * minutes_in_hour;
    let offset = calendar
        .days_between(query, &moment.date)
        .map_err(|e| e.to_string())?;
    Ok(offset * day_minutes
        + i64::from(moment.time.hour) * minutes_in_hour
        + i64::from(moment.time.minute))
}
