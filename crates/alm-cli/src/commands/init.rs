use std::fs;
use std::path::Path;

use crate::session::{CALENDAR_FILE, SESSION_FILE, Session};

/// Starter calendar: the Calendar of Harptos, the one most tables reach
/// for first. Every feature of the format appears at least once, so the
/// file doubles as a reference for writing your own.
const STARTER_CALENDAR: &str = r#"# Calendar of Harptos — edit freely, or replace wholesale.
#
# Months are listed in year order. A one-day month is a festival day and
# is rendered without a day number. `leap_year_days` gives a month's
# length in leap years when it differs (Midsummer gains Shieldmeet).

name = "Calendar of Harptos"
hours_in_day = 24
minutes_in_hour = 60
solar_days_in_year = 365.25
axial_tilt = 23.5
leap_year_rule = "year % 4 == 0"
default_date = { day = 1, month = "hammer", year = 1489 }

[[months]]
key = "hammer"
name = "Hammer"
alt_name = "Deepwinter"
days = 30

[[months]]
key = "midwinter"
name = "Midwinter"
days = 1

[[months]]
key = "alturiak"
name = "Alturiak"
alt_name = "The Claw of Winter"
days = 30

[[months]]
key = "ches"
name = "Ches"
alt_name = "The Claw of the Sunsets"
days = 30

[[months]]
key = "tarsakh"
name = "Tarsakh"
alt_name = "The Claw of the Storms"
days = 30

[[months]]
key = "greengrass"
name = "Greengrass"
days = 1

[[months]]
key = "mirtul"
name = "Mirtul"
alt_name = "The Melting"
days = 30

[[months]]
key = "kythorn"
name = "Kythorn"
alt_name = "The Time of Flowers"
days = 30

[[months]]
key = "flamerule"
name = "Flamerule"
alt_name = "Summertide"
days = 30

[[months]]
key = "midsummer"
name = "Midsummer"
days = 1
leap_year_days = 2

[[months]]
key = "eleasis"
name = "Eleasis"
alt_name = "Highsun"
days = 30

[[months]]
key = "eleint"
name = "Eleint"
alt_name = "The Fading"
days = 30

[[months]]
key = "highharvestide"
name = "Highharvestide"
days = 1

[[months]]
key = "marpenoth"
name = "Marpenoth"
alt_name = "Leaffall"
days = 30

[[months]]
key = "uktar"
name = "Uktar"
alt_name = "The Rotting"
days = 30

[[months]]
key = "feast_of_the_moon"
name = "Feast of the Moon"
days = 1

[[months]]
key = "nightal"
name = "Nightal"
alt_name = "The Drawing Down"
days = 30

[[seasons]]
key = "winter_solstice"
name = "Winter Solstice"
month = "nightal"
day = 20

[[seasons]]
key = "spring_equinox"
name = "Spring Equinox"
month = "ches"
day = 19

[[seasons]]
key = "summer_solstice"
name = "Summer Solstice"
month = "kythorn"
day = 20

[[seasons]]
key = "autumn_equinox"
name = "Autumn Equinox"
month = "eleint"
day = 21

[[moons]]
key = "selune"
name = "Selûne"
full = { day = 15, month = "hammer", year = 1489 }
period = 30.4375
"#;

pub fn run(name: &str) -> Result<(), String> {
    let dir = Path::new(name);

    if dir.exists() {
        return Err(format!("directory '{name}' already exists"));
    }

    fs::create_dir_all(dir).map_err(|e| format!("cannot create directory: {e}"))?;
    fs::write(dir.join(CALENDAR_FILE), STARTER_CALENDAR)
        .map_err(|e| format!("cannot write {CALENDAR_FILE}: {e}"))?;

    // Loading validates the starter file and seeds the state at the
    // calendar's default date.
    let session = Session::load(dir)?;
    session.save()?;

    println!("Created session '{name}' in {name}/");
    println!("  {CALENDAR_FILE}  — calendar definition (Calendar of Harptos)");
    println!("  {SESSION_FILE}   — current date, time, and latitude");
    println!();
    println!("Get started:");
    println!("  cd {name}");
    println!("  almagest show            # Date, time, and sky at a glance");
    println!("  almagest date 25 hammer  # Set the date");
    println!("  almagest time 07:30      # Set the time");
    println!("  almagest calendar        # Year overview");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alm_core::CalendarDocument;

    #[test]
    fn starter_calendar_parses_and_validates() {
        let document: CalendarDocument = toml::from_str(STARTER_CALENDAR).unwrap();
        let definition = alm_core::CalendarDefinition::from_document(document).unwrap();
        assert_eq!(definition.months().len(), 17);
        assert_eq!(definition.days_in_year(1489), 365);
        assert_eq!(definition.days_in_year(1488), 366);
    }
}
