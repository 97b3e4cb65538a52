use std::fs;

use calendrift::cli::{entries_command, month_command, CliError, MonthArgs};
use chrono::NaiveDate;

const INPUT: &str = r#"[
    {"rating": 4.5, "categories": ["food"], "date": "12/09/2025", "description": "Ramen"},
    {"rating": 3, "categories": ["walk", "park"], "date": "02/09/2025", "description": "Park"},
    {"rating": 5, "date": "12/09/2025", "description": "Concert"},
    {"rating": 1, "date": "12/09/2025", "description": "Rain"},
    {"rating": 2, "date": "12/09/2025", "description": "Late bus"},
    {"rating": 2, "date": "soon", "description": "Skipped"}
]"#;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 14).unwrap()
}

#[test]
fn month_grid_marks_today_and_entry_days() {
    let out = month_command(&MonthArgs::default(), INPUT, today()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "September 2025");
    assert_eq!(lines[1], "Sun   Mon   Tue   Wed   Thu   Fri   Sat");
    // 1 September 2025 is a Monday; 31 August leads the first row.
    assert_eq!(lines[2], ".     1     2+1   3     4     5     6");
    assert_eq!(lines[3], "7     8     9     10    11    12+4  13");
    assert!(lines[4].starts_with("14*"));
    assert!(out.contains("2025-9-2: 3 • walk"));
    assert!(out.contains("2025-9-12: 4.5 • food, 5 • Journal, 1 • Journal (+1 more)"));
}

#[test]
fn monday_flag_and_offset() {
    let args = MonthArgs {
        offset: -9,
        monday: true,
        config: None,
    };
    let out = month_command(&args, "", today()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "December 2024");
    assert_eq!(lines[1], "Mon   Tue   Wed   Thu   Fri   Sat   Sun");
    // 1 December 2024 is a Sunday, so six days of November come first.
    assert_eq!(lines[2], ".     .     .     .     .     .     1");
}

#[test]
fn config_file_sets_week_start() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"weekStart": 1}"#).unwrap();
    let args = MonthArgs {
        config: Some(path),
        ..MonthArgs::default()
    };
    let out = month_command(&args, "[]", today()).unwrap();
    assert!(out.lines().nth(1).unwrap().starts_with("Mon"));

    let missing = MonthArgs {
        config: Some(dir.path().join("nope.json")),
        ..MonthArgs::default()
    };
    assert!(matches!(month_command(&missing, "[]", today()), Err(CliError::Io { .. })));
}

#[test]
fn entries_are_listed_oldest_first() {
    let out = entries_command(INPUT, today()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "2025-9-2\t3\twalk,park\tPark");
    assert_eq!(lines[1], "2025-9-12\t4.5\tfood\tRamen");
    assert_eq!(lines[4], "2025-9-12\t2\t\tLate bus");
}
