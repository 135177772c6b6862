use chrono::NaiveDate;
use drought_calendar::{
    CalendarPosition, CalibrationWindow, Periodicity, day_position, month_of_day_position,
    positions, validate_positions,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn monthly_positions_cycle_through_years() {
    let pos = positions(Periodicity::Monthly, date(1981, 1, 1), 36);
    assert_eq!(pos.len(), 36);
    for (i, &p) in pos.iter().enumerate() {
        assert_eq!(p as usize, i % 12 + 1, "index {i}");
    }
    assert!(validate_positions(&pos, Periodicity::Monthly).is_ok());
}

#[test]
fn daily_positions_cover_every_slot_over_four_years() {
    let pos = positions(Periodicity::Daily, date(2000, 1, 1), 1461);
    let mut counts = [0usize; 366];
    for &p in &pos {
        counts[CalendarPosition::new(p, Periodicity::Daily).unwrap().index()] += 1;
    }
    // February 29 appears once (2000), every other slot four times.
    assert_eq!(counts[59], 1);
    for (i, &c) in counts.iter().enumerate() {
        if i != 59 {
            assert_eq!(c, 4, "position {}", i + 1);
        }
    }
}

#[test]
fn same_date_same_position_across_years() {
    for year in 1990..2010 {
        assert_eq!(day_position(date(year, 7, 4)), 186, "year {year}");
        assert_eq!(month_of_day_position(day_position(date(year, 7, 4))).unwrap(), 7);
    }
}

#[test]
fn calibration_window_matches_position_tags() {
    let start = date(1981, 1, 1);
    let len = 40 * 12;
    let pos = positions(Periodicity::Monthly, start, len);
    let window = CalibrationWindow::from_years(Periodicity::Monthly, start, len, 1991, 2020).unwrap();
    assert_eq!(window.len(), 360);
    assert_eq!(pos[window.start()], 1);
    assert_eq!(pos[window.end() - 1], 12);
}
