use approx::assert_relative_eq;
use drought_calendar::Periodicity;
use drought_pet::{PetError, hargreaves, thornthwaite};

/// Mid-latitude seasonal temperature cycle (°C) repeated for `n_years`.
fn seasonal_temps(n_years: usize) -> (Vec<f64>, Vec<u16>) {
    let cycle = [
        -1.0, 1.0, 5.5, 11.0, 16.5, 21.0, 24.0, 23.0, 18.5, 12.0, 5.5, 0.5,
    ];
    let mut temps = Vec::with_capacity(n_years * 12);
    let mut months = Vec::with_capacity(n_years * 12);
    for _ in 0..n_years {
        for (i, &t) in cycle.iter().enumerate() {
            temps.push(t);
            months.push((i + 1) as u16);
        }
    }
    (temps, months)
}

#[test]
fn thornthwaite_annual_total_is_plausible() {
    let (temps, months) = seasonal_temps(3);
    let pet = thornthwaite(&temps, &months, 40.0).unwrap();
    let annual: f64 = pet[..12].iter().sum();
    // Temperate continental climates sit roughly in 550–850 mm/year.
    assert!((550.0..850.0).contains(&annual), "annual PET {annual}");
    // Identical years give identical PET.
    for i in 0..12 {
        assert_relative_eq!(pet[i], pet[i + 12], epsilon = 1e-12);
    }
}

#[test]
fn thornthwaite_hemispheres_mirror_daylight() {
    let temps = vec![15.0; 12];
    let months: Vec<u16> = (1..=12).collect();
    let north = thornthwaite(&temps, &months, 45.0).unwrap();
    let south = thornthwaite(&temps, &months, -45.0).unwrap();
    // Same temperature, longer June days in the north.
    assert!(north[5] > south[5]);
    assert!(north[11] < south[11]);
}

#[test]
fn hargreaves_daily_series_is_non_negative() {
    let n = 366;
    let positions: Vec<u16> = (1..=n as u16).collect();
    let tmin: Vec<f64> = positions
        .iter()
        .map(|&d| 5.0 + 10.0 * ((d as f64 - 100.0) / 366.0 * std::f64::consts::TAU).sin())
        .collect();
    let tmax: Vec<f64> = tmin.iter().map(|t| t + 12.0).collect();
    let pet = hargreaves(&tmin, &tmax, None, &positions, Periodicity::Daily, 30.0).unwrap();
    assert_eq!(pet.len(), n);
    assert!(pet.iter().all(|p| p.is_finite() && *p >= 0.0));
}

#[test]
fn invalid_latitude_is_rejected_by_both() {
    let (temps, months) = seasonal_temps(1);
    assert!(matches!(
        thornthwaite(&temps, &months, -91.0),
        Err(PetError::InvalidLatitude { .. })
    ));
    assert!(matches!(
        hargreaves(&temps, &temps, None, &months, Periodicity::Monthly, f64::INFINITY),
        Err(PetError::InvalidLatitude { .. })
    ));
}
