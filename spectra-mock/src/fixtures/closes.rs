use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spectra_core::{Company, DateRange, Observation, SeriesIndex, SeriesResponse};

/// Opening level of each fixture instrument.
const fn base_price(company: Company) -> f64 {
    match company {
        Company::Yndx => 2_500.0,
        Company::Sber => 250.0,
        Company::Gazp => 160.0,
        Company::Vtbr => 0.025,
        Company::Rosn => 550.0,
        Company::Lkoh => 6_500.0,
        Company::Gmkn => 160.0,
    }
}

/// Deterministic daily closes for a supported code over `range`.
///
/// One observation per weekday, inclusive of both ends. Values follow a
/// seeded random walk with upward drift, so repeated calls agree and any
/// window of a month or longer trends.
pub fn by_code(code: &str, range: DateRange) -> Option<SeriesResponse> {
    let company = Company::from_code(code)?;
    let mut walk = Walk::new(company, base_price(company));
    let observations = weekdays(range)
        .map(|date| Observation {
            date: SeriesIndex::Date(date),
            value: walk.step(),
        })
        .collect();
    Some(SeriesResponse {
        code: company.code().to_string(),
        observations,
    })
}

fn weekdays(range: DateRange) -> impl Iterator<Item = NaiveDate> {
    range
        .from
        .iter_days()
        .take_while(move |d| *d <= range.till)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
}

/// Multiplicative random walk seeded from the instrument code.
struct Walk {
    rng: StdRng,
    level: f64,
}

impl Walk {
    fn new(company: Company, level: f64) -> Self {
        let seed = company
            .code()
            .bytes()
            .fold(0x9E37_79B9_7F4A_7C15_u64, |acc, b| {
                acc.rotate_left(7) ^ u64::from(b)
            });
        Self {
            rng: StdRng::seed_from_u64(seed),
            level,
        }
    }

    fn step(&mut self) -> f64 {
        let shock = self.rng.random_range(-0.008..0.008);
        self.level *= 1.0 + 0.004 + shock;
        self.level
    }
}
