use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::Job;

/// Fechas (ordenadas, sin duplicados) que tienen al menos un job en borrador
pub fn unique_sorted_dates<'a, I>(jobs: I) -> Vec<NaiveDate>
where
    I: IntoIterator<Item = &'a Job>,
{
    jobs.into_iter()
        .filter(|job| job.is_draft())
        .filter_map(Job::scheduled_day)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Fecha con menor diferencia absoluta en días respecto a `today`.
/// En caso de empate gana la primera en el orden recibido.
pub fn find_closest_date_to_today(dates: &[NaiveDate], today: NaiveDate) -> Option<NaiveDate> {
    let mut best: Option<(NaiveDate, i64)> = None;
    for &date in dates {
        let diff = (date - today).num_days().abs();
        match best {
            Some((_, best_diff)) if diff >= best_diff => {}
            _ => best = Some((date, diff)),
        }
    }
    best.map(|(date, _)| date)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(super::constants::DATE_FORMAT).to_string()
}
