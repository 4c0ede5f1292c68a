use spectra_types::{MergedRow, MergedSeries, SeriesResponse};

/// Align two series positionally into a single ordered collection of rows.
///
/// - Row `i` pairs `a.observations[i]` with `b.observations[i]`.
/// - The row count is `min(a.len(), b.len())`; the tail of the longer series
///   is dropped silently.
/// - Each row carries `a`'s date (or index). Cadences are not validated: two
///   series sampled differently end up misaligned.
#[must_use]
pub fn merge_series(a: &SeriesResponse, b: &SeriesResponse) -> MergedSeries {
    let rows = a
        .observations
        .iter()
        .zip(b.observations.iter())
        .map(|(x, y)| MergedRow {
            date: x.date,
            first: x.value,
            second: y.value,
        })
        .collect();

    MergedSeries {
        first_code: a.code.clone(),
        second_code: b.code.clone(),
        rows,
    }
}
