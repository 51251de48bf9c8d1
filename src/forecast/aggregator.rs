//! Reduction of 3-hour forecast samples into per-day summaries.
//!
//! Samples are bucketed by the date part of their `dt_txt`, in first-seen
//! order. Each bucket becomes one [`DaySummary`]. Hours are read from the
//! sample timestamp in UTC, the same clock `dt_txt` uses.

use chrono::{Datelike, NaiveDate, Timelike, Weekday};
use indexmap::IndexMap;

use super::models::{DayLabels, DaySummary, ForecastSample};
use crate::format::{capitalize_first, round_1, round_half_up};
use crate::icons::glyph_for;

/// Most days the weekend view returns
pub const WEEKEND_DAY_LIMIT: usize = 2;

/// Hour-of-day range, start inclusive, end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourWindow {
    pub start: u32,
    pub end: u32,
}

impl HourWindow {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start && hour < self.end
    }

    pub fn is_valid(&self) -> bool {
        self.start < self.end && self.end <= 24
    }
}

/// Which buckets survive into the result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySelection {
    /// The first `n` dates in bucket order
    First(usize),
    /// Saturdays and Sundays on or after the given date, ascending, at most
    /// [`WEEKEND_DAY_LIMIT`]
    WeekendFrom(NaiveDate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationPolicy {
    pub selection: DaySelection,
    /// Samples inside are "day", the rest "night"
    pub day_window: HourWindow,
    /// Samples inside may supply the representative icon
    pub midday_window: HourWindow,
}

/// Reduce `samples` into ordered daily summaries.
///
/// Pure: the same input always yields the same output, and empty input
/// yields an empty result.
pub fn aggregate(samples: &[ForecastSample], policy: &AggregationPolicy) -> Vec<DaySummary> {
    let buckets = bucket_by_date(samples);

    let selected: Vec<(&str, Vec<&ForecastSample>)> = match policy.selection {
        DaySelection::First(limit) => buckets.into_iter().take(limit).collect(),
        DaySelection::WeekendFrom(today) => {
            let mut weekend: Vec<_> = buckets
                .into_iter()
                .filter(|(_, bucket)| {
                    bucket
                        .first()
                        .is_some_and(|s| is_upcoming_weekend(s.date, today))
                })
                .collect();
            weekend.sort_by_key(|(_, bucket)| bucket.first().map(|s| s.date));
            weekend.truncate(WEEKEND_DAY_LIMIT);
            weekend
        }
    };

    selected
        .into_iter()
        .filter_map(|(date, bucket)| summarize_day(date, &bucket, policy))
        .collect()
}

fn bucket_by_date(samples: &[ForecastSample]) -> IndexMap<&str, Vec<&ForecastSample>> {
    let mut buckets: IndexMap<&str, Vec<&ForecastSample>> = IndexMap::new();
    for sample in samples {
        buckets.entry(sample.date_key()).or_default().push(sample);
    }
    buckets
}

fn is_upcoming_weekend(date: NaiveDate, today: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && date >= today
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// One distinct condition description within a bucket
#[derive(Debug, PartialEq)]
struct ConditionTally<'a> {
    description: &'a str,
    /// Icon of the first sample with this description
    icon: &'a str,
    count: usize,
}

/// Tallies in first-seen order
fn tally_conditions<'a>(bucket: &[&'a ForecastSample]) -> Vec<ConditionTally<'a>> {
    let mut tallies: Vec<ConditionTally<'a>> = Vec::new();
    for &sample in bucket {
        let description = sample.condition.description.as_str();
        match tallies.iter_mut().find(|t| t.description == description) {
            Some(tally) => tally.count += 1,
            None => tallies.push(ConditionTally {
                description,
                icon: &sample.condition.icon,
                count: 1,
            }),
        }
    }
    tallies
}

/// Highest count wins; on a tie the earlier tally keeps its place.
/// `None` only for an empty slice.
fn dominant<'a, 'b>(tallies: &'b [ConditionTally<'a>]) -> Option<&'b ConditionTally<'a>> {
    tallies.iter().fold(None, |best, tally| match best {
        Some(current) if current.count >= tally.count => Some(current),
        _ => Some(tally),
    })
}

/// Running choice of representative icon
#[derive(Debug, Clone, Copy)]
struct IconPick<'a> {
    icon: &'a str,
    from_midday: bool,
}

fn pick_icon<'a>(
    bucket: &[&'a ForecastSample],
    first: &'a ForecastSample,
    dominant: &ConditionTally<'a>,
    midday: HourWindow,
) -> &'a str {
    let seed = IconPick {
        icon: &first.condition.icon,
        from_midday: false,
    };

    let picked = bucket.iter().fold(seed, |acc, &sample| {
        if sample.condition.description == dominant.description
            && midday.contains(sample.observed_at.hour())
        {
            IconPick {
                icon: &sample.condition.icon,
                from_midday: true,
            }
        } else {
            acc
        }
    });

    if picked.from_midday {
        picked.icon
    } else {
        dominant.icon
    }
}

fn summarize_day(
    date: &str,
    bucket: &[&ForecastSample],
    policy: &AggregationPolicy,
) -> Option<DaySummary> {
    let first = *bucket.first()?;
    let count = bucket.len() as f64;

    let (day, night): (Vec<&ForecastSample>, Vec<&ForecastSample>) = bucket
        .iter()
        .copied()
        .partition(|s| policy.day_window.contains(s.observed_at.hour()));

    let temp_day = match mean(day.iter().map(|s| s.temp)) {
        Some(avg) => round_half_up(avg),
        None => round_half_up(
            bucket
                .iter()
                .map(|s| s.temp_max)
                .fold(f64::NEG_INFINITY, f64::max),
        ),
    };
    let temp_night = match mean(night.iter().map(|s| s.temp)) {
        Some(avg) => round_half_up(avg),
        None => round_half_up(bucket.iter().map(|s| s.temp_min).fold(f64::INFINITY, f64::min)),
    };

    let humidity = round_half_up(bucket.iter().map(|s| s.humidity).sum::<f64>() / count);
    let wind_speed = round_1(bucket.iter().map(|s| s.wind_speed).sum::<f64>() / count);
    let precipitation_probability =
        round_half_up(bucket.iter().map(|s| s.pop).sum::<f64>() / count * 100.0);

    // Non-empty bucket, so at least one tally
    let tallies = tally_conditions(bucket);
    let dominant = dominant(&tallies)?;
    let conditions = dominant.description;
    let icon_code = pick_icon(bucket, first, dominant, policy.midday_window);

    Some(DaySummary {
        date: date.to_string(),
        temp_day,
        temp_night,
        humidity,
        wind_speed,
        conditions: capitalize_first(conditions),
        icon: glyph_for(icon_code).to_string(),
        icon_code: icon_code.to_string(),
        precipitation_probability,
        labels: DayLabels::new(
            temp_day,
            temp_night,
            humidity,
            wind_speed,
            precipitation_probability,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::models::Condition;
    use chrono::NaiveDateTime;

    fn sample(dt_txt: &str, temp: f64, description: &str, icon: &str) -> ForecastSample {
        let observed = NaiveDateTime::parse_from_str(dt_txt, "%Y-%m-%d %H:%M:%S")
            .expect("valid test timestamp");
        ForecastSample {
            observed_at: observed.and_utc(),
            dt_txt: dt_txt.to_string(),
            date: observed.date(),
            temp,
            temp_min: temp - 1.0,
            temp_max: temp + 1.0,
            humidity: 70.0,
            wind_speed: 3.0,
            pop: 0.0,
            condition: Condition {
                description: description.to_string(),
                icon: icon.to_string(),
            },
        }
    }

    fn clear(dt_txt: &str, temp: f64) -> ForecastSample {
        sample(dt_txt, temp, "ясно", "01d")
    }

    fn policy(selection: DaySelection) -> AggregationPolicy {
        AggregationPolicy {
            selection,
            day_window: HourWindow::new(6, 18),
            midday_window: HourWindow::new(12, 15),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
    }

    /// Eight 3-hour samples per day for each date
    fn full_days(dates: &[&str]) -> Vec<ForecastSample> {
        dates
            .iter()
            .flat_map(|d| {
                (0..8).map(move |i| clear(&format!("{d} {:02}:00:00", i * 3), 10.0 + i as f64))
            })
            .collect()
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        assert!(aggregate(&[], &policy(DaySelection::First(5))).is_empty());
        let weekend = policy(DaySelection::WeekendFrom(date("2024-10-24")));
        assert!(aggregate(&[], &weekend).is_empty());
    }

    #[test]
    fn test_one_summary_per_distinct_date() {
        let samples = full_days(&["2024-10-24", "2024-10-25", "2024-10-26"]);
        let days = aggregate(&samples, &policy(DaySelection::First(5)));
        let dates: Vec<_> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, ["2024-10-24", "2024-10-25", "2024-10-26"]);
    }

    #[test]
    fn test_max_days_caps_result() {
        let samples = full_days(&["2024-10-24", "2024-10-25", "2024-10-26", "2024-10-27"]);
        let days = aggregate(&samples, &policy(DaySelection::First(2)));
        let dates: Vec<_> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, ["2024-10-24", "2024-10-25"]);
    }

    #[test]
    fn test_never_pads_beyond_source_dates() {
        let samples = full_days(&["2024-10-24", "2024-10-25"]);
        assert_eq!(aggregate(&samples, &policy(DaySelection::First(7))).len(), 2);
    }

    #[test]
    fn test_partial_first_day_is_its_own_bucket() {
        let samples = vec![
            clear("2024-10-24 18:00:00", 8.0),
            clear("2024-10-24 21:00:00", 6.0),
            clear("2024-10-25 00:00:00", 5.0),
        ];
        let days = aggregate(&samples, &policy(DaySelection::First(5)));
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2024-10-24");
        assert_eq!(days[1].date, "2024-10-25");
    }

    #[test]
    fn test_day_temperature_is_mean_of_day_samples() {
        let samples = vec![
            clear("2024-10-24 00:00:00", 5.0),
            clear("2024-10-24 09:00:00", 20.0),
            clear("2024-10-24 12:00:00", 22.0),
            clear("2024-10-24 15:00:00", 24.0),
            clear("2024-10-24 21:00:00", 9.0),
        ];
        let days = aggregate(&samples, &policy(DaySelection::First(5)));
        assert_eq!(days[0].temp_day, 22);
        assert_eq!(days[0].temp_night, 7);
    }

    #[test]
    fn test_day_temperature_falls_back_to_max_of_temp_max() {
        let mut samples = vec![
            clear("2024-10-24 18:00:00", 4.0),
            clear("2024-10-24 21:00:00", 3.0),
        ];
        samples[0].temp_max = 7.4;
        samples[1].temp_max = 6.0;
        let days = aggregate(&samples, &policy(DaySelection::First(5)));
        assert_eq!(days[0].temp_day, 7);
        assert_eq!(days[0].temp_night, 4);
    }

    #[test]
    fn test_night_temperature_falls_back_to_min_of_temp_min() {
        let mut samples = vec![
            clear("2024-10-24 09:00:00", 10.0),
            clear("2024-10-24 12:00:00", 12.0),
        ];
        samples[0].temp_min = 1.6;
        samples[1].temp_min = 3.0;
        let days = aggregate(&samples, &policy(DaySelection::First(5)));
        assert_eq!(days[0].temp_day, 11);
        assert_eq!(days[0].temp_night, 2);
    }

    #[test]
    fn test_negative_halves_round_up() {
        let samples = vec![
            clear("2024-01-10 09:00:00", -3.0),
            clear("2024-01-10 12:00:00", -2.0),
        ];
        let days = aggregate(&samples, &policy(DaySelection::First(5)));
        assert_eq!(days[0].temp_day, -2);
    }

    #[test]
    fn test_precipitation_is_scaled_mean() {
        let mut samples = vec![
            clear("2024-10-24 09:00:00", 10.0),
            clear("2024-10-24 12:00:00", 10.0),
            clear("2024-10-24 15:00:00", 10.0),
        ];
        samples[0].pop = 0.1;
        samples[1].pop = 0.3;
        samples[2].pop = 0.2;
        let days = aggregate(&samples, &policy(DaySelection::First(5)));
        assert_eq!(days[0].precipitation_probability, 20);
        assert_eq!(days[0].labels.precipitation_probability, "20%");
    }

    #[test]
    fn test_humidity_and_wind_means() {
        let mut samples = vec![
            clear("2024-10-24 09:00:00", 10.0),
            clear("2024-10-24 12:00:00", 10.0),
            clear("2024-10-24 15:00:00", 10.0),
        ];
        for (s, (humidity, wind)) in samples.iter_mut().zip([(80.0, 3.0), (85.0, 4.0), (91.0, 4.0)]) {
            s.humidity = humidity;
            s.wind_speed = wind;
        }
        let days = aggregate(&samples, &policy(DaySelection::First(5)));
        assert_eq!(days[0].humidity, 85);
        assert_eq!(days[0].wind_speed, 3.7);
        assert_eq!(days[0].labels.wind_speed, "3.7 м/с");
    }

    #[test]
    fn test_dominant_condition_tie_goes_to_first_seen() {
        let samples = vec![
            sample("2024-10-24 00:00:00", 5.0, "пасмурно", "04n"),
            sample("2024-10-24 03:00:00", 5.0, "небольшой дождь", "10n"),
            sample("2024-10-24 06:00:00", 5.0, "небольшой дождь", "10d"),
            sample("2024-10-24 09:00:00", 5.0, "пасмурно", "04d"),
        ];
        let days = aggregate(&samples, &policy(DaySelection::First(5)));
        assert_eq!(days[0].conditions, "Пасмурно");

        let mut reordered = samples.clone();
        reordered.swap(0, 1);
        let days = aggregate(&reordered, &policy(DaySelection::First(5)));
        assert_eq!(days[0].conditions, "Небольшой дождь");
    }

    #[test]
    fn test_dominant_condition_by_count() {
        let samples = vec![
            sample("2024-10-24 00:00:00", 5.0, "ясно", "01n"),
            sample("2024-10-24 03:00:00", 5.0, "снег", "13n"),
            sample("2024-10-24 06:00:00", 5.0, "снег", "13d"),
        ];
        let days = aggregate(&samples, &policy(DaySelection::First(5)));
        assert_eq!(days[0].conditions, "Снег");
    }

    #[test]
    fn test_dominant_of_tallies() {
        assert_eq!(dominant(&[]), None);

        let samples = vec![
            sample("2024-10-24 00:00:00", 5.0, "ясно", "01n"),
            sample("2024-10-24 03:00:00", 5.0, "туман", "50n"),
        ];
        let bucket: Vec<&ForecastSample> = samples.iter().collect();
        let tallies = tally_conditions(&bucket);
        let best = dominant(&tallies).expect("non-empty tallies");
        assert_eq!(best.description, "ясно");
        assert_eq!(best.icon, "01n");
    }

    #[test]
    fn test_icon_prefers_midday_sample_of_dominant_condition() {
        let samples = vec![
            sample("2024-10-24 06:00:00", 5.0, "облачно", "04n"),
            sample("2024-10-24 09:00:00", 5.0, "облачно", "03d"),
            sample("2024-10-24 12:00:00", 5.0, "облачно", "02d"),
            sample("2024-10-24 15:00:00", 5.0, "ясно", "01d"),
        ];
        let days = aggregate(&samples, &policy(DaySelection::First(5)));
        assert_eq!(days[0].icon_code, "02d");
        assert_eq!(days[0].icon, "⛅");
    }

    #[test]
    fn test_icon_ignores_midday_sample_of_other_condition() {
        let samples = vec![
            sample("2024-10-24 03:00:00", 5.0, "облачно", "04n"),
            sample("2024-10-24 06:00:00", 5.0, "облачно", "03d"),
            sample("2024-10-24 12:00:00", 5.0, "ясно", "01d"),
        ];
        let days = aggregate(&samples, &policy(DaySelection::First(5)));
        assert_eq!(days[0].conditions, "Облачно");
        assert_eq!(days[0].icon_code, "04n");
    }

    #[test]
    fn test_icon_falls_back_to_dominant_first_icon() {
        let samples = vec![
            sample("2024-10-24 18:00:00", 5.0, "дождь", "10d"),
            sample("2024-10-24 21:00:00", 5.0, "дождь", "10n"),
        ];
        let days = aggregate(&samples, &policy(DaySelection::First(5)));
        assert_eq!(days[0].icon_code, "10d");
        assert_eq!(days[0].icon, "🌦️");
    }

    #[test]
    fn test_unknown_icon_code_uses_fallback_glyph() {
        let samples = vec![sample("2024-10-24 12:00:00", 5.0, "пыль", "07d")];
        let days = aggregate(&samples, &policy(DaySelection::First(5)));
        assert_eq!(days[0].icon, crate::icons::FALLBACK_GLYPH);
    }

    #[test]
    fn test_weekend_keeps_saturday_and_sunday() {
        // Thursday through Monday
        let samples = full_days(&[
            "2024-10-24",
            "2024-10-25",
            "2024-10-26",
            "2024-10-27",
            "2024-10-28",
        ]);
        let days = aggregate(
            &samples,
            &policy(DaySelection::WeekendFrom(date("2024-10-24"))),
        );
        let dates: Vec<_> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, ["2024-10-26", "2024-10-27"]);
    }

    #[test]
    fn test_weekend_caps_at_two_days() {
        let samples = full_days(&[
            "2024-10-26",
            "2024-10-27",
            "2024-10-28",
            "2024-11-02",
            "2024-11-03",
        ]);
        let days = aggregate(
            &samples,
            &policy(DaySelection::WeekendFrom(date("2024-10-24"))),
        );
        let dates: Vec<_> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, ["2024-10-26", "2024-10-27"]);
    }

    #[test]
    fn test_weekend_skips_days_before_today() {
        let samples = full_days(&["2024-10-26", "2024-10-27", "2024-10-28"]);
        let days = aggregate(
            &samples,
            &policy(DaySelection::WeekendFrom(date("2024-10-27"))),
        );
        let dates: Vec<_> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, ["2024-10-27"]);
    }

    #[test]
    fn test_weekend_sorts_ascending() {
        let samples = full_days(&["2024-11-03", "2024-10-28", "2024-11-02"]);
        let days = aggregate(
            &samples,
            &policy(DaySelection::WeekendFrom(date("2024-10-24"))),
        );
        let dates: Vec<_> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, ["2024-11-02", "2024-11-03"]);
    }

    #[test]
    fn test_weekend_without_weekend_dates_is_empty() {
        let samples = full_days(&["2024-10-28", "2024-10-29", "2024-10-30"]);
        let days = aggregate(
            &samples,
            &policy(DaySelection::WeekendFrom(date("2024-10-28"))),
        );
        assert!(days.is_empty());
    }

    #[test]
    fn test_aggregate_is_repeatable() {
        let samples = full_days(&["2024-10-24", "2024-10-25", "2024-10-26"]);
        let p = policy(DaySelection::First(5));
        let first = aggregate(&samples, &p);
        let second = aggregate(&samples, &p);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).expect("serializable"),
            serde_json::to_string(&second).expect("serializable")
        );
    }

    #[test]
    fn test_hour_window() {
        let window = HourWindow::new(6, 18);
        assert!(!window.contains(5));
        assert!(window.contains(6));
        assert!(window.contains(17));
        assert!(!window.contains(18));
        assert!(window.is_valid());
        assert!(!HourWindow::new(18, 6).is_valid());
        assert!(!HourWindow::new(6, 6).is_valid());
        assert!(!HourWindow::new(20, 25).is_valid());
    }
}
