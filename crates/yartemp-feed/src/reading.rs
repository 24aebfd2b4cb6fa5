//! Parsing and validation of observation lines.
//!
//! The feed publishes one semicolon-delimited line of twelve fields. Eight
//! of them carry published quantities; the other four (feed-side timestamps
//! and a reserved field) are never converted. Conversion of all published
//! fields runs before any range rule, so a malformed field is always
//! reported ahead of an implausible one.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::types::{Pressure, Temperature};

/// Number of fields in an observation line.
const FIELD_COUNT: usize = 12;
const DELIMITER: char = ';';

// Published field positions. Positions 1, 4 and 6 are feed-side timestamps
// and 10 is reserved; junk there is accepted.
const IDX_TEMPERATURE: usize = 0;
const IDX_TEMPERATURE_CHANGE: usize = 2;
const IDX_DAY_MAX: usize = 3;
const IDX_DAY_MIN: usize = 5;
const IDX_DAY_LAST_YEAR: usize = 7;
const IDX_DAY_AVERAGE: usize = 8;
const IDX_PRESSURE: usize = 9;
const IDX_PRESSURE_CHANGE: usize = 11;

// Plausibility bounds, both ends exclusive.
const TEMPERATURE_MIN: f64 = -100.0;
const TEMPERATURE_MAX: f64 = 100.0;
const PRESSURE_MIN: f64 = 0.0;
const PRESSURE_MAX: f64 = 1000.0;
const PRESSURE_CHANGE_MIN: f64 = -1000.0;
const PRESSURE_CHANGE_MAX: f64 = 1000.0;

/// One validated observation from the feed.
///
/// Day minimum, day maximum and last-year temperatures are trusted from the
/// feed and bypass the range rules; the other five quantities are checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temperature: Temperature,
    pub temperature_change: Temperature,
    pub temperature_day_min: Temperature,
    pub temperature_day_max: Temperature,
    pub temperature_day_average: Temperature,
    pub temperature_day_last_year: Temperature,
    pub pressure: Pressure,
    pub pressure_change: Pressure,
}

impl Reading {
    /// Parse and validate one observation line.
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        // The live feed terminates the line with a newline; fields
        // themselves are taken verbatim.
        let fields: Vec<&str> = raw.trim().split(DELIMITER).collect();
        if fields.len() != FIELD_COUNT {
            return Err(ModelError::UnexpectedDataSize {
                found: fields.len(),
                needed: FIELD_COUNT,
            });
        }

        let temperature = convert(fields[IDX_TEMPERATURE], ModelError::UndefinedTemperature)?;
        let temperature_change = convert(
            fields[IDX_TEMPERATURE_CHANGE],
            ModelError::UndefinedTemperatureChange,
        )?;
        let day_max = convert(fields[IDX_DAY_MAX], ModelError::UndefinedTemperatureDayMax)?;
        let day_min = convert(fields[IDX_DAY_MIN], ModelError::UndefinedTemperatureDayMin)?;
        let day_last_year = convert(
            fields[IDX_DAY_LAST_YEAR],
            ModelError::UndefinedTemperatureDayLastYear,
        )?;
        let day_average = convert(
            fields[IDX_DAY_AVERAGE],
            ModelError::UndefinedTemperatureDayAverage,
        )?;
        let pressure = convert(fields[IDX_PRESSURE], ModelError::UndefinedPressure)?;
        let pressure_change = convert(
            fields[IDX_PRESSURE_CHANGE],
            ModelError::UndefinedPressureChange,
        )?;

        check_range(
            temperature,
            TEMPERATURE_MIN,
            TEMPERATURE_MAX,
            RangeField::Temperature,
        )?;
        check_range(
            temperature_change,
            TEMPERATURE_MIN,
            TEMPERATURE_MAX,
            RangeField::TemperatureChange,
        )?;
        check_range(
            day_average,
            TEMPERATURE_MIN,
            TEMPERATURE_MAX,
            RangeField::TemperatureDayAverage,
        )?;
        check_range(pressure, PRESSURE_MIN, PRESSURE_MAX, RangeField::Pressure)?;
        check_range(
            pressure_change,
            PRESSURE_CHANGE_MIN,
            PRESSURE_CHANGE_MAX,
            RangeField::PressureChange,
        )?;

        Ok(Self {
            temperature: Temperature::celsius(temperature),
            temperature_change: Temperature::celsius(temperature_change),
            temperature_day_min: Temperature::celsius(day_min),
            temperature_day_max: Temperature::celsius(day_max),
            temperature_day_average: Temperature::celsius(day_average),
            temperature_day_last_year: Temperature::celsius(day_last_year),
            pressure: Pressure::mmhg(pressure),
            pressure_change: Pressure::mmhg(pressure_change),
        })
    }
}

fn convert(field: &str, err: ModelError) -> Result<f64, ModelError> {
    field.parse::<f64>().map_err(|_| err)
}

/// Quantities subject to range rules, in checking order.
#[derive(Debug, Clone, Copy)]
enum RangeField {
    Temperature,
    TemperatureChange,
    TemperatureDayAverage,
    Pressure,
    PressureChange,
}

impl RangeField {
    fn too_high(self, value: f64, max: f64) -> ModelError {
        match self {
            RangeField::Temperature => ModelError::TemperatureTooHigh { value, max },
            RangeField::TemperatureChange => ModelError::TemperatureChangeTooHigh { value, max },
            RangeField::TemperatureDayAverage => {
                ModelError::TemperatureDayAverageTooHigh { value, max }
            }
            RangeField::Pressure => ModelError::PressureTooHigh { value, max },
            RangeField::PressureChange => ModelError::PressureChangeTooHigh { value, max },
        }
    }

    fn too_low(self, value: f64, min: f64) -> ModelError {
        match self {
            RangeField::Temperature => ModelError::TemperatureTooLow { value, min },
            RangeField::TemperatureChange => ModelError::TemperatureChangeTooLow { value, min },
            RangeField::TemperatureDayAverage => {
                ModelError::TemperatureDayAverageTooLow { value, min }
            }
            RangeField::Pressure => ModelError::PressureTooLow { value, min },
            RangeField::PressureChange => ModelError::PressureChangeTooLow { value, min },
        }
    }
}

/// Both bounds are exclusive: a value equal to a bound reports that bound.
/// NaN fails the upper check so it can never slip through.
fn check_range(value: f64, min: f64, max: f64, field: RangeField) -> Result<(), ModelError> {
    if value.is_nan() || value >= max {
        return Err(field.too_high(value, max));
    }
    if value <= min {
        return Err(field.too_low(value, min));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    const VALID_LINE: &str =
        "3.833;1666900230;0.212;6.646;1666869475;1.332;1666841275;6.0732;3.284;758.6;-1.0;-0.2";

    /// Valid line with one field replaced.
    fn with_field(idx: usize, value: &str) -> String {
        let mut fields: Vec<&str> = VALID_LINE.split(';').collect();
        fields[idx] = value;
        fields.join(";")
    }

    #[test]
    fn valid_line_parses() {
        let reading = Reading::parse(VALID_LINE).unwrap();
        assert_eq!(reading.temperature.value(), 3.833);
        assert_eq!(reading.temperature_change.value(), 0.212);
        assert_eq!(reading.temperature_day_min.value(), 1.332);
        assert_eq!(reading.temperature_day_max.value(), 6.646);
        assert_eq!(reading.temperature_day_average.value(), 3.284);
        assert_eq!(reading.temperature_day_last_year.value(), 6.0732);
        assert_eq!(reading.pressure.value(), 758.6);
        assert_eq!(reading.pressure_change.value(), -0.2);
    }

    #[test]
    fn trailing_newline_is_trimmed() {
        let line = format!("{}\n", VALID_LINE);
        assert!(Reading::parse(&line).is_ok());
    }

    #[test]
    fn eight_fields_are_rejected() {
        let short = VALID_LINE.split(';').take(8).collect::<Vec<_>>().join(";");
        assert_eq!(
            Reading::parse(&short),
            Err(ModelError::UnexpectedDataSize { found: 8, needed: 12 })
        );
    }

    #[test]
    fn thirteen_fields_are_rejected() {
        let long = format!("{};1.0", VALID_LINE);
        assert_eq!(
            Reading::parse(&long),
            Err(ModelError::UnexpectedDataSize { found: 13, needed: 12 })
        );
    }

    #[test]
    fn empty_input_counts_as_one_field() {
        assert_eq!(
            Reading::parse(""),
            Err(ModelError::UnexpectedDataSize { found: 1, needed: 12 })
        );
    }

    #[test]
    fn non_numeric_published_fields_are_undefined() {
        let cases = [
            (IDX_TEMPERATURE, ModelError::UndefinedTemperature),
            (IDX_TEMPERATURE_CHANGE, ModelError::UndefinedTemperatureChange),
            (IDX_DAY_MAX, ModelError::UndefinedTemperatureDayMax),
            (IDX_DAY_MIN, ModelError::UndefinedTemperatureDayMin),
            (IDX_DAY_LAST_YEAR, ModelError::UndefinedTemperatureDayLastYear),
            (IDX_DAY_AVERAGE, ModelError::UndefinedTemperatureDayAverage),
            (IDX_PRESSURE, ModelError::UndefinedPressure),
            (IDX_PRESSURE_CHANGE, ModelError::UndefinedPressureChange),
        ];
        for (idx, expected) in cases {
            assert_eq!(Reading::parse(&with_field(idx, "abcd")), Err(expected));
        }
    }

    #[test]
    fn malformed_change_wins_over_other_valid_fields() {
        let line =
            "3.833;1666900230;abcd;6.646;1666869475;1.332;1666841275;6.0732;3.28471111111111;758.6;-1.0;0.0";
        assert_eq!(
            Reading::parse(line),
            Err(ModelError::UndefinedTemperatureChange)
        );
    }

    #[test]
    fn junk_in_unpublished_fields_is_accepted() {
        for idx in [1, 4, 6, 10] {
            assert!(
                Reading::parse(&with_field(idx, "abcd")).is_ok(),
                "field {} should not be converted",
                idx
            );
        }
    }

    #[test]
    fn temperature_bounds_are_exclusive() {
        assert_eq!(
            Reading::parse(&with_field(IDX_TEMPERATURE, "100")),
            Err(ModelError::TemperatureTooHigh { value: 100.0, max: 100.0 })
        );
        assert_eq!(
            Reading::parse(&with_field(IDX_TEMPERATURE, "-100")),
            Err(ModelError::TemperatureTooLow { value: -100.0, min: -100.0 })
        );
    }

    #[test]
    fn temperature_change_bounds_are_exclusive() {
        assert_eq!(
            Reading::parse(&with_field(IDX_TEMPERATURE_CHANGE, "100")),
            Err(ModelError::TemperatureChangeTooHigh { value: 100.0, max: 100.0 })
        );
        assert_eq!(
            Reading::parse(&with_field(IDX_TEMPERATURE_CHANGE, "-100")),
            Err(ModelError::TemperatureChangeTooLow { value: -100.0, min: -100.0 })
        );
    }

    #[test]
    fn day_average_bounds_are_exclusive() {
        assert_eq!(
            Reading::parse(&with_field(IDX_DAY_AVERAGE, "100")),
            Err(ModelError::TemperatureDayAverageTooHigh { value: 100.0, max: 100.0 })
        );
        assert_eq!(
            Reading::parse(&with_field(IDX_DAY_AVERAGE, "-100")),
            Err(ModelError::TemperatureDayAverageTooLow { value: -100.0, min: -100.0 })
        );
    }

    #[test]
    fn pressure_bounds_are_exclusive() {
        assert_eq!(
            Reading::parse(&with_field(IDX_PRESSURE, "1000")),
            Err(ModelError::PressureTooHigh { value: 1000.0, max: 1000.0 })
        );
        assert_eq!(
            Reading::parse(&with_field(IDX_PRESSURE, "0")),
            Err(ModelError::PressureTooLow { value: 0.0, min: 0.0 })
        );
    }

    #[test]
    fn pressure_change_bounds_are_exclusive() {
        assert_eq!(
            Reading::parse(&with_field(IDX_PRESSURE_CHANGE, "1000")),
            Err(ModelError::PressureChangeTooHigh { value: 1000.0, max: 1000.0 })
        );
        assert_eq!(
            Reading::parse(&with_field(IDX_PRESSURE_CHANGE, "-1000")),
            Err(ModelError::PressureChangeTooLow { value: -1000.0, min: -1000.0 })
        );
    }

    #[test]
    fn values_just_inside_bounds_pass() {
        assert!(Reading::parse(&with_field(IDX_TEMPERATURE, "99.9")).is_ok());
        assert!(Reading::parse(&with_field(IDX_TEMPERATURE, "-99.9")).is_ok());
        assert!(Reading::parse(&with_field(IDX_PRESSURE, "999.9")).is_ok());
        assert!(Reading::parse(&with_field(IDX_PRESSURE, "0.1")).is_ok());
        assert!(Reading::parse(&with_field(IDX_PRESSURE_CHANGE, "999.9")).is_ok());
        assert!(Reading::parse(&with_field(IDX_PRESSURE_CHANGE, "-999.9")).is_ok());
    }

    #[test]
    fn conversion_failures_win_over_range_failures() {
        // Temperature is out of range, but the malformed pressure field is
        // reported first even though pressure is checked later.
        let mut fields: Vec<&str> = VALID_LINE.split(';').collect();
        fields[IDX_TEMPERATURE] = "100";
        fields[IDX_PRESSURE] = "abcd";
        assert_eq!(
            Reading::parse(&fields.join(";")),
            Err(ModelError::UndefinedPressure)
        );
    }

    #[test]
    fn range_checks_run_in_fixed_order() {
        let mut fields: Vec<&str> = VALID_LINE.split(';').collect();
        fields[IDX_TEMPERATURE] = "100";
        fields[IDX_PRESSURE] = "1000";
        assert_eq!(
            Reading::parse(&fields.join(";")),
            Err(ModelError::TemperatureTooHigh { value: 100.0, max: 100.0 })
        );

        let mut fields: Vec<&str> = VALID_LINE.split(';').collect();
        fields[IDX_PRESSURE] = "1000";
        fields[IDX_PRESSURE_CHANGE] = "1000";
        assert_eq!(
            Reading::parse(&fields.join(";")),
            Err(ModelError::PressureTooHigh { value: 1000.0, max: 1000.0 })
        );
    }

    #[test]
    fn day_extremes_are_not_range_checked() {
        // Day min/max and last-year values are trusted from the feed.
        let mut fields: Vec<&str> = VALID_LINE.split(';').collect();
        fields[IDX_DAY_MAX] = "250.0";
        fields[IDX_DAY_MIN] = "-250.0";
        fields[IDX_DAY_LAST_YEAR] = "9999.0";
        let reading = Reading::parse(&fields.join(";")).unwrap();
        assert_eq!(reading.temperature_day_max.value(), 250.0);
        assert_eq!(reading.temperature_day_min.value(), -250.0);
        assert_eq!(reading.temperature_day_last_year.value(), 9999.0);
    }

    #[test]
    fn nan_fails_the_upper_bound() {
        let err = Reading::parse(&with_field(IDX_TEMPERATURE, "NaN")).unwrap_err();
        match err {
            ModelError::TemperatureTooHigh { value, max } => {
                assert!(value.is_nan());
                assert_eq!(max, 100.0);
            }
            other => panic!("expected TemperatureTooHigh, got {:?}", other),
        }
    }

    #[test]
    fn infinity_fails_the_bounds() {
        assert_eq!(
            Reading::parse(&with_field(IDX_PRESSURE, "inf")),
            Err(ModelError::PressureTooHigh { value: f64::INFINITY, max: 1000.0 })
        );
        assert_eq!(
            Reading::parse(&with_field(IDX_TEMPERATURE, "-inf")),
            Err(ModelError::TemperatureTooLow { value: f64::NEG_INFINITY, min: -100.0 })
        );
    }
}
