//! Structured date, time and date-time values.
//!
//! Decoders hand these over already parsed from the DICOM DA, TM and DT
//! value representations. The `from_dicom` constructors cover the common
//! encodings for decoders that only have the raw text:
//!
//! - DA: `YYYYMMDD`, or the legacy `YYYY.MM.DD`
//! - TM: `HH`, `HHMM`, `HHMMSS`, `HHMMSS.F` up to six fraction digits
//!   (colon-separated legacy form accepted)
//! - DT: `YYYY[MM[DD[HH[MM[SS[.F]]]]]][&ZZXX]`

use std::fmt;

use chrono::{Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};

use crate::error::{ModelError, Result};

/// Calendar date without a time-of-day component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructuredDate(NaiveDate);

impl StructuredDate {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(ModelError::InvalidDate { year, month, day })
    }

    /// Parse a DA value.
    pub fn from_dicom(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if !trimmed.is_ascii() {
            return Err(ModelError::invalid_temporal("DA", input));
        }
        let digits: String = match trimmed.len() {
            8 => trimmed.to_string(),
            10 if trimmed.as_bytes()[4] == b'.' && trimmed.as_bytes()[7] == b'.' => {
                trimmed.replace('.', "")
            }
            _ => return Err(ModelError::invalid_temporal("DA", input)),
        };
        let year = parse_digits(&digits[0..4], "DA", input)?;
        let month = parse_digits(&digits[4..6], "DA", input)?;
        let day = parse_digits(&digits[6..8], "DA", input)?;
        Self::new(year as i32, month, day)
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    #[must_use]
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for StructuredDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for StructuredDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Time of day with microsecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructuredTime(NaiveTime);

impl StructuredTime {
    pub fn new(hour: u32, minute: u32, second: u32, microsecond: u32) -> Result<Self> {
        let invalid = || ModelError::InvalidTime {
            hour,
            minute,
            second,
            microsecond,
        };
        if microsecond > 999_999 {
            return Err(invalid());
        }
        NaiveTime::from_hms_micro_opt(hour, minute, second, microsecond)
            .map(Self)
            .ok_or_else(invalid)
    }

    /// Parse a TM value.
    pub fn from_dicom(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if !trimmed.is_ascii() {
            return Err(ModelError::invalid_temporal("TM", input));
        }
        parse_time(trimmed, "TM", input)
    }

    #[must_use]
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    #[must_use]
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    #[must_use]
    pub fn second(&self) -> u32 {
        self.0.second()
    }

    #[must_use]
    pub fn microsecond(&self) -> u32 {
        self.0.nanosecond() / 1_000
    }

    #[must_use]
    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl From<NaiveTime> for StructuredTime {
    /// Leap-second representations are folded into the last regular second.
    fn from(time: NaiveTime) -> Self {
        let time = if time.nanosecond() >= 1_000_000_000 {
            time.with_nanosecond(999_999_000).unwrap_or(time)
        } else {
            time
        };
        Self(time)
    }
}

impl fmt::Display for StructuredTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S%.6f"))
    }
}

/// Date with a time of day and an optional UTC offset.
///
/// Keeps the original DT text when it came from one, so the normalized form
/// can reproduce what the source file actually said.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructuredDateTime {
    value: NaiveDateTime,
    offset: Option<FixedOffset>,
    original: Option<String>,
}

impl StructuredDateTime {
    #[must_use]
    pub fn new(value: NaiveDateTime) -> Self {
        Self {
            value,
            offset: None,
            original: None,
        }
    }

    #[must_use]
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Parse a DT value, keeping the source text.
    pub fn from_dicom(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = || ModelError::invalid_temporal("DT", input);
        if !trimmed.is_ascii() {
            return Err(invalid());
        }

        // The offset sign can only appear after the four year digits.
        let (body, offset) = match trimmed
            .char_indices()
            .skip(4)
            .find(|(_, c)| *c == '+' || *c == '-')
        {
            Some((index, _)) => (
                &trimmed[..index],
                Some(parse_offset(&trimmed[index..], input)?),
            ),
            None => (trimmed, None),
        };
        if body.len() < 4 {
            return Err(invalid());
        }

        let year = parse_digits(&body[0..4], "DT", input)? as i32;
        let month = optional_digits(body, 4, "DT", input)?.unwrap_or(1);
        let day = optional_digits(body, 6, "DT", input)?.unwrap_or(1);
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
        let time = if body.len() > 8 {
            parse_time(&body[8..], "DT", input)?.as_naive()
        } else {
            NaiveTime::MIN
        };

        Ok(Self {
            value: NaiveDateTime::new(date, time),
            offset,
            original: Some(trimmed.to_string()),
        })
    }

    #[must_use]
    pub fn value(&self) -> NaiveDateTime {
        self.value
    }

    #[must_use]
    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    /// The DT text this value was parsed from.
    #[must_use]
    pub fn original(&self) -> Option<&str> {
        self.original.as_deref()
    }

    #[must_use]
    pub fn date(&self) -> StructuredDate {
        StructuredDate(self.value.date())
    }

    #[must_use]
    pub fn time(&self) -> StructuredTime {
        StructuredTime::from(self.value.time())
    }
}

impl From<NaiveDateTime> for StructuredDateTime {
    fn from(value: NaiveDateTime) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for StructuredDateTime {
    /// Original DT text when available, else `YYYY-MM-DD HH:MM:SS[.ffffff][+HH:MM]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(original) = &self.original {
            return f.write_str(original);
        }
        let pattern = if self.value.nanosecond() == 0 {
            "%Y-%m-%d %H:%M:%S"
        } else {
            "%Y-%m-%d %H:%M:%S%.6f"
        };
        match self.offset {
            Some(offset) => match offset.from_local_datetime(&self.value).single() {
                Some(zoned) => write!(f, "{}", zoned.format(&format!("{pattern}%:z"))),
                None => write!(f, "{}", self.value.format(pattern)),
            },
            None => write!(f, "{}", self.value.format(pattern)),
        }
    }
}

fn parse_digits(part: &str, vr: &'static str, input: &str) -> Result<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ModelError::invalid_temporal(vr, input));
    }
    part.parse()
        .map_err(|_| ModelError::invalid_temporal(vr, input))
}

fn optional_digits(
    body: &str,
    start: usize,
    vr: &'static str,
    input: &str,
) -> Result<Option<u32>> {
    if body.len() <= start {
        return Ok(None);
    }
    let part = body
        .get(start..start + 2)
        .ok_or_else(|| ModelError::invalid_temporal(vr, input))?;
    parse_digits(part, vr, input).map(Some)
}

fn parse_time(text: &str, vr: &'static str, input: &str) -> Result<StructuredTime> {
    let invalid = || ModelError::invalid_temporal(vr, input);
    let compact = text.replace(':', "");
    let (clock, fraction) = match compact.split_once('.') {
        Some((clock, fraction)) => (clock, Some(fraction)),
        None => (compact.as_str(), None),
    };
    if !matches!(clock.len(), 2 | 4 | 6) {
        return Err(invalid());
    }
    let hour = parse_digits(&clock[0..2], vr, input)?;
    let minute = optional_digits(clock, 2, vr, input)?.unwrap_or(0);
    let second = optional_digits(clock, 4, vr, input)?.unwrap_or(0);
    let microsecond = match fraction {
        Some(fraction) if fraction.len() <= 6 && clock.len() == 6 => {
            let value = parse_digits(fraction, vr, input)?;
            value * 10u32.pow(6 - fraction.len() as u32)
        }
        Some(_) => return Err(invalid()),
        None => 0,
    };
    // DICOM allows a leap second (60) in TM; fold it into 59.999999.
    if second == 60 {
        return StructuredTime::new(hour, minute, 59, 999_999).map_err(|_| invalid());
    }
    StructuredTime::new(hour, minute, second, microsecond).map_err(|_| invalid())
}

fn parse_offset(text: &str, input: &str) -> Result<FixedOffset> {
    let invalid = || ModelError::invalid_temporal("DT", input);
    let (sign, digits) = text.split_at(1);
    if digits.len() != 4 {
        return Err(invalid());
    }
    let hours = parse_digits(&digits[0..2], "DT", input)? as i32;
    let minutes = parse_digits(&digits[2..4], "DT", input)? as i32;
    let seconds = hours * 3600 + minutes * 60;
    let offset = if sign == "-" {
        FixedOffset::west_opt(seconds)
    } else {
        FixedOffset::east_opt(seconds)
    };
    offset.ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_components() {
        let date = StructuredDate::new(2023, 5, 1).unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2023, 5, 1));
        assert_eq!(date.to_string(), "2023-05-01");
    }

    #[test]
    fn date_rejects_impossible_day() {
        assert_eq!(
            StructuredDate::new(2023, 2, 30),
            Err(ModelError::InvalidDate {
                year: 2023,
                month: 2,
                day: 30
            })
        );
    }

    #[test]
    fn date_from_dicom() {
        assert_eq!(
            StructuredDate::from_dicom("20240110").unwrap(),
            StructuredDate::new(2024, 1, 10).unwrap()
        );
        assert_eq!(
            StructuredDate::from_dicom("2024.01.10").unwrap(),
            StructuredDate::new(2024, 1, 10).unwrap()
        );
        assert!(StructuredDate::from_dicom("2024011").is_err());
        assert!(StructuredDate::from_dicom("2024AB10").is_err());
        assert!(StructuredDate::from_dicom("20241310").is_err());
    }

    #[test]
    fn time_components() {
        let time = StructuredTime::new(14, 30, 15, 250).unwrap();
        assert_eq!(time.hour(), 14);
        assert_eq!(time.minute(), 30);
        assert_eq!(time.second(), 15);
        assert_eq!(time.microsecond(), 250);
        assert!(StructuredTime::new(24, 0, 0, 0).is_err());
        assert!(StructuredTime::new(1, 0, 0, 1_000_000).is_err());
    }

    #[test]
    fn time_from_dicom_forms() {
        let full = StructuredTime::from_dicom("143015.5").unwrap();
        assert_eq!(full, StructuredTime::new(14, 30, 15, 500_000).unwrap());
        assert_eq!(
            StructuredTime::from_dicom("1430").unwrap(),
            StructuredTime::new(14, 30, 0, 0).unwrap()
        );
        assert_eq!(
            StructuredTime::from_dicom("14").unwrap(),
            StructuredTime::new(14, 0, 0, 0).unwrap()
        );
        assert_eq!(
            StructuredTime::from_dicom("14:30:15").unwrap(),
            StructuredTime::new(14, 30, 15, 0).unwrap()
        );
        assert!(StructuredTime::from_dicom("143").is_err());
        assert!(StructuredTime::from_dicom("1430.5").is_err());
        assert!(StructuredTime::from_dicom("143015.1234567").is_err());
    }

    #[test]
    fn leap_second_is_folded() {
        let time = StructuredTime::from_dicom("235960").unwrap();
        assert_eq!(time.second(), 59);
        assert_eq!(time.microsecond(), 999_999);
    }

    #[test]
    fn datetime_keeps_original_text() {
        let value = StructuredDateTime::from_dicom("20240110123000.5+0100").unwrap();
        assert_eq!(value.to_string(), "20240110123000.5+0100");
        assert_eq!(value.date(), StructuredDate::new(2024, 1, 10).unwrap());
        assert_eq!(value.time().microsecond(), 500_000);
        assert_eq!(value.offset().map(|o| o.local_minus_utc()), Some(3600));
    }

    #[test]
    fn datetime_partial_precision() {
        let value = StructuredDateTime::from_dicom("2024").unwrap();
        assert_eq!(value.date(), StructuredDate::new(2024, 1, 1).unwrap());
        assert_eq!(value.time(), StructuredTime::new(0, 0, 0, 0).unwrap());
        assert!(StructuredDateTime::from_dicom("20241").is_err());
        assert!(StructuredDateTime::from_dicom("202401101230+01").is_err());
    }

    #[test]
    fn datetime_display_without_original() {
        let naive = NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        assert_eq!(
            StructuredDateTime::new(naive).to_string(),
            "2024-01-10 12:30:00"
        );

        let with_micros = NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_micro_opt(12, 30, 0, 42)
            .unwrap();
        let offset = FixedOffset::east_opt(-5 * 3600).unwrap();
        assert_eq!(
            StructuredDateTime::new(with_micros)
                .with_offset(offset)
                .to_string(),
            "2024-01-10 12:30:00.000042-05:00"
        );
    }
}
