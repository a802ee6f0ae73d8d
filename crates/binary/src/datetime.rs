//! Date and time wire types.
//!
//! All of them are integer offsets from 2000-01-01 00:00:00 UTC:
//!
//! ```text
//! date         int32  days
//! time         int64  microseconds since midnight
//! timetz       int64  microseconds since midnight, int32 zone (seconds west of UTC)
//! timestamp    int64  microseconds
//! timestamptz  int64  microseconds (UTC)
//! interval     int64  microseconds, int32 days, int32 months
//! ```
//!
//! The largest and smallest integer of `date`, `timestamp` and `timestamptz`
//! stand for +infinity and -infinity and pass through unscaled.

use crate::scalar::{exact, WireValue};
use alloc::format;
use alloc::vec::Vec;
use pqbin_core::byteorder::{put_i32, put_i64};
use pqbin_core::{DataType, Error, Result, WireReader};

/// Julian day number of 2000-01-01.
pub const POSTGRES_EPOCH_JDATE: i32 = 2_451_545;
/// Unix time of 2000-01-01 00:00:00 UTC, in seconds.
pub const POSTGRES_EPOCH_UNIX_SECS: i64 = 946_684_800;
pub const USECS_PER_SEC: i64 = 1_000_000;
pub const USECS_PER_DAY: i64 = 86_400 * USECS_PER_SEC;
/// Largest zone displacement accepted for `timetz`, in seconds.
pub const TZDISP_LIMIT: i32 = (15 * 60 + 59) * 60;

/// Converts a proleptic Gregorian date to a Julian day number.
pub fn date2j(year: i32, month: u32, day: u32) -> i64 {
    let (mut y, mut m) = (year as i64, month as i64);
    if m > 2 {
        m += 1;
        y += 4800;
    } else {
        m += 13;
        y += 4799;
    }
    let century = y.div_euclid(100);
    let mut julian = y * 365 - 32167;
    julian += y.div_euclid(4) - century + century.div_euclid(4);
    julian += 7834 * m / 256 + day as i64;
    julian
}

/// Converts a non-negative Julian day number to `(year, month, day)`.
pub fn j2date(jd: u32) -> (i32, u32, u32) {
    let mut julian = jd as u64 + 32044;
    let mut quad = julian / 146_097;
    let extra = (julian - quad * 146_097) * 4 + 3;
    julian += 60 + quad * 3 + extra / 146_097;
    quad = julian / 1461;
    julian -= quad * 1461;
    let mut y = julian * 4 / 1461;
    julian = if y != 0 {
        (julian + 305) % 365
    } else {
        (julian + 306) % 366
    } + 123;
    y += quad * 4;
    let year = y as i64 - 4800;
    let quad = julian * 2141 / 65536;
    let day = julian - 7834 * quad / 256;
    let month = (quad + 10) % 12 + 1;
    (year as i32, month as u32, day as u32)
}

fn is_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Calendar date as days since 2000-01-01.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(pub i32);

impl Date {
    pub const INFINITY: Date = Date(i32::MAX);
    pub const NEG_INFINITY: Date = Date(i32::MIN);

    /// Creates a date from a proleptic Gregorian year, month and day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Date> {
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return Err(Error::out_of_range(
                "date",
                format!("{}-{:02}-{:02} is not a calendar date", year, month, day),
            ));
        }
        let julian = date2j(year, month, day);
        let days = julian - POSTGRES_EPOCH_JDATE as i64;
        if julian < 0 || days >= i32::MAX as i64 || days <= i32::MIN as i64 {
            return Err(Error::out_of_range("date", format!("year {} out of range", year)));
        }
        Ok(Date(days as i32))
    }

    /// Returns `(year, month, day)`, or `None` for the infinities and days
    /// before the start of the Julian period.
    pub fn to_ymd(&self) -> Option<(i32, u32, u32)> {
        if !self.is_finite() {
            return None;
        }
        let julian = self.0 as i64 + POSTGRES_EPOCH_JDATE as i64;
        u32::try_from(julian).ok().map(j2date)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        *self != Date::INFINITY && *self != Date::NEG_INFINITY
    }
}

impl WireValue for Date {
    const DATA_TYPE: DataType = DataType::Date;

    fn encode(&self, buf: &mut Vec<u8>) {
        put_i32(buf, self.0);
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(Date(i32::from_be_bytes(exact(bytes, "date")?)))
    }
}

/// Time of day as microseconds since midnight, `24:00:00` included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(pub i64);

impl Time {
    /// Creates a time of day.
    pub fn from_hms_micro(hour: u32, minute: u32, second: u32, micro: u32) -> Result<Time> {
        let valid = minute < 60
            && second < 60
            && (micro as i64) < USECS_PER_SEC
            && (hour < 24 || (hour == 24 && minute == 0 && second == 0 && micro == 0));
        if !valid {
            return Err(Error::out_of_range(
                "time",
                format!("{:02}:{:02}:{:02}.{:06}", hour, minute, second, micro),
            ));
        }
        let secs = (hour as i64 * 60 + minute as i64) * 60 + second as i64;
        Ok(Time(secs * USECS_PER_SEC + micro as i64))
    }

    /// Microseconds since midnight, wrapped into one day. `24:00:00` is kept.
    fn day_micros(&self) -> i64 {
        if self.0 == USECS_PER_DAY {
            self.0
        } else {
            self.0.rem_euclid(USECS_PER_DAY)
        }
    }

    #[inline]
    pub fn hour(&self) -> u32 {
        (self.day_micros() / (3600 * USECS_PER_SEC)) as u32
    }

    #[inline]
    pub fn minute(&self) -> u32 {
        (self.day_micros() / (60 * USECS_PER_SEC) % 60) as u32
    }

    #[inline]
    pub fn second(&self) -> u32 {
        (self.day_micros() / USECS_PER_SEC % 60) as u32
    }

    #[inline]
    pub fn microsecond(&self) -> u32 {
        (self.day_micros() % USECS_PER_SEC) as u32
    }

    fn check(micros: i64, type_name: &'static str) -> Result<Time> {
        if !(0..=USECS_PER_DAY).contains(&micros) {
            return Err(Error::invalid_binary(type_name, "time out of range"));
        }
        Ok(Time(micros))
    }
}

impl WireValue for Time {
    const DATA_TYPE: DataType = DataType::Time;

    fn encode(&self, buf: &mut Vec<u8>) {
        put_i64(buf, self.0);
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Time::check(i64::from_be_bytes(exact(bytes, "time")?), "time")
    }
}

/// Time of day with a zone displacement in seconds west of UTC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimeTz {
    pub time: Time,
    pub zone: i32,
}

impl WireValue for TimeTz {
    const DATA_TYPE: DataType = DataType::TimeTz;

    fn encode(&self, buf: &mut Vec<u8>) {
        put_i64(buf, self.time.0);
        put_i32(buf, self.zone);
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let raw = exact::<12>(bytes, "time with time zone")?;
        let mut reader = WireReader::new(&raw, "time with time zone");
        let time = Time::check(reader.read_i64()?, "time with time zone")?;
        let zone = reader.read_i32()?;
        if !(-TZDISP_LIMIT..=TZDISP_LIMIT).contains(&zone) {
            return Err(Error::invalid_binary(
                "time with time zone",
                format!("time zone displacement {} out of range", zone),
            ));
        }
        Ok(TimeTz { time, zone })
    }
}

macro_rules! timestamp_type {
    ($(#[$doc:meta])* $name:ident, $data_type:expr, $type_name:expr) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub i64);

        impl $name {
            pub const INFINITY: $name = $name(i64::MAX);
            pub const NEG_INFINITY: $name = $name(i64::MIN);

            /// Creates a finite value from Unix seconds and microseconds.
            pub fn from_unix(secs: i64, micros: u32) -> Result<$name> {
                if micros as i64 >= USECS_PER_SEC {
                    return Err(Error::out_of_range($type_name, "microseconds out of range"));
                }
                let value = secs
                    .checked_sub(POSTGRES_EPOCH_UNIX_SECS)
                    .and_then(|s| s.checked_mul(USECS_PER_SEC))
                    .and_then(|us| us.checked_add(micros as i64))
                    .filter(|us| *us != i64::MAX && *us != i64::MIN)
                    .ok_or_else(|| Error::out_of_range($type_name, "timestamp out of range"))?;
                Ok($name(value))
            }

            /// Returns Unix seconds and microseconds, or `None` for the infinities.
            pub fn to_unix(&self) -> Option<(i64, u32)> {
                if !self.is_finite() {
                    return None;
                }
                let secs = POSTGRES_EPOCH_UNIX_SECS + self.0.div_euclid(USECS_PER_SEC);
                Some((secs, self.0.rem_euclid(USECS_PER_SEC) as u32))
            }

            #[inline]
            pub fn is_finite(&self) -> bool {
                *self != $name::INFINITY && *self != $name::NEG_INFINITY
            }
        }

        impl WireValue for $name {
            const DATA_TYPE: DataType = $data_type;

            fn encode(&self, buf: &mut Vec<u8>) {
                put_i64(buf, self.0);
            }

            fn decode(bytes: &[u8]) -> Result<Self> {
                Ok($name(i64::from_be_bytes(exact(bytes, $type_name)?)))
            }
        }
    };
}

timestamp_type!(
    /// Wall-clock timestamp as microseconds since 2000-01-01.
    Timestamp,
    DataType::Timestamp,
    "timestamp"
);

timestamp_type!(
    /// Absolute timestamp as microseconds since 2000-01-01 UTC.
    TimestampTz,
    DataType::TimestampTz,
    "timestamp with time zone"
);

/// Time span with separate clock, day and month components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Interval {
    pub micros: i64,
    pub days: i32,
    pub months: i32,
}

impl WireValue for Interval {
    const DATA_TYPE: DataType = DataType::Interval;

    fn encode(&self, buf: &mut Vec<u8>) {
        put_i64(buf, self.micros);
        put_i32(buf, self.days);
        put_i32(buf, self.months);
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let raw = exact::<16>(bytes, "interval")?;
        let mut reader = WireReader::new(&raw, "interval");
        Ok(Interval {
            micros: reader.read_i64()?,
            days: reader.read_i32()?,
            months: reader.read_i32()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_julian_days() {
        assert_eq!(date2j(2000, 1, 1), POSTGRES_EPOCH_JDATE as i64);
        assert_eq!(date2j(1970, 1, 1), 2_440_588);
        assert_eq!(j2date(2_440_588), (1970, 1, 1));
        assert_eq!(j2date(POSTGRES_EPOCH_JDATE as u32), (2000, 1, 1));
    }

    #[test]
    fn test_date_civil_roundtrip() {
        for (y, m, d) in [(2000, 1, 1), (1999, 12, 31), (2024, 2, 29), (1582, 10, 15), (-100, 3, 1)] {
            let date = Date::from_ymd(y, m, d).unwrap();
            assert_eq!(date.to_ymd(), Some((y, m, d)));
        }
        assert_eq!(Date::from_ymd(2000, 1, 1).unwrap(), Date(0));
        assert_eq!(Date::from_ymd(2000, 3, 1).unwrap(), Date(60));
        assert!(Date::from_ymd(2023, 2, 29).is_err());
        assert!(Date::from_ymd(2023, 13, 1).is_err());
    }

    #[test]
    fn test_date_infinity_passthrough() {
        let mut buf = Vec::new();
        Date::INFINITY.encode(&mut buf);
        assert_eq!(buf, vec![0x7F, 0xFF, 0xFF, 0xFF]);
        let back = Date::decode(&buf).unwrap();
        assert_eq!(back, Date::INFINITY);
        assert_eq!(back.to_ymd(), None);
    }

    #[test]
    fn test_time() {
        let t = Time::from_hms_micro(13, 45, 7, 250).unwrap();
        assert_eq!(t.0, ((13 * 60 + 45) * 60 + 7) * USECS_PER_SEC + 250);
        assert_eq!((t.hour(), t.minute(), t.second(), t.microsecond()), (13, 45, 7, 250));
        assert!(Time::from_hms_micro(24, 0, 0, 0).is_ok());
        assert!(Time::from_hms_micro(24, 0, 0, 1).is_err());
        assert!(Time::from_hms_micro(12, 60, 0, 0).is_err());

        let mut buf = Vec::new();
        Time(-1).encode(&mut buf);
        assert!(Time::decode(&buf).is_err());
    }

    #[test]
    fn test_time_fields_wrap_out_of_range_values() {
        let t = Time(-1);
        assert_eq!((t.hour(), t.minute(), t.second()), (23, 59, 59));
        assert_eq!(t.microsecond(), 999_999);

        let t = Time(USECS_PER_DAY + 61 * USECS_PER_SEC);
        assert_eq!((t.hour(), t.minute(), t.second()), (0, 1, 1));

        let t = Time(i64::MIN);
        assert!(t.hour() < 24 && t.minute() < 60 && t.second() < 60);

        let midnight = Time(USECS_PER_DAY);
        assert_eq!((midnight.hour(), midnight.minute()), (24, 0));
    }

    #[test]
    fn test_timetz() {
        let v = TimeTz {
            time: Time::from_hms_micro(8, 0, 0, 0).unwrap(),
            zone: -3600,
        };
        let mut buf = Vec::new();
        v.encode(&mut buf);
        assert_eq!(buf.len(), 12);
        assert_eq!(TimeTz::decode(&buf).unwrap(), v);

        let bad = TimeTz { zone: TZDISP_LIMIT + 1, ..v };
        buf.clear();
        bad.encode(&mut buf);
        assert!(TimeTz::decode(&buf).is_err());
    }

    #[test]
    fn test_timestamp_unix() {
        let ts = Timestamp::from_unix(POSTGRES_EPOCH_UNIX_SECS, 0).unwrap();
        assert_eq!(ts, Timestamp(0));

        let ts = TimestampTz::from_unix(0, 500).unwrap();
        assert_eq!(ts.0, -POSTGRES_EPOCH_UNIX_SECS * USECS_PER_SEC + 500);
        assert_eq!(ts.to_unix(), Some((0, 500)));

        // before the Unix epoch the microseconds stay non-negative
        let ts = Timestamp::from_unix(-2, 250_000).unwrap();
        assert_eq!(ts.to_unix(), Some((-2, 250_000)));

        assert!(Timestamp::from_unix(0, 1_000_000).is_err());
        assert!(Timestamp::from_unix(i64::MAX, 0).is_err());
    }

    #[test]
    fn test_timestamp_infinity_passthrough() {
        for ts in [TimestampTz::INFINITY, TimestampTz::NEG_INFINITY] {
            let mut buf = Vec::new();
            ts.encode(&mut buf);
            let back = TimestampTz::decode(&buf).unwrap();
            assert_eq!(back, ts);
            assert!(!back.is_finite());
            assert_eq!(back.to_unix(), None);
        }
    }

    #[test]
    fn test_interval_layout() {
        let v = Interval {
            micros: 1,
            days: 2,
            months: 3,
        };
        let mut buf = Vec::new();
        v.encode(&mut buf);
        assert_eq!(
            buf,
            vec![0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3]
        );
        assert_eq!(Interval::decode(&buf).unwrap(), v);
    }
}
