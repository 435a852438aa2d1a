use crate::{Result, truncate_long};
use anyhow::Context;
use time::{Date, PrimitiveDateTime, Time, macros::format_description};

/// Textual decoding of temporal values, as servers print them in text protocol rows.
pub trait Parse {
    fn parse(value: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized;
}

impl Parse for Date {
    fn parse(value: impl AsRef<str>) -> Result<Self> {
        let value = value.as_ref().trim();
        Date::parse(value, format_description!("[year]-[month]-[day]"))
            .with_context(|| format!("Cannot parse `{}` as time::Date", truncate_long!(value)))
    }
}

impl Parse for Time {
    fn parse(value: impl AsRef<str>) -> Result<Self> {
        let value = value.as_ref().trim();
        Time::parse(
            value,
            format_description!("[hour]:[minute]:[second].[subsecond]"),
        )
        .or(Time::parse(
            value,
            format_description!("[hour]:[minute]:[second]"),
        ))
        .or(Time::parse(value, format_description!("[hour]:[minute]")))
        .with_context(|| format!("Cannot parse `{}` as time::Time", truncate_long!(value)))
    }
}

impl Parse for PrimitiveDateTime {
    fn parse(value: impl AsRef<str>) -> Result<Self> {
        let value = value.as_ref().trim().replacen('T', " ", 1);
        PrimitiveDateTime::parse(
            &value,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
        )
        .or(PrimitiveDateTime::parse(
            &value,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        ))
        .or(PrimitiveDateTime::parse(
            &value,
            format_description!("[year]-[month]-[day] [hour]:[minute]"),
        ))
        .or(Date::parse(&value, format_description!("[year]-[month]-[day]"))
            .map(|date| date.midnight()))
        .with_context(|| {
            format!(
                "Cannot parse `{}` as time::PrimitiveDateTime",
                truncate_long!(value)
            )
        })
    }
}
