/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Text forms of leaf types and the string converters used for map keys.

use crate::error::ConversionError;
use crate::number::{BigDecimal, BigInteger};
use crate::type_descriptor::TypeDescriptor;
use crate::value::{AttributeType, DomainValue};
use aws_smithy_types::date_time::Format;
use aws_smithy_types::DateTime;
use std::fmt;
use std::marker::PhantomData;
use time::format_description::well_known::Rfc3339;
use time::format_description::FormatItem;
use time::macros::format_description;
use uuid::Uuid;

/// A leaf type with a lossless textual form.
///
/// Number-like types store this form in `N`, text-like types in `S`, and every
/// implementation can serve as a map key through [`TextStringConverter`].
pub trait TextForm: AttributeType {
    /// Renders the value as text.
    fn to_text(&self) -> Result<String, ConversionError>;

    /// Parses the value from text produced by [`TextForm::to_text`].
    fn from_text(text: &str) -> Result<Self, ConversionError>;
}

fn invalid<T: AttributeType>(text: &str, reason: impl fmt::Display) -> ConversionError {
    ConversionError::invalid_value(
        T::type_descriptor(),
        format!("cannot parse '{}': {}", text, reason),
    )
}

impl TextForm for String {
    fn to_text(&self) -> Result<String, ConversionError> {
        Ok(self.clone())
    }

    fn from_text(text: &str) -> Result<Self, ConversionError> {
        Ok(text.to_string())
    }
}

impl TextForm for char {
    fn to_text(&self) -> Result<String, ConversionError> {
        Ok(self.to_string())
    }

    fn from_text(text: &str) -> Result<Self, ConversionError> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(invalid::<char>(text, "expected exactly one character")),
        }
    }
}

impl TextForm for bool {
    fn to_text(&self) -> Result<String, ConversionError> {
        Ok(self.to_string())
    }

    fn from_text(text: &str) -> Result<Self, ConversionError> {
        text.parse().map_err(|err| invalid::<bool>(text, err))
    }
}

macro_rules! integer_text_form {
    ($($ty:ty),+) => {
        $(
            impl TextForm for $ty {
                fn to_text(&self) -> Result<String, ConversionError> {
                    Ok(self.to_string())
                }

                fn from_text(text: &str) -> Result<Self, ConversionError> {
                    text.parse().map_err(|err| invalid::<$ty>(text, err))
                }
            }
        )+
    };
}

integer_text_form!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

macro_rules! float_text_form {
    ($($ty:ty),+) => {
        $(
            impl TextForm for $ty {
                fn to_text(&self) -> Result<String, ConversionError> {
                    if self.is_finite() {
                        Ok(self.to_string())
                    } else {
                        Err(ConversionError::invalid_value(
                            <$ty>::type_descriptor(),
                            format!("{} cannot be stored as a number", self),
                        ))
                    }
                }

                fn from_text(text: &str) -> Result<Self, ConversionError> {
                    match text.parse::<$ty>() {
                        Ok(value) if value.is_finite() => Ok(value),
                        Ok(_) => Err(invalid::<$ty>(text, "not a finite number")),
                        Err(err) => Err(invalid::<$ty>(text, err)),
                    }
                }
            }
        )+
    };
}

float_text_form!(f32, f64);

impl TextForm for BigInteger {
    fn to_text(&self) -> Result<String, ConversionError> {
        Ok(self.as_ref().to_string())
    }

    fn from_text(text: &str) -> Result<Self, ConversionError> {
        text.parse().map_err(|err| invalid::<BigInteger>(text, err))
    }
}

impl TextForm for BigDecimal {
    fn to_text(&self) -> Result<String, ConversionError> {
        Ok(self.as_ref().to_string())
    }

    fn from_text(text: &str) -> Result<Self, ConversionError> {
        text.parse().map_err(|err| invalid::<BigDecimal>(text, err))
    }
}

/// Epoch seconds with an optional fraction. Parsing also accepts RFC 3339 date-times.
impl TextForm for DateTime {
    fn to_text(&self) -> Result<String, ConversionError> {
        self.fmt(Format::EpochSeconds).map_err(|err| {
            ConversionError::invalid_value(DateTime::type_descriptor(), err.to_string())
        })
    }

    fn from_text(text: &str) -> Result<Self, ConversionError> {
        DateTime::from_str(text, Format::EpochSeconds)
            .or_else(|_| DateTime::from_str(text, Format::DateTime))
            .map_err(|err| invalid::<DateTime>(text, err))
    }
}

const DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second].[subsecond]");
const PRIMITIVE_DATE_TIME: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
const UTC_OFFSET: &[FormatItem<'static>] =
    format_description!("[offset_hour sign:mandatory]:[offset_minute]:[offset_second]");

macro_rules! temporal_text_form {
    ($ty:ty, $format:expr) => {
        impl TextForm for $ty {
            fn to_text(&self) -> Result<String, ConversionError> {
                self.format($format).map_err(|err| {
                    ConversionError::invalid_value(<$ty>::type_descriptor(), err.to_string())
                })
            }

            fn from_text(text: &str) -> Result<Self, ConversionError> {
                <$ty>::parse(text, $format).map_err(|err| invalid::<$ty>(text, err))
            }
        }
    };
}

temporal_text_form!(time::Date, DATE);
temporal_text_form!(time::Time, TIME);
temporal_text_form!(time::PrimitiveDateTime, PRIMITIVE_DATE_TIME);
temporal_text_form!(time::UtcOffset, UTC_OFFSET);

/// RFC 3339 text. Offsets with a seconds part, and years outside `0000..=9999`, have no
/// RFC 3339 form and are rejected.
impl TextForm for time::OffsetDateTime {
    fn to_text(&self) -> Result<String, ConversionError> {
        if self.offset().seconds_past_minute() != 0 {
            return Err(ConversionError::invalid_value(
                time::OffsetDateTime::type_descriptor(),
                "RFC 3339 offsets cannot have a seconds part",
            ));
        }
        self.format(&Rfc3339).map_err(|err| {
            ConversionError::invalid_value(time::OffsetDateTime::type_descriptor(), err.to_string())
        })
    }

    fn from_text(text: &str) -> Result<Self, ConversionError> {
        time::OffsetDateTime::parse(text, &Rfc3339)
            .map_err(|err| invalid::<time::OffsetDateTime>(text, err))
    }
}

/// Renders `seconds[.fraction]`, trimming trailing zeros from the fraction.
fn seconds_text(negative: bool, seconds: u64, nanos: u32) -> String {
    let sign = if negative { "-" } else { "" };
    if nanos == 0 {
        format!("{}{}", sign, seconds)
    } else {
        let fraction = format!("{:09}", nanos);
        format!("{}{}.{}", sign, seconds, fraction.trim_end_matches('0'))
    }
}

/// Parses `[-]seconds[.fraction]` with at most nanosecond precision.
fn parse_seconds(text: &str) -> Option<(bool, u64, u32)> {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (unsigned, ""),
    };
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() || !digits(whole) || fraction.len() > 9 || !digits(fraction) {
        return None;
    }
    let seconds = whole.parse().ok()?;
    let nanos = if fraction.is_empty() {
        0
    } else {
        format!("{:0<9}", fraction).parse().ok()?
    };
    Some((negative, seconds, nanos))
}

impl TextForm for time::Duration {
    fn to_text(&self) -> Result<String, ConversionError> {
        let negative = self.is_negative();
        Ok(seconds_text(
            negative,
            self.whole_seconds().unsigned_abs(),
            self.subsec_nanoseconds().unsigned_abs(),
        ))
    }

    fn from_text(text: &str) -> Result<Self, ConversionError> {
        let (negative, seconds, nanos) =
            parse_seconds(text).ok_or_else(|| invalid::<time::Duration>(text, "expected seconds"))?;
        let (seconds, nanos) = if negative {
            (-i128::from(seconds), -i128::from(nanos))
        } else {
            (i128::from(seconds), i128::from(nanos))
        };
        let seconds = i64::try_from(seconds)
            .map_err(|_| invalid::<time::Duration>(text, "seconds out of range"))?;
        // |nanos| < 10^9, so this always fits
        let nanos = nanos as i32;
        Ok(time::Duration::new(seconds, nanos))
    }
}

impl TextForm for std::time::Duration {
    fn to_text(&self) -> Result<String, ConversionError> {
        Ok(seconds_text(false, self.as_secs(), self.subsec_nanos()))
    }

    fn from_text(text: &str) -> Result<Self, ConversionError> {
        match parse_seconds(text) {
            Some((false, seconds, nanos)) => Ok(std::time::Duration::new(seconds, nanos)),
            Some((true, ..)) => Err(invalid::<std::time::Duration>(text, "duration is negative")),
            None => Err(invalid::<std::time::Duration>(text, "expected seconds")),
        }
    }
}

impl TextForm for Uuid {
    fn to_text(&self) -> Result<String, ConversionError> {
        Ok(self.hyphenated().to_string())
    }

    fn from_text(text: &str) -> Result<Self, ConversionError> {
        Uuid::parse_str(text).map_err(|err| invalid::<Uuid>(text, err))
    }
}

impl TextForm for http::Uri {
    fn to_text(&self) -> Result<String, ConversionError> {
        Ok(self.to_string())
    }

    fn from_text(text: &str) -> Result<Self, ConversionError> {
        text.parse().map_err(|err| invalid::<http::Uri>(text, err))
    }
}

/// A one-way textual codec for a map key type.
///
/// Map keys have no wire type of their own, so unlike [`ConvertAttribute`] a string
/// converter only maps a domain value to and from the text of an `M` key.
///
/// [`ConvertAttribute`]: crate::ConvertAttribute
pub trait StringConverter: Send + Sync + fmt::Debug {
    /// The key type served.
    fn type_descriptor(&self) -> &TypeDescriptor;

    /// A second identity the string converter is registered under.
    fn primitive_type(&self) -> Option<&TypeDescriptor> {
        None
    }

    /// Encodes a key.
    fn encode(&self, value: &DomainValue) -> Result<String, ConversionError>;

    /// Decodes a key.
    fn decode(&self, text: &str) -> Result<DomainValue, ConversionError>;
}

/// The string converter of a [`TextForm`] type.
pub struct TextStringConverter<T> {
    descriptor: TypeDescriptor,
    primitive: Option<TypeDescriptor>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: TextForm> TextStringConverter<T> {
    /// Creates the string converter for `T`.
    pub fn new() -> Self {
        Self {
            descriptor: T::type_descriptor(),
            primitive: T::prelude_type(),
            _phantom: PhantomData,
        }
    }
}

impl<T: TextForm> Default for TextStringConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TextStringConverter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextStringConverter")
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

impl<T: TextForm> StringConverter for TextStringConverter<T> {
    fn type_descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn primitive_type(&self) -> Option<&TypeDescriptor> {
        self.primitive.as_ref()
    }

    fn encode(&self, value: &DomainValue) -> Result<String, ConversionError> {
        match value.downcast_ref::<T>() {
            Some(key) => key.to_text(),
            None => Err(ConversionError::unexpected_domain_value(
                self.descriptor.clone(),
                value.describe(),
            )),
        }
    }

    fn decode(&self, text: &str) -> Result<DomainValue, ConversionError> {
        T::from_text(text).map(|key| key.to_domain_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionErrorKind;
    use proptest::prelude::*;
    use time::macros::{date, datetime, offset, time};

    fn round_trip<T: TextForm + PartialEq>(value: T) {
        let text = value.to_text().unwrap();
        assert_eq!(T::from_text(&text).unwrap(), value, "text was {text:?}");
    }

    #[test]
    fn numbers_reject_garbage() {
        let err = i32::from_text("12x").unwrap_err();
        assert!(matches!(err.kind(), ConversionErrorKind::InvalidValue { .. }));
        assert!(err.to_string().starts_with("invalid value for i32: cannot parse '12x'"));
        assert!(u8::from_text("256").is_err());
        assert!(f64::from_text("NaN").is_err());
        assert!(f64::from_text("inf").is_err());
        assert!(f64::NAN.to_text().is_err());
    }

    #[test]
    fn char_needs_exactly_one_character() {
        assert_eq!(char::from_text("é").unwrap(), 'é');
        assert!(char::from_text("").is_err());
        assert!(char::from_text("ab").is_err());
    }

    #[test]
    fn temporal_boundaries() {
        round_trip(date!(0000 - 01 - 01));
        round_trip(date!(9999 - 12 - 31));
        round_trip(time!(0:00));
        round_trip(time!(23:59:59.999_999_999));
        round_trip(datetime!(2024-02-29 12:30:00.5));
        round_trip(datetime!(2024-02-29 12:30:00.5 +05:30));
        round_trip(offset!(-12:34:56));
        assert_eq!(offset!(+1).to_text().unwrap(), "+01:00:00");
        assert_eq!(date!(2024 - 02 - 29).to_text().unwrap(), "2024-02-29");
    }

    #[test]
    fn offsets_with_seconds_have_no_rfc_3339_form() {
        let value = datetime!(2024-01-01 0:00 UTC).to_offset(offset!(+01:00:30));
        let err = value.to_text().unwrap_err();
        assert!(matches!(err.kind(), ConversionErrorKind::InvalidValue { .. }));
        assert!(err.to_string().contains("seconds part"), "{err}");
        // the offset alone keeps its seconds
        round_trip(value.offset());
    }

    #[test]
    fn smithy_timestamps_are_epoch_seconds() {
        let timestamp = DateTime::from_secs_and_nanos(1_576_540_098, 520_000_000);
        assert_eq!(timestamp.to_text().unwrap(), "1576540098.52");
        assert_eq!(
            DateTime::from_text("2019-12-16T23:48:18.52Z").unwrap(),
            timestamp
        );
    }

    #[test]
    fn durations() {
        assert_eq!(time::Duration::seconds(-90).to_text().unwrap(), "-90");
        assert_eq!(time::Duration::milliseconds(-1500).to_text().unwrap(), "-1.5");
        assert_eq!(
            std::time::Duration::from_nanos(1_000_000_001).to_text().unwrap(),
            "1.000000001"
        );
        round_trip(time::Duration::MIN);
        round_trip(time::Duration::MAX);
        round_trip(std::time::Duration::MAX);
        assert!(std::time::Duration::from_text("-1").is_err());
        assert!(time::Duration::from_text("1.0000000001").is_err());
        assert!(time::Duration::from_text(".5").is_err());
    }

    #[test]
    fn key_codec_checks_the_domain_type() {
        let codec = TextStringConverter::<i32>::new();
        assert_eq!(codec.encode(&DomainValue::scalar(7i32)).unwrap(), "7");
        assert_eq!(codec.decode("7").unwrap().downcast_ref::<i32>(), Some(&7));
        let err = codec.encode(&DomainValue::scalar("7".to_string())).unwrap_err();
        assert!(matches!(
            err.kind(),
            ConversionErrorKind::UnexpectedDomainValue { .. }
        ));
    }

    #[test]
    fn uris_keep_their_text() {
        let uri: http::Uri = "https://example.com/items?id=7".parse().unwrap();
        assert_eq!(uri.to_text().unwrap(), "https://example.com/items?id=7");
        round_trip(uri);
        round_trip(http::Uri::from_static("/relative/path"));
        let err = http::Uri::from_text("http://exa mple.com").unwrap_err();
        assert!(matches!(err.kind(), ConversionErrorKind::InvalidValue { .. }));
    }

    proptest! {
        #[test]
        fn integers_round_trip(value: i128) {
            prop_assert_eq!(i128::from_text(&value.to_text().unwrap()).unwrap(), value);
        }

        #[test]
        fn doubles_round_trip(value in proptest::num::f64::NORMAL | proptest::num::f64::SUBNORMAL | proptest::num::f64::ZERO) {
            prop_assert_eq!(f64::from_text(&value.to_text().unwrap()).unwrap(), value);
        }

        #[test]
        fn durations_round_trip(seconds: i64, nanos in -999_999_999i32..=999_999_999) {
            let duration = time::Duration::new(seconds, nanos);
            prop_assert_eq!(time::Duration::from_text(&duration.to_text().unwrap()).unwrap(), duration);
        }

        #[test]
        fn uuids_round_trip(bytes: [u8; 16]) {
            let uuid = Uuid::from_bytes(bytes);
            prop_assert_eq!(Uuid::from_text(&uuid.to_text().unwrap()).unwrap(), uuid);
        }
    }
}
