//! Input validation and type coercion.
//!
//! Book payloads arrive as normalized raw JSON ([`BookFields`]) and leave as
//! typed [`NewBook`] / [`BookChanges`]. User payloads are already typed and
//! only need presence checks.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookChanges, NewBook},
        user::{CreateUser, LoginRequest, NewUser, UpdateUser},
    },
    normalize::BookFields,
};

const MISSING_BOOK_FIELDS: &str = "Missing required fields";
const MISSING_USER_FIELDS: &str = "All fields are required";
const MISSING_CREDENTIALS: &str = "Email and password are required";

/// Formats tried, in order, for date-only strings
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d %Y",
];
/// Formats tried for date-time strings without offset
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Validate a book for creation.
///
/// Title, author and date are missing when falsy (`""`, `0`, `false`,
/// absent); genre and stock only when absent. `0` stock is a valid count.
pub fn validate_new_book(fields: BookFields) -> AppResult<NewBook> {
    let BookFields {
        title,
        author,
        publication_date,
        genre,
        stock,
    } = fields;

    let (Some(title), Some(author), Some(date), Some(genre), Some(stock)) = (
        title.filter(is_truthy),
        author.filter(is_truthy),
        publication_date.filter(is_truthy),
        genre,
        stock,
    ) else {
        return Err(AppError::Validation(MISSING_BOOK_FIELDS.to_string()));
    };

    let publication_date = coerce_date(&date)?;

    Ok(NewBook {
        title: coerce_text(&title, "titulo")?,
        author: coerce_text(&author, "autor")?,
        publication_date,
        genre: coerce_text(&genre, "genero")?,
        stock: coerce_stock(&stock)?,
    })
}

/// Validate a partial book update.
///
/// Every supplied field is checked before anything is returned, so a single
/// bad value rejects the whole update.
pub fn validate_book_changes(fields: BookFields) -> AppResult<BookChanges> {
    Ok(BookChanges {
        title: fields
            .title
            .map(|v| coerce_non_empty_text(&v, "titulo"))
            .transpose()?,
        author: fields
            .author
            .map(|v| coerce_non_empty_text(&v, "autor"))
            .transpose()?,
        publication_date: fields
            .publication_date
            .map(|v| coerce_date(&v))
            .transpose()?,
        genre: fields
            .genre
            .map(|v| coerce_text(&v, "genero"))
            .transpose()?,
        stock: fields.stock.map(|v| coerce_stock(&v)).transpose()?,
    })
}

/// Parse any accepted date representation.
///
/// Strings: ISO dates, RFC 3339 and RFC 2822 date-times, naive date-times
/// with or without seconds, `YYYY/MM/DD`, `MM/DD/YYYY`, month-name dates,
/// `YYYY-MM` and a bare year. Integers from 1 to 9999 are a
/// year, any other integer is milliseconds since the Unix epoch.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => n.as_i64().and_then(date_from_integer),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) =
        DateTime::parse_from_rfc3339(s).or_else(|_| DateTime::parse_from_rfc2822(s))
    {
        return Some(dt.date_naive());
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(date);
    }

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date());
    }

    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse().ok().and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }

    // year and month only
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").ok()
}

fn date_from_integer(n: i64) -> Option<NaiveDate> {
    match i32::try_from(n) {
        Ok(year) if (1..=9999).contains(&year) => NaiveDate::from_ymd_opt(year, 1, 1),
        _ => DateTime::from_timestamp_millis(n).map(|dt| dt.date_naive()),
    }
}

/// Validate a user for creation, all three fields must be non-empty
pub fn validate_new_user(request: CreateUser) -> AppResult<NewUser> {
    request
        .validate()
        .map_err(|_| AppError::Validation(MISSING_USER_FIELDS.to_string()))?;

    match (request.name, request.email, request.password) {
        (Some(name), Some(email), Some(password)) => Ok(NewUser {
            name,
            email,
            password,
        }),
        _ => Err(AppError::Validation(MISSING_USER_FIELDS.to_string())),
    }
}

/// Drop empty strings from a user update, they mean "not supplied"
pub fn supplied_user_fields(request: UpdateUser) -> UpdateUser {
    UpdateUser {
        name: request.name.filter(|s| !s.is_empty()),
        email: request.email.filter(|s| !s.is_empty()),
        password: request.password.filter(|s| !s.is_empty()),
    }
}

/// Validate login credentials, returns `(email, password)`
pub fn validate_login(request: LoginRequest) -> AppResult<(String, String)> {
    request
        .validate()
        .map_err(|_| AppError::Validation(MISSING_CREDENTIALS.to_string()))?;

    match (request.email, request.password) {
        (Some(email), Some(password)) => Ok((email, password)),
        _ => Err(AppError::Validation(MISSING_CREDENTIALS.to_string())),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn coerce_date(value: &Value) -> AppResult<NaiveDate> {
    parse_date(value).ok_or_else(|| {
        AppError::Validation("Invalid date format for field \"anio\"".to_string())
    })
}

fn coerce_text(value: &Value, field: &str) -> AppResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(invalid_value(field)),
    }
}

fn coerce_non_empty_text(value: &Value, field: &str) -> AppResult<String> {
    let text = coerce_text(value, field)?;
    if text.is_empty() {
        return Err(AppError::Validation(format!(
            "Field \"{}\" cannot be empty",
            field
        )));
    }
    Ok(text)
}

fn coerce_stock(value: &Value) -> AppResult<i32> {
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| invalid_value("stock"))
}

fn invalid_value(field: &str) -> AppError {
    AppError::Validation(format!("Invalid value for field \"{}\"", field))
}
