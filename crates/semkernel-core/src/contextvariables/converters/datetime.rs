use chrono::{DateTime, SecondsFormat, Utc};

use crate::SemkernelError;
use crate::contextvariables::converter::ContextVariableTypeConverter;

/// Timestamps travel as RFC 3339 strings.
pub fn datetime_converter() -> ContextVariableTypeConverter<DateTime<Utc>> {
    ContextVariableTypeConverter::<DateTime<Utc>>::builder()
        .to_prompt_string(|_, dt| dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        .from_prompt_string(|s| {
            DateTime::parse_from_rfc3339(s.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| SemkernelError::parse("DateTime<Utc>", s, e))
        })
        .build()
}
