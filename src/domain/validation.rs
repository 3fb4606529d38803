//! Report definition validation.
//!
//! Candidate documents arrive as untyped JSON. Validation walks the document
//! once, dispatching on each discriminating field (`report_source`,
//! `delivery.channel`, `trigger.trigger_type`, `trigger_params.schedule_type`)
//! with an exhaustive match and building the typed [`ReportDefinition`].
//! Objects are closed: keys the selected shape does not declare are rejected.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use url::Url;

use super::definitions::{
    CronSchedule, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, DataReportParams, Delivery,
    EmailDelivery, IntervalSchedule, ReportDefinition, ReportParams, Schedule, Trigger,
    VisualReportParams,
};
use super::error::ValidationError;
use super::schedule::CronExpression;
use super::types::{
    DataFormat, DeliveryChannel, IntervalUnit, ReportSource, ScheduleType, TriggerType,
    VisualFormat, WireEnum,
};

static REPORT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_\-\s\(\)\[\]\,+]+$").expect("report name pattern compiles")
});

static EMAIL_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern compiles"));

const DEFINITION_KEYS: &[&str] = &[
    "report_name",
    "report_source",
    "description",
    "report_params",
    "delivery",
    "trigger",
    "status",
    "time_created",
    "last_updated",
];
const VISUAL_PARAMS_KEYS: &[&str] = &["url", "window_width", "window_height", "report_format"];
const DATA_PARAMS_KEYS: &[&str] = &["saved_search_id", "time_range", "report_format"];
const DELIVERY_KEYS: &[&str] = &["channel", "delivery_params"];
const EMAIL_KEYS: &[&str] = &["subject", "body", "has_attachment", "recipients"];
const TRIGGER_KEYS: &[&str] = &["trigger_type", "trigger_params"];
const SCHEDULE_KEYS: &[&str] = &["schedule_type", "schedule"];
const RECURRING_KEYS: &[&str] = &["interval"];
const INTERVAL_KEYS: &[&str] = &["period", "unit", "start_time"];
const CRON_SCHEDULE_KEYS: &[&str] = &["cron"];
const CRON_KEYS: &[&str] = &["expression", "time_zone"];

/// Validate a candidate document and return its typed form.
///
/// `time_created` and `last_updated` are tolerated so a previously fetched
/// document can be submitted again, but they are server-assigned and ignored.
pub fn validate_definition(document: &Value) -> Result<ReportDefinition, ValidationError> {
    let root = Fields::root(document)?;

    let report_name = root.string("report_name")?;
    if report_name.is_empty() {
        return Err(ValidationError::new(
            "report_name",
            "value must not be empty",
        ));
    }
    if !REPORT_NAME.is_match(report_name) {
        return Err(ValidationError::new(
            "report_name",
            format!("value [{report_name}] contains unsupported characters"),
        ));
    }

    let source = root.wire_enum::<ReportSource>("report_source")?;
    let description = root.optional_string("description")?.unwrap_or_default();
    let report_params = report_params(source, &root.object("report_params")?)?;

    let delivery = match root.optional_object("delivery")? {
        Some(fields) => Some(delivery(&fields)?),
        None => None,
    };
    let trigger = match root.optional_object("trigger")? {
        Some(fields) => Some(trigger(&fields)?),
        None => None,
    };
    let status = root.optional_string("status")?.map(str::to_string);

    root.deny_unknown(DEFINITION_KEYS)?;

    Ok(ReportDefinition {
        report_name: report_name.to_string(),
        description: description.to_string(),
        report_params,
        delivery,
        trigger,
        status,
    })
}

fn report_params(source: ReportSource, fields: &Fields<'_>) -> Result<ReportParams, ValidationError> {
    match source {
        ReportSource::Dashboard => Ok(ReportParams::Dashboard(visual_params(fields)?)),
        ReportSource::Visualization => Ok(ReportParams::Visualization(visual_params(fields)?)),
        ReportSource::SavedSearch => Ok(ReportParams::SavedSearch(data_params(fields)?)),
    }
}

fn visual_params(fields: &Fields<'_>) -> Result<VisualReportParams, ValidationError> {
    let url = fields.string("url")?;
    if let Err(err) = Url::parse(url) {
        return Err(ValidationError::new(
            fields.path("url"),
            format!("value [{url}] is not a valid URI: {err}"),
        ));
    }
    let window_width = fields
        .optional_dimension("window_width")?
        .unwrap_or(DEFAULT_WINDOW_WIDTH);
    let window_height = fields
        .optional_dimension("window_height")?
        .unwrap_or(DEFAULT_WINDOW_HEIGHT);
    let report_format = fields.wire_enum::<VisualFormat>("report_format")?;
    fields.deny_unknown(VISUAL_PARAMS_KEYS)?;

    Ok(VisualReportParams {
        url: url.to_string(),
        window_width,
        window_height,
        report_format,
    })
}

fn data_params(fields: &Fields<'_>) -> Result<DataReportParams, ValidationError> {
    let saved_search_id = fields.string("saved_search_id")?;
    let time_range = fields.string("time_range")?;
    let report_format = fields.wire_enum::<DataFormat>("report_format")?;
    fields.deny_unknown(DATA_PARAMS_KEYS)?;

    Ok(DataReportParams {
        saved_search_id: saved_search_id.to_string(),
        time_range: time_range.to_string(),
        report_format,
    })
}

fn delivery(fields: &Fields<'_>) -> Result<Delivery, ValidationError> {
    let channel = fields.wire_enum::<DeliveryChannel>("channel")?;
    let delivery = match channel {
        DeliveryChannel::Email => Delivery::Email(email(&fields.object("delivery_params")?)?),
        DeliveryChannel::Slack | DeliveryChannel::Chime | DeliveryChannel::KibanaUser => {
            return Err(ValidationError::unsupported(
                fields.path("channel"),
                "delivery channel",
                channel.as_str(),
            ));
        }
    };
    fields.deny_unknown(DELIVERY_KEYS)?;
    Ok(delivery)
}

fn email(fields: &Fields<'_>) -> Result<EmailDelivery, ValidationError> {
    let subject = fields.string("subject")?;
    let body = fields.string("body")?;
    let has_attachment = fields.optional_bool("has_attachment")?.unwrap_or(true);

    let recipients_path = fields.path("recipients");
    let entries = fields.array("recipients")?;
    if entries.is_empty() {
        return Err(ValidationError::new(
            recipients_path,
            "array size is [0], but cannot be smaller than [1]",
        ));
    }
    let mut recipients = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let entry_path = format!("{recipients_path}.{index}");
        let address = entry
            .as_str()
            .ok_or_else(|| ValidationError::wrong_type(&entry_path, "string", type_name(entry)))?;
        if !EMAIL_ADDRESS.is_match(address) {
            return Err(ValidationError::new(
                entry_path,
                format!("value [{address}] is not a valid email address"),
            ));
        }
        recipients.push(address.to_string());
    }
    fields.deny_unknown(EMAIL_KEYS)?;

    Ok(EmailDelivery {
        subject: subject.to_string(),
        body: body.to_string(),
        has_attachment,
        recipients,
    })
}

fn trigger(fields: &Fields<'_>) -> Result<Trigger, ValidationError> {
    let trigger_type = fields.wire_enum::<TriggerType>("trigger_type")?;
    let trigger = match trigger_type {
        TriggerType::Schedule => Trigger::Schedule(schedule(&fields.object("trigger_params")?)?),
        TriggerType::Alert => {
            return Err(ValidationError::unsupported(
                fields.path("trigger_type"),
                "trigger type",
                trigger_type.as_str(),
            ));
        }
    };
    fields.deny_unknown(TRIGGER_KEYS)?;
    Ok(trigger)
}

fn schedule(fields: &Fields<'_>) -> Result<Schedule, ValidationError> {
    let schedule_type = fields.wire_enum::<ScheduleType>("schedule_type")?;
    let schedule = match schedule_type {
        ScheduleType::Now => Schedule::Now {
            schedule: fields.optional("schedule").cloned(),
        },
        ScheduleType::FutureDate => Schedule::FutureDate {
            schedule: fields.optional("schedule").cloned(),
        },
        ScheduleType::Recurring => {
            let schedule = fields.object("schedule")?;
            let interval = interval(&schedule.object("interval")?)?;
            schedule.deny_unknown(RECURRING_KEYS)?;
            Schedule::Recurring(interval)
        }
        ScheduleType::CronBased => {
            let schedule = fields.object("schedule")?;
            let cron = cron(&schedule.object("cron")?)?;
            schedule.deny_unknown(CRON_SCHEDULE_KEYS)?;
            Schedule::CronBased(cron)
        }
    };
    fields.deny_unknown(SCHEDULE_KEYS)?;
    Ok(schedule)
}

fn interval(fields: &Fields<'_>) -> Result<IntervalSchedule, ValidationError> {
    let period = fields.number("period")?;
    let unit = fields.wire_enum::<IntervalUnit>("unit")?;
    let start_time = fields.number("start_time")?;
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    let in_range = start_time >= i64::MIN as f64 && start_time < i64::MAX as f64;
    if start_time.fract() != 0.0 || !in_range {
        return Err(ValidationError::new(
            fields.path("start_time"),
            format!("value [{start_time}] is not an epoch timestamp in milliseconds"),
        ));
    }
    fields.deny_unknown(INTERVAL_KEYS)?;

    Ok(IntervalSchedule {
        period,
        unit,
        start_time: start_time as i64,
    })
}

fn cron(fields: &Fields<'_>) -> Result<CronSchedule, ValidationError> {
    let expression = fields.string("expression")?;
    let expression = CronExpression::parse(expression)
        .map_err(|err| ValidationError::new(fields.path("expression"), err.to_string()))?;
    let time_zone = fields.string("time_zone")?;
    if time_zone.trim().is_empty() {
        return Err(ValidationError::new(
            fields.path("time_zone"),
            "value must not be empty",
        ));
    }
    fields.deny_unknown(CRON_KEYS)?;

    Ok(CronSchedule {
        expression,
        time_zone: time_zone.to_string(),
    })
}

/// A JSON object being validated, together with its dotted location.
struct Fields<'a> {
    prefix: String,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    fn root(value: &'a Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Ok(Self {
                prefix: String::new(),
                map,
            }),
            other => Err(ValidationError::wrong_type("", "object", type_name(other))),
        }
    }

    fn path(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.prefix)
        }
    }

    /// A present, non-null value. `null` is treated as absent.
    fn optional(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|value| !value.is_null())
    }

    fn required(&self, key: &str, expected: &str) -> Result<&'a Value, ValidationError> {
        self.optional(key)
            .ok_or_else(|| ValidationError::missing(self.path(key), expected))
    }

    fn string(&self, key: &str) -> Result<&'a str, ValidationError> {
        let value = self.required(key, "string")?;
        value
            .as_str()
            .ok_or_else(|| ValidationError::wrong_type(self.path(key), "string", type_name(value)))
    }

    fn optional_string(&self, key: &str) -> Result<Option<&'a str>, ValidationError> {
        match self.optional(key) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.as_str())),
            Some(other) => Err(ValidationError::wrong_type(
                self.path(key),
                "string",
                type_name(other),
            )),
        }
    }

    fn optional_bool(&self, key: &str) -> Result<Option<bool>, ValidationError> {
        match self.optional(key) {
            None => Ok(None),
            Some(Value::Bool(value)) => Ok(Some(*value)),
            Some(other) => Err(ValidationError::wrong_type(
                self.path(key),
                "boolean",
                type_name(other),
            )),
        }
    }

    /// A finite number, given either as a JSON number or a numeric string.
    fn number(&self, key: &str) -> Result<f64, ValidationError> {
        let value = self.required(key, "number")?;
        number_from(value).ok_or_else(|| {
            ValidationError::wrong_type(self.path(key), "number", type_name(value))
        })
    }

    /// A window dimension in pixels; must be a positive whole number.
    fn optional_dimension(&self, key: &str) -> Result<Option<u32>, ValidationError> {
        let Some(value) = self.optional(key) else {
            return Ok(None);
        };
        let number = number_from(value).ok_or_else(|| {
            ValidationError::wrong_type(self.path(key), "number", type_name(value))
        })?;
        if number.fract() != 0.0 || number < 1.0 || number > f64::from(u32::MAX) {
            return Err(ValidationError::new(
                self.path(key),
                format!("value [{number}] must be a positive whole number of pixels"),
            ));
        }
        Ok(Some(number as u32))
    }

    fn wire_enum<T: WireEnum>(&self, key: &str) -> Result<T, ValidationError> {
        let raw = self.string(key)?;
        T::parse(raw).ok_or_else(|| {
            ValidationError::new(
                self.path(key),
                format!("expected one of [{}] but got [{raw}]", T::expected()),
            )
        })
    }

    fn array(&self, key: &str) -> Result<&'a Vec<Value>, ValidationError> {
        let value = self.required(key, "array")?;
        value
            .as_array()
            .ok_or_else(|| ValidationError::wrong_type(self.path(key), "array", type_name(value)))
    }

    fn object(&self, key: &str) -> Result<Fields<'a>, ValidationError> {
        let value = self.required(key, "object")?;
        self.nested(key, value)
    }

    fn optional_object(&self, key: &str) -> Result<Option<Fields<'a>>, ValidationError> {
        self.optional(key)
            .map(|value| self.nested(key, value))
            .transpose()
    }

    fn nested(&self, key: &str, value: &'a Value) -> Result<Fields<'a>, ValidationError> {
        match value {
            Value::Object(map) => Ok(Fields {
                prefix: self.path(key),
                map,
            }),
            other => Err(ValidationError::wrong_type(
                self.path(key),
                "object",
                type_name(other),
            )),
        }
    }

    fn deny_unknown(&self, allowed: &[&str]) -> Result<(), ValidationError> {
        match self.map.keys().find(|key| !allowed.contains(&key.as_str())) {
            Some(key) => Err(ValidationError::unknown_key(self.path(key))),
            None => Ok(()),
        }
    }
}

fn number_from(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
