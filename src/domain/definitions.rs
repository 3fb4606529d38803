//! Typed report definitions.
//!
//! Each conditional section of the persisted document (`report_params`,
//! `delivery`, `trigger`) is a tagged union keyed by the sibling enum that
//! selects it. Values of these types only come out of
//! [`validate_definition`](super::validation::validate_definition), so holding
//! one means the document satisfied every shape rule.

use serde_json::Value;

use super::schedule::CronExpression;
use super::types::{
    DataFormat, DeliveryChannel, IntervalUnit, ReportSource, ScheduleType, TriggerType,
    VisualFormat,
};

pub const DEFAULT_WINDOW_WIDTH: u32 = 1200;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 800;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDefinition {
    pub report_name: String,
    pub description: String,
    pub report_params: ReportParams,
    pub delivery: Option<Delivery>,
    pub trigger: Option<Trigger>,
    pub status: Option<String>,
}

impl ReportDefinition {
    pub fn delivery_channel(&self) -> Option<DeliveryChannel> {
        self.delivery.as_ref().map(Delivery::channel)
    }

    pub fn trigger_type(&self) -> Option<TriggerType> {
        self.trigger.as_ref().map(Trigger::trigger_type)
    }

    pub fn schedule_type(&self) -> Option<ScheduleType> {
        self.trigger.as_ref().map(|trigger| match trigger {
            Trigger::Schedule(schedule) => schedule.schedule_type(),
        })
    }
}

/// Source-specific rendering parameters, selected by `report_source`.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportParams {
    Dashboard(VisualReportParams),
    Visualization(VisualReportParams),
    SavedSearch(DataReportParams),
}

impl ReportParams {
    pub fn source(&self) -> ReportSource {
        match self {
            ReportParams::Dashboard(_) => ReportSource::Dashboard,
            ReportParams::Visualization(_) => ReportSource::Visualization,
            ReportParams::SavedSearch(_) => ReportSource::SavedSearch,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisualReportParams {
    /// Absolute URL of the page to capture, stored as submitted.
    pub url: String,
    pub window_width: u32,
    pub window_height: u32,
    pub report_format: VisualFormat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataReportParams {
    pub saved_search_id: String,
    pub time_range: String,
    pub report_format: DataFormat,
}

/// Where a generated report is sent, selected by `delivery.channel`.
///
/// Only channels with a validator appear here; the others are rejected while
/// validating.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Email(EmailDelivery),
}

impl Delivery {
    pub fn channel(&self) -> DeliveryChannel {
        match self {
            Delivery::Email(_) => DeliveryChannel::Email,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailDelivery {
    pub subject: String,
    pub body: String,
    pub has_attachment: bool,
    pub recipients: Vec<String>,
}

/// What starts report generation, selected by `trigger.trigger_type`.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    Schedule(Schedule),
}

impl Trigger {
    pub fn trigger_type(&self) -> TriggerType {
        match self {
            Trigger::Schedule(_) => TriggerType::Schedule,
        }
    }
}

/// Schedule details, selected by `trigger_params.schedule_type`.
///
/// `Now` and `FutureDate` keep whatever `schedule` payload accompanied them.
#[derive(Debug, Clone, PartialEq)]
pub enum Schedule {
    Now { schedule: Option<Value> },
    FutureDate { schedule: Option<Value> },
    Recurring(IntervalSchedule),
    CronBased(CronSchedule),
}

impl Schedule {
    pub fn schedule_type(&self) -> ScheduleType {
        match self {
            Schedule::Now { .. } => ScheduleType::Now,
            Schedule::FutureDate { .. } => ScheduleType::FutureDate,
            Schedule::Recurring(_) => ScheduleType::Recurring,
            Schedule::CronBased(_) => ScheduleType::CronBased,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntervalSchedule {
    pub period: f64,
    pub unit: IntervalUnit,
    /// Epoch milliseconds of the first run.
    pub start_time: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CronSchedule {
    pub expression: CronExpression,
    pub time_zone: String,
}
