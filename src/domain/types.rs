//! Enumerations whose spellings are fixed by the persisted report definition format.

use std::fmt;

/// An enum that crosses the wire as one of a closed set of literal strings.
pub trait WireEnum: Copy + Sized + 'static {
    /// Every variant, in the order they are listed in error messages.
    const VARIANTS: &'static [Self];

    fn as_str(self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|variant| variant.as_str() == value)
    }

    /// Render the accepted spellings as `A, B, C` for diagnostics.
    fn expected() -> String {
        Self::VARIANTS
            .iter()
            .map(|variant| variant.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportSource {
    Dashboard,
    Visualization,
    SavedSearch,
}

impl WireEnum for ReportSource {
    const VARIANTS: &'static [Self] = &[
        ReportSource::Dashboard,
        ReportSource::Visualization,
        ReportSource::SavedSearch,
    ];

    fn as_str(self) -> &'static str {
        match self {
            ReportSource::Dashboard => "Dashboard",
            ReportSource::Visualization => "Visualization",
            ReportSource::SavedSearch => "Saved Search",
        }
    }
}

/// Output formats for screen-captured sources (dashboards and visualizations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualFormat {
    Pdf,
    Png,
}

impl WireEnum for VisualFormat {
    const VARIANTS: &'static [Self] = &[VisualFormat::Pdf, VisualFormat::Png];

    fn as_str(self) -> &'static str {
        match self {
            VisualFormat::Pdf => "pdf",
            VisualFormat::Png => "png",
        }
    }
}

/// Output formats for tabular sources (saved searches).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFormat {
    Csv,
    Xlsx,
}

impl WireEnum for DataFormat {
    const VARIANTS: &'static [Self] = &[DataFormat::Csv, DataFormat::Xlsx];

    fn as_str(self) -> &'static str {
        match self {
            DataFormat::Csv => "csv",
            DataFormat::Xlsx => "xlsx",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryChannel {
    Email,
    Slack,
    Chime,
    KibanaUser,
}

impl WireEnum for DeliveryChannel {
    const VARIANTS: &'static [Self] = &[
        DeliveryChannel::Email,
        DeliveryChannel::Slack,
        DeliveryChannel::Chime,
        DeliveryChannel::KibanaUser,
    ];

    fn as_str(self) -> &'static str {
        match self {
            DeliveryChannel::Email => "Email",
            DeliveryChannel::Slack => "Slack",
            DeliveryChannel::Chime => "Chime",
            DeliveryChannel::KibanaUser => "Kibana User",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerType {
    Alert,
    Schedule,
}

impl WireEnum for TriggerType {
    const VARIANTS: &'static [Self] = &[TriggerType::Alert, TriggerType::Schedule];

    fn as_str(self) -> &'static str {
        match self {
            TriggerType::Alert => "Alert",
            TriggerType::Schedule => "Schedule",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleType {
    Now,
    FutureDate,
    Recurring,
    CronBased,
}

impl WireEnum for ScheduleType {
    const VARIANTS: &'static [Self] = &[
        ScheduleType::Now,
        ScheduleType::FutureDate,
        ScheduleType::Recurring,
        ScheduleType::CronBased,
    ];

    fn as_str(self) -> &'static str {
        match self {
            ScheduleType::Now => "Now",
            ScheduleType::FutureDate => "Future Date",
            ScheduleType::Recurring => "Recurring",
            ScheduleType::CronBased => "Cron Based",
        }
    }
}

/// Interval units understood by the job scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalUnit {
    Minutes,
    Hours,
    Days,
}

impl WireEnum for IntervalUnit {
    const VARIANTS: &'static [Self] = &[
        IntervalUnit::Minutes,
        IntervalUnit::Hours,
        IntervalUnit::Days,
    ];

    fn as_str(self) -> &'static str {
        match self {
            IntervalUnit::Minutes => "MINUTES",
            IntervalUnit::Hours => "HOURS",
            IntervalUnit::Days => "DAYS",
        }
    }
}

macro_rules! display_as_wire {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

display_as_wire!(
    ReportSource,
    VisualFormat,
    DataFormat,
    DeliveryChannel,
    TriggerType,
    ScheduleType,
    IntervalUnit,
);
