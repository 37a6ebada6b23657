use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use strum_macros::Display;
use tracing::warn;

/// The part of the engine a warning was raised from.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Subsystem {
    Occupancy,
    Others,
    #[strum(serialize = "Building standby")]
    BuildingStandby,
    Lighting,
    #[strum(serialize = "Hot water")]
    HotWater,
    Ventilation,
    Cooling,
}

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum WarningKind {
    /// An optional field needed for a calculation was absent.
    MissingInput,
    /// A time window ends before it starts.
    MisconfiguredWindow,
    /// A reference table had no entry for the requested key, or was not available.
    LookupMiss,
}

/// A degraded calculation: the affected quantity was replaced by a fallback (usually 0).
#[derive(Clone, Debug, PartialEq)]
pub struct Warning {
    pub subsystem: Subsystem,
    pub kind: WarningKind,
    pub field: Cow<'static, str>,
    pub message: String,
}

impl Warning {
    pub(crate) fn new(
        subsystem: Subsystem,
        kind: WarningKind,
        field: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            subsystem,
            kind,
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn missing(
        subsystem: Subsystem,
        field: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(subsystem, WarningKind::MissingInput, field, message)
    }
}

impl Display for Warning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} ({}): {}",
            self.subsystem, self.kind, self.field, self.message
        )
    }
}

/// Receiver for warnings raised while a run degrades part of its calculation.
pub trait WarningSink {
    fn record(&mut self, warning: Warning);
}

impl WarningSink for Vec<Warning> {
    fn record(&mut self, warning: Warning) {
        self.push(warning);
    }
}

/// Collects the warnings of a run and mirrors each one to the `tracing` subscriber.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }

    pub fn for_subsystem(&self, subsystem: Subsystem) -> impl Iterator<Item = &Warning> {
        self.warnings
            .iter()
            .filter(move |warning| warning.subsystem == subsystem)
    }
}

impl WarningSink for Diagnostics {
    fn record(&mut self, warning: Warning) {
        warn!(
            subsystem = %warning.subsystem,
            kind = %warning.kind,
            field = %warning.field,
            "{}",
            warning.message
        );
        self.warnings.push(warning);
    }
}

/// Outcome of a calculation step that can fall back without failing the run.
///
/// Steps that can also fail outright return `Result<Resolution<T>, E>`, giving the
/// three tiers resolved, degraded and fatal.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution<T> {
    Resolved(T),
    Degraded(Warning),
}

impl<T> Resolution<T> {
    /// Take the resolved value, or record the warning and use `fallback` instead.
    pub fn or_record(self, fallback: T, sink: &mut dyn WarningSink) -> T {
        match self {
            Resolution::Resolved(value) => value,
            Resolution::Degraded(warning) => {
                sink.record(warning);
                fallback
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Resolution::Degraded(_))
    }
}
