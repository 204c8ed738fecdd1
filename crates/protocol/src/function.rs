//! Typed function calls.
//!
//! Raw events carry parameters as an untyped name/value list. [`FunctionCall::from_event`]
//! validates that list once, applies session-attribute overrides and parses dates, so the
//! handlers behind it only ever see complete, typed requests.

use crate::event::ActionEvent;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session attribute that overrides any `citizen_id` parameter.
pub const SESSION_CITIZEN_ID: &str = "citizenID";
/// Session attribute that overrides any `district_id` parameter.
pub const SESSION_DISTRICT_ID: &str = "districtID";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Longest availability window, in days after `start_date`.
pub const MAX_AVAILABILITY_WINDOW_DAYS: i64 = 366;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Missing mandatory parameters for {function}: {}", missing.join(", "))]
    MissingParameters {
        function: String,
        missing: Vec<String>,
    },

    #[error("Invalid parameter {name}={value:?} for {function}: {reason}")]
    InvalidParameter {
        function: String,
        name: String,
        value: String,
        reason: String,
    },
}

impl RequestError {
    pub const fn code(&self) -> &'static str {
        match self {
            RequestError::UnknownFunction(_) => "unknown_function",
            RequestError::MissingParameters { .. } => "missing_parameters",
            RequestError::InvalidParameter { .. } => "invalid_parameter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FunctionName {
    GetGarbagePickupDay,
    ScheduleBulkPickup,
    GetAvailableParkDays,
    BookPark,
    StartNewForm,
    GetFormFields,
    SubmitForm,
    UpdateFormField,
}

impl FunctionName {
    pub const ALL: [FunctionName; 8] = [
        FunctionName::GetGarbagePickupDay,
        FunctionName::ScheduleBulkPickup,
        FunctionName::GetAvailableParkDays,
        FunctionName::BookPark,
        FunctionName::StartNewForm,
        FunctionName::GetFormFields,
        FunctionName::SubmitForm,
        FunctionName::UpdateFormField,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            FunctionName::GetGarbagePickupDay => "get_garbage_pickup_day",
            FunctionName::ScheduleBulkPickup => "schedule_bulk_pickup",
            FunctionName::GetAvailableParkDays => "get_available_park_days",
            FunctionName::BookPark => "book_park",
            FunctionName::StartNewForm => "start_new_form",
            FunctionName::GetFormFields => "get_form_fields",
            FunctionName::SubmitForm => "submit_form",
            FunctionName::UpdateFormField => "update_form_field",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == raw)
    }

    /// Action group the function belongs to.
    pub const fn action_group(self) -> &'static str {
        match self {
            FunctionName::GetGarbagePickupDay | FunctionName::ScheduleBulkPickup => "garbage",
            FunctionName::GetAvailableParkDays | FunctionName::BookPark => "park_reservation",
            FunctionName::StartNewForm
            | FunctionName::GetFormFields
            | FunctionName::SubmitForm
            | FunctionName::UpdateFormField => "forms",
        }
    }

    pub const fn required_parameters(self) -> &'static [&'static str] {
        match self {
            FunctionName::GetGarbagePickupDay => &["district_id"],
            FunctionName::ScheduleBulkPickup => &["citizen_id", "pickup_date", "garbage_route"],
            FunctionName::GetAvailableParkDays => &["park_id", "start_date", "end_date"],
            FunctionName::BookPark => &["citizen_id", "park_id", "reservation_date"],
            FunctionName::StartNewForm => &["form_template_id", "citizen_id"],
            FunctionName::GetFormFields => &["form_template_id"],
            FunctionName::SubmitForm => &["form_template_id", "citizen_id", "version_id"],
            FunctionName::UpdateFormField => &[
                "form_template_id",
                "citizen_id",
                "version_id",
                "form_field_id",
                "form_field_value",
            ],
        }
    }
}

impl std::fmt::Display for FunctionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionCall {
    GetGarbagePickupDay {
        district_id: String,
    },
    ScheduleBulkPickup {
        citizen_id: String,
        pickup_date: NaiveDate,
        garbage_route: String,
    },
    GetAvailableParkDays {
        park_id: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    BookPark {
        citizen_id: String,
        park_id: String,
        reservation_date: NaiveDate,
    },
    StartNewForm {
        form_template_id: String,
        citizen_id: String,
    },
    GetFormFields {
        form_template_id: String,
    },
    SubmitForm {
        form_template_id: String,
        citizen_id: String,
        version_id: String,
    },
    UpdateFormField {
        form_template_id: String,
        citizen_id: String,
        version_id: String,
        form_field_id: String,
        form_field_value: String,
    },
}

impl FunctionCall {
    pub const fn name(&self) -> FunctionName {
        match self {
            FunctionCall::GetGarbagePickupDay { .. } => FunctionName::GetGarbagePickupDay,
            FunctionCall::ScheduleBulkPickup { .. } => FunctionName::ScheduleBulkPickup,
            FunctionCall::GetAvailableParkDays { .. } => FunctionName::GetAvailableParkDays,
            FunctionCall::BookPark { .. } => FunctionName::BookPark,
            FunctionCall::StartNewForm { .. } => FunctionName::StartNewForm,
            FunctionCall::GetFormFields { .. } => FunctionName::GetFormFields,
            FunctionCall::SubmitForm { .. } => FunctionName::SubmitForm,
            FunctionCall::UpdateFormField { .. } => FunctionName::UpdateFormField,
        }
    }

    pub fn from_event(event: &ActionEvent) -> Result<Self, RequestError> {
        let function = FunctionName::parse(&event.function)
            .ok_or_else(|| RequestError::UnknownFunction(event.function.clone()))?;
        let mut params = Extractor::new(event, function);

        let call = match function {
            FunctionName::GetGarbagePickupDay => {
                let district_id = params.overridable("district_id", SESSION_DISTRICT_ID);
                params.finish()?;
                FunctionCall::GetGarbagePickupDay { district_id }
            }
            FunctionName::ScheduleBulkPickup => {
                let citizen_id = params.overridable("citizen_id", SESSION_CITIZEN_ID);
                let pickup_date = params.required("pickup_date");
                let garbage_route = params.required("garbage_route");
                let params = params.finish()?;
                FunctionCall::ScheduleBulkPickup {
                    citizen_id,
                    pickup_date: params.date("pickup_date", &pickup_date)?,
                    garbage_route,
                }
            }
            FunctionName::GetAvailableParkDays => {
                let park_id = params.required("park_id");
                let start_date = params.required("start_date");
                let end_date = params.required("end_date");
                let params = params.finish()?;
                let start = params.date("start_date", &start_date)?;
                let end = params.date("end_date", &end_date)?;
                if (end - start).num_days() > MAX_AVAILABILITY_WINDOW_DAYS {
                    return Err(params.invalid(
                        "end_date",
                        &end_date,
                        format!("window is longer than {MAX_AVAILABILITY_WINDOW_DAYS} days"),
                    ));
                }
                FunctionCall::GetAvailableParkDays {
                    park_id,
                    start_date: start,
                    end_date: end,
                }
            }
            FunctionName::BookPark => {
                let citizen_id = params.overridable("citizen_id", SESSION_CITIZEN_ID);
                let park_id = params.required("park_id");
                let reservation_date = params.required("reservation_date");
                let params = params.finish()?;
                FunctionCall::BookPark {
                    citizen_id,
                    park_id,
                    reservation_date: params.date("reservation_date", &reservation_date)?,
                }
            }
            FunctionName::StartNewForm => {
                let form_template_id = params.required("form_template_id");
                let citizen_id = params.overridable("citizen_id", SESSION_CITIZEN_ID);
                params.finish()?;
                FunctionCall::StartNewForm {
                    form_template_id,
                    citizen_id,
                }
            }
            FunctionName::GetFormFields => {
                let form_template_id = params.required("form_template_id");
                params.finish()?;
                FunctionCall::GetFormFields { form_template_id }
            }
            FunctionName::SubmitForm => {
                let form_template_id = params.required("form_template_id");
                let citizen_id = params.overridable("citizen_id", SESSION_CITIZEN_ID);
                let version_id = params.required("version_id");
                params.finish()?;
                FunctionCall::SubmitForm {
                    form_template_id,
                    citizen_id,
                    version_id,
                }
            }
            FunctionName::UpdateFormField => {
                let form_template_id = params.required("form_template_id");
                let citizen_id = params.overridable("citizen_id", SESSION_CITIZEN_ID);
                let version_id = params.required("version_id");
                let form_field_id = params.required("form_field_id");
                let form_field_value = params.text("form_field_value");
                params.finish()?;
                FunctionCall::UpdateFormField {
                    form_template_id,
                    citizen_id,
                    version_id,
                    form_field_id,
                    form_field_value,
                }
            }
        };
        Ok(call)
    }
}

struct Extractor<'a> {
    event: &'a ActionEvent,
    function: FunctionName,
    missing: Vec<String>,
}

impl<'a> Extractor<'a> {
    fn new(event: &'a ActionEvent, function: FunctionName) -> Self {
        Self {
            event,
            function,
            missing: Vec::new(),
        }
    }

    /// Identifier or date, surrounding whitespace dropped.
    fn required(&mut self, name: &str) -> String {
        self.text(name).trim().to_string()
    }

    /// Free text, kept exactly as sent.
    fn text(&mut self, name: &str) -> String {
        match self.event.parameter(name) {
            Some(value) => value.to_string(),
            None => {
                self.missing.push(name.to_string());
                String::new()
            }
        }
    }

    fn overridable(&mut self, name: &str, session_key: &str) -> String {
        match self.event.session_attribute(session_key) {
            Some(value) => value.to_string(),
            None => self.required(name),
        }
    }

    fn finish(self) -> Result<Self, RequestError> {
        if self.missing.is_empty() {
            return Ok(self);
        }
        Err(RequestError::MissingParameters {
            function: self.function.as_str().to_string(),
            missing: self.missing,
        })
    }

    fn date(&self, name: &str, raw: &str) -> Result<NaiveDate, RequestError> {
        NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| self.invalid(name, raw, e.to_string()))
    }

    fn invalid(&self, name: &str, raw: &str, reason: impl Into<String>) -> RequestError {
        RequestError::InvalidParameter {
            function: self.function.as_str().to_string(),
            name: name.to_string(),
            value: raw.to_string(),
            reason: reason.into(),
        }
    }
}
