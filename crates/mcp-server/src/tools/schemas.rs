use civic_protocol::{FunctionName, SESSION_CITIZEN_ID, SESSION_DISTRICT_ID};
use rmcp::schemars;
use serde::Deserialize;

/// Caller identity carried by the conversation, overriding matching parameters.
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct Session {
    #[schemars(description = "Authenticated citizen; wins over a citizen_id argument")]
    pub citizen_id: Option<String>,

    #[schemars(description = "Citizen's home district; wins over a district_id argument")]
    pub district_id: Option<String>,
}

impl Session {
    pub(super) fn attributes(&self) -> Vec<(&'static str, &str)> {
        let mut attrs = Vec::new();
        if let Some(citizen) = &self.citizen_id {
            attrs.push((SESSION_CITIZEN_ID, citizen.as_str()));
        }
        if let Some(district) = &self.district_id {
            attrs.push((SESSION_DISTRICT_ID, district.as_str()));
        }
        attrs
    }
}

/// A tool request that maps onto one agent function.
pub(super) trait FunctionRequest {
    const FUNCTION: FunctionName;

    fn parameters(&self) -> Vec<(&'static str, &str)>;

    fn session(&self) -> Option<&Session>;
}

fn present<'a>(name: &'static str, value: &'a Option<String>) -> Option<(&'static str, &'a str)> {
    value.as_deref().map(|v| (name, v))
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GarbagePickupDayRequest {
    #[schemars(description = "District identifier, e.g. A1 (optional when the session names one)")]
    pub district_id: Option<String>,

    pub session: Option<Session>,
}

impl FunctionRequest for GarbagePickupDayRequest {
    const FUNCTION: FunctionName = FunctionName::GetGarbagePickupDay;

    fn parameters(&self) -> Vec<(&'static str, &str)> {
        present("district_id", &self.district_id).into_iter().collect()
    }

    fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BulkPickupRequest {
    #[schemars(description = "Requesting citizen (optional when the session names one)")]
    pub citizen_id: Option<String>,

    #[schemars(description = "Pickup day, YYYY-MM-DD")]
    pub pickup_date: String,

    #[schemars(description = "Garbage route name, e.g. Yellow")]
    pub garbage_route: String,

    pub session: Option<Session>,
}

impl FunctionRequest for BulkPickupRequest {
    const FUNCTION: FunctionName = FunctionName::ScheduleBulkPickup;

    fn parameters(&self) -> Vec<(&'static str, &str)> {
        present("citizen_id", &self.citizen_id)
            .into_iter()
            .chain([
                ("pickup_date", self.pickup_date.as_str()),
                ("garbage_route", self.garbage_route.as_str()),
            ])
            .collect()
    }

    fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AvailableParkDaysRequest {
    #[schemars(description = "Park identifier, e.g. P1")]
    pub park_id: String,

    #[schemars(description = "First day of the window, YYYY-MM-DD (inclusive)")]
    pub start_date: String,

    #[schemars(description = "Last day of the window, YYYY-MM-DD (inclusive)")]
    pub end_date: String,
}

impl FunctionRequest for AvailableParkDaysRequest {
    const FUNCTION: FunctionName = FunctionName::GetAvailableParkDays;

    fn parameters(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("park_id", self.park_id.as_str()),
            ("start_date", self.start_date.as_str()),
            ("end_date", self.end_date.as_str()),
        ]
    }

    fn session(&self) -> Option<&Session> {
        None
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BookParkRequest {
    #[schemars(description = "Citizen making the booking (optional when the session names one)")]
    pub citizen_id: Option<String>,

    #[schemars(description = "Park identifier, e.g. P1")]
    pub park_id: String,

    #[schemars(description = "Day to reserve, YYYY-MM-DD")]
    pub reservation_date: String,

    pub session: Option<Session>,
}

impl FunctionRequest for BookParkRequest {
    const FUNCTION: FunctionName = FunctionName::BookPark;

    fn parameters(&self) -> Vec<(&'static str, &str)> {
        present("citizen_id", &self.citizen_id)
            .into_iter()
            .chain([
                ("park_id", self.park_id.as_str()),
                ("reservation_date", self.reservation_date.as_str()),
            ])
            .collect()
    }

    fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StartFormRequest {
    #[schemars(description = "Form template identifier")]
    pub form_template_id: String,

    #[schemars(description = "Citizen filling the form (optional when the session names one)")]
    pub citizen_id: Option<String>,

    pub session: Option<Session>,
}

impl FunctionRequest for StartFormRequest {
    const FUNCTION: FunctionName = FunctionName::StartNewForm;

    fn parameters(&self) -> Vec<(&'static str, &str)> {
        std::iter::once(("form_template_id", self.form_template_id.as_str()))
            .chain(present("citizen_id", &self.citizen_id))
            .collect()
    }

    fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FormFieldsRequest {
    #[schemars(description = "Form template identifier")]
    pub form_template_id: String,
}

impl FunctionRequest for FormFieldsRequest {
    const FUNCTION: FunctionName = FunctionName::GetFormFields;

    fn parameters(&self) -> Vec<(&'static str, &str)> {
        vec![("form_template_id", self.form_template_id.as_str())]
    }

    fn session(&self) -> Option<&Session> {
        None
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SubmitFormRequest {
    #[schemars(description = "Form template identifier")]
    pub form_template_id: String,

    #[schemars(description = "Citizen owning the version (optional when the session names one)")]
    pub citizen_id: Option<String>,

    #[schemars(description = "Version returned by start_new_form")]
    pub version_id: String,

    pub session: Option<Session>,
}

impl FunctionRequest for SubmitFormRequest {
    const FUNCTION: FunctionName = FunctionName::SubmitForm;

    fn parameters(&self) -> Vec<(&'static str, &str)> {
        std::iter::once(("form_template_id", self.form_template_id.as_str()))
            .chain(present("citizen_id", &self.citizen_id))
            .chain([("version_id", self.version_id.as_str())])
            .collect()
    }

    fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateFieldRequest {
    #[schemars(description = "Form template identifier")]
    pub form_template_id: String,

    #[schemars(description = "Citizen owning the version (optional when the session names one)")]
    pub citizen_id: Option<String>,

    #[schemars(description = "Version returned by start_new_form")]
    pub version_id: String,

    #[schemars(description = "Field identifier as listed by get_form_fields")]
    pub form_field_id: String,

    #[schemars(description = "New value for the field")]
    pub form_field_value: String,

    pub session: Option<Session>,
}

impl FunctionRequest for UpdateFieldRequest {
    const FUNCTION: FunctionName = FunctionName::UpdateFormField;

    fn parameters(&self) -> Vec<(&'static str, &str)> {
        std::iter::once(("form_template_id", self.form_template_id.as_str()))
            .chain(present("citizen_id", &self.citizen_id))
            .chain([
                ("version_id", self.version_id.as_str()),
                ("form_field_id", self.form_field_id.as_str()),
                ("form_field_value", self.form_field_value.as_str()),
            ])
            .collect()
    }

    fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngestFormRequest {
    #[schemars(description = "Bucket the pages were uploaded to (the configured ingest bucket wins)")]
    pub bucket: Option<String>,

    #[schemars(description = "Object keys of the blank form pages in page order, URL-encoded as in object-created notifications")]
    pub keys: Vec<String>,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct SeedRequest {}
