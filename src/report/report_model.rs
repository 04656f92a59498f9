use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Report model — the read-only description handed to the report builder
// ============================================================================

/// How much a human is expected to care about a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Required,
    Optional,
    Hidden,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Required => "required",
            Classification::Optional => "optional",
            Classification::Hidden => "hidden",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a form (or a whole page) is for. Shared by `form_purpose` and `page_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    Login,
    Signup,
    Search,
    Listing,
    Mixed,
    Unknown,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Login => "login",
            Purpose::Signup => "signup",
            Purpose::Search => "search",
            Purpose::Listing => "listing",
            Purpose::Mixed => "mixed",
            Purpose::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One input a human may fill in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub tag_name: String,
    pub input_type: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub classification: Classification,
    pub visible: bool,
    pub selector: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub readonly: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    /// Choices offered by a `<select>`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,

    /// Raw `id` attribute, kept for pattern matching only
    #[serde(skip)]
    pub element_id: Option<String>,
    /// Raw `name` attribute, kept for pattern matching only
    #[serde(skip)]
    pub name_attr: Option<String>,
}

impl Field {
    pub fn is_password(&self) -> bool {
        self.input_type == "password"
    }

    pub fn is_required(&self) -> bool {
        self.classification == Classification::Required
    }

    /// Lowercased name attribute, id attribute and label, for keyword matching.
    pub fn search_text(&self) -> String {
        [
            self.name_attr.as_deref(),
            self.element_id.as_deref(),
            self.label.as_deref(),
        ]
        .iter()
        .flatten()
        .map(|s| s.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// One `<option>` of a select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

/// The control most likely to submit a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitElement {
    pub tag: String,
    #[serde(rename = "type")]
    pub control_type: String,
    pub text: String,
}

/// A group of fields submitted together, real `<form>` or virtual.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Form {
    form_id: String,
    #[serde(rename = "form_purpose")]
    purpose: Purpose,
    fields: Vec<Field>,
    #[serde(rename = "submit_element")]
    submit: Option<SubmitElement>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    notes: Vec<String>,
}

impl Form {
    /// Build a form. Returns `None` when `fields` is empty: a form always holds at least one field.
    pub fn new(
        form_id: String,
        fields: Vec<Field>,
        submit: Option<SubmitElement>,
        purpose: Purpose,
        notes: Vec<String>,
    ) -> Option<Self> {
        if fields.is_empty() {
            return None;
        }
        Some(Self {
            form_id,
            purpose,
            fields,
            submit,
            notes,
        })
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn submit(&self) -> Option<&SubmitElement> {
        self.submit.as_ref()
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn required_count(&self) -> usize {
        self.fields.iter().filter(|f| f.is_required()).count()
    }

    pub fn count_by(&self, classification: Classification) -> usize {
        self.fields
            .iter()
            .filter(|f| f.classification == classification)
            .count()
    }
}

/// Page-level result. Totals are computed at assembly and never set independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageReport {
    url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    title: String,
    page_type: Purpose,
    forms: Vec<Form>,
    total_fields: usize,
    total_required: usize,
    total_forms: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis_duration_ms: Option<f64>,
}

impl PageReport {
    pub fn assemble(url: &str, title: &str, page_type: Purpose, forms: Vec<Form>, notes: Vec<String>) -> Self {
        let total_fields = forms.iter().map(|f| f.fields().len()).sum();
        let total_required = forms.iter().map(Form::required_count).sum();
        let total_forms = forms.len();

        Self {
            url: url.to_string(),
            title: title.to_string(),
            page_type,
            forms,
            total_fields,
            total_required,
            total_forms,
            notes,
            timestamp: None,
            analysis_duration_ms: None,
        }
    }

    /// Stamp when the analysis ran and how long it took.
    pub fn with_timing(mut self, timestamp: DateTime<Utc>, duration_ms: f64) -> Self {
        self.timestamp = Some(timestamp);
        self.analysis_duration_ms = Some(duration_ms);
        self
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn analysis_duration_ms(&self) -> Option<f64> {
        self.analysis_duration_ms
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn page_type(&self) -> Purpose {
        self.page_type
    }

    pub fn forms(&self) -> &[Form] {
        &self.forms
    }

    pub fn total_fields(&self) -> usize {
        self.total_fields
    }

    pub fn total_required(&self) -> usize {
        self.total_required
    }

    pub fn total_forms(&self) -> usize {
        self.total_forms
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn all_fields(&self) -> impl Iterator<Item = &Field> {
        self.forms.iter().flat_map(|f| f.fields().iter())
    }

    pub fn to_json_pretty(&self) -> crate::error::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| crate::error::AnalyzerError::JsonSerialize {
            context: "PageReport".into(),
            source: e,
        })
    }
}
