//! RFC 7807 Problem Details for HTTP APIs (pure data model, no HTTP framework dependencies)

use http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::catalog::ProblemType;
use crate::error::ProblemError;
use crate::status::{checked_status, title_for};

/// Content type for Problem Details as per RFC 7807.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// Default problem type when none is set.
pub const ABOUT_BLANK: &str = "about:blank";

/// Extension key carrying the occurrence-specific explanation.
pub const DETAIL: &str = "detail";

/// Extension key carrying per-field validation messages.
pub const ERRORS: &str = "errors";

/// Field names owned by the problem itself; extensions may not use them.
pub const RESERVED_FIELDS: [&str; 3] = ["status", "title", "type"];

/// Custom serializer for `StatusCode` to u16
#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
fn serialize_status_code<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

/// Custom deserializer for `StatusCode` from u16, restricted to 100-599
fn deserialize_status_code<'de, D>(deserializer: D) -> Result<StatusCode, D::Error>
where
    D: Deserializer<'de>,
{
    let code = u16::deserialize(deserializer)?;
    checked_status(code).map_err(serde::de::Error::custom)
}

/// Custom deserializer for the title; problems never carry an empty one
fn deserialize_title<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let title = String::deserialize(deserializer)?;
    if title.trim().is_empty() {
        return Err(serde::de::Error::custom(ProblemError::EmptyTitle));
    }
    Ok(title)
}

fn about_blank() -> String {
    ABOUT_BLANK.to_owned()
}

/// RFC 7807 Problem Details for HTTP APIs.
///
/// Created once per failure. The status, title and type are fixed at
/// construction; only extension fields may be added afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct ProblemDetail {
    /// The HTTP status code for this occurrence of the problem.
    /// Serializes as u16.
    #[serde(
        serialize_with = "serialize_status_code",
        deserialize_with = "deserialize_status_code"
    )]
    status: StatusCode,
    /// A short, human-readable summary of the problem type.
    #[serde(deserialize_with = "deserialize_title")]
    title: String,
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type", default = "about_blank")]
    type_url: String,
    /// Open-ended extension members, e.g. `detail`.
    #[serde(flatten)]
    extensions: Map<String, Value>,
}

impl ProblemDetail {
    /// Create a problem for the given status code, titled from the status table.
    ///
    /// # Errors
    /// Returns `ProblemError::InvalidStatus` if `status` is outside 100-599.
    pub fn new(status: u16) -> Result<Self, ProblemError> {
        checked_status(status).map(Self::for_checked_status)
    }

    /// Same as [`ProblemDetail::new`] for an already typed status code.
    ///
    /// # Errors
    /// Returns `ProblemError::InvalidStatus` if `status` is above 599.
    pub fn from_status(status: StatusCode) -> Result<Self, ProblemError> {
        Self::new(status.as_u16())
    }

    /// Create a problem, clamping invalid status codes to 500.
    #[must_use]
    pub fn new_or_internal(status: u16) -> Self {
        Self::new(status)
            .unwrap_or_else(|_| Self::for_checked_status(StatusCode::INTERNAL_SERVER_ERROR))
    }

    /// Create a problem of a catalog type; the title comes from the type.
    ///
    /// # Errors
    /// Returns `ProblemError::InvalidStatus` if `status` is outside 100-599.
    pub fn typed(status: u16, problem_type: &ProblemType) -> Result<Self, ProblemError> {
        checked_status(status).map(|status| Self::of_type(status, problem_type))
    }

    pub(crate) fn of_type(status: StatusCode, problem_type: &ProblemType) -> Self {
        Self {
            status,
            title: problem_type.title.to_owned(),
            type_url: problem_type.type_url.to_owned(),
            extensions: Map::new(),
        }
    }

    fn for_checked_status(status: StatusCode) -> Self {
        Self {
            status,
            title: title_for(status).to_owned(),
            type_url: ABOUT_BLANK.to_owned(),
            extensions: Map::new(),
        }
    }

    /// Replace the problem type identifier, keeping the title.
    #[must_use]
    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = type_url.into();
        self
    }

    /// Set the `detail` extension.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.extensions
            .insert(DETAIL.to_owned(), Value::String(detail.into()));
        self
    }

    /// Set the `errors` extension to a field -> message object.
    #[must_use]
    pub fn with_errors<K, V>(mut self, errors: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let errors: Map<String, Value> = errors
            .into_iter()
            .map(|(field, message)| (field.into(), Value::String(message.into())))
            .collect();
        self.extensions.insert(ERRORS.to_owned(), Value::Object(errors));
        self
    }

    /// Builder form of [`ProblemDetail::set_extension`].
    ///
    /// # Errors
    /// See [`ProblemDetail::set_extension`].
    pub fn with_extension(
        mut self,
        key: impl Into<String>,
        value: impl Serialize,
    ) -> Result<Self, ProblemError> {
        self.set_extension(key, value)?;
        Ok(self)
    }

    /// Add or overwrite one extension field.
    ///
    /// # Errors
    /// Returns `ProblemError::ReservedField` when `key` is `status`, `title` or `type`,
    /// and `ProblemError::Extension` when `value` cannot be represented as JSON.
    pub fn set_extension(
        &mut self,
        key: impl Into<String>,
        value: impl Serialize,
    ) -> Result<&mut Self, ProblemError> {
        let key = key.into();
        if RESERVED_FIELDS.contains(&key.as_str()) {
            return Err(ProblemError::ReservedField(key));
        }
        match serde_json::to_value(value) {
            Ok(value) => {
                self.extensions.insert(key, value);
                Ok(self)
            }
            Err(source) => Err(ProblemError::Extension { key, source }),
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn type_url(&self) -> &str {
        &self.type_url
    }

    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.extensions.get(DETAIL).and_then(Value::as_str)
    }

    #[must_use]
    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    #[must_use]
    pub fn extensions(&self) -> &Map<String, Value> {
        &self.extensions
    }

    /// Flatten into `{status, title, type, ...extensions}`, ready for serialization.
    #[must_use]
    pub fn to_mapping(&self) -> Map<String, Value> {
        let mut mapping = self.extensions.clone();
        mapping.insert("status".to_owned(), Value::from(self.status.as_u16()));
        mapping.insert("title".to_owned(), Value::String(self.title.clone()));
        mapping.insert("type".to_owned(), Value::String(self.type_url.clone()));
        mapping
    }
}
