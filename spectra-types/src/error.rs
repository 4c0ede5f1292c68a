use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the spectra workspace.
///
/// This covers structured rejections reported by the analysis service,
/// transport failures, malformed data, the stationarity precondition and
/// connector-tagged failures.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SpectraError {
    /// The analysis service rejected the input and explained why.
    ///
    /// The service responds with a list of human-readable messages; the first
    /// one is what users see.
    #[error("{}", .messages.first().map_or("analysis service rejected the request", String::as_str))]
    Service {
        /// Messages reported by the service, in service order.
        messages: Vec<String>,
    },

    /// Any other failure while talking to a remote endpoint. Displayed verbatim.
    #[error("{0}")]
    Transport(String),

    /// Issues with the returned or expected data (missing columns, bad numbers, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A candidate series is stationary and cannot enter the linear combination.
    #[error("«{label}» является стационарным временным рядом")]
    StationarySeries {
        /// Display label of the offending instrument (or its code when unknown).
        label: String,
    },

    /// The file strategy was selected without an uploaded document.
    #[error("Не выбран файл с данными")]
    NoFile,

    /// A resource or instrument could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of missing resource, e.g. "candles for GAZP".
        what: String,
    },

    /// An individual connector returned an error.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A remote call exceeded the configured deadline.
    #[error("request timed out: {capability}")]
    RequestTimeout {
        /// Capability label for which the request timed out.
        capability: String,
    },
}

impl SpectraError {
    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `StationarySeries` rejection for the given label.
    pub fn stationary(label: impl Into<String>) -> Self {
        Self::StationarySeries {
            label: label.into(),
        }
    }

    /// Helper: build a `RequestTimeout` error.
    pub fn request_timeout(capability: impl Into<String>) -> Self {
        Self::RequestTimeout {
            capability: capability.into(),
        }
    }

    /// The single string shown to users when a pipeline run fails.
    ///
    /// Structured service rejections surface their first message; every other
    /// error surfaces its own display text.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Service { messages } if !messages.is_empty() => messages[0].clone(),
            other => other.to_string(),
        }
    }

    /// Returns true if the error was reported by the analysis service as a
    /// structured validation failure.
    #[must_use]
    pub const fn is_service_rejection(&self) -> bool {
        matches!(self, Self::Service { .. })
    }
}
