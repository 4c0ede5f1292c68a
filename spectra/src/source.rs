use spectra_core::{Company, Period, SourceMethod};

/// A user-supplied JSON document holding two named series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// File name as shown to the user.
    pub name: String,
    /// Raw document text.
    pub contents: String,
}

impl UploadedFile {
    /// Wrap an in-memory document.
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// Where a run takes its two series from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRequest {
    /// Query daily closes of two instruments over a lookback period.
    Fetch {
        /// Instrument of series 1.
        first: Company,
        /// Instrument of series 2.
        second: Company,
        /// Lookback ending today.
        period: Period,
    },
    /// Read both series from an uploaded document; `None` when nothing is attached.
    File(Option<UploadedFile>),
}

impl Default for SourceRequest {
    fn default() -> Self {
        Self::Fetch {
            first: Company::Gazp,
            second: Company::Sber,
            period: Period::default(),
        }
    }
}

impl SourceRequest {
    /// The strategy this request selects.
    #[must_use]
    pub const fn method(&self) -> SourceMethod {
        match self {
            Self::Fetch { .. } => SourceMethod::Fetch,
            Self::File(_) => SourceMethod::File,
        }
    }

    /// Whether a front end should allow submitting this request.
    ///
    /// False for the same instrument twice and for a file run without a file.
    /// [`crate::Pipeline::submit`] still accepts such requests.
    #[must_use]
    pub fn is_submittable(&self) -> bool {
        match self {
            Self::Fetch { first, second, .. } => first != second,
            Self::File(file) => file.is_some(),
        }
    }

    pub(crate) fn upload_name(&self) -> Option<String> {
        match self {
            Self::File(Some(f)) => Some(f.name.clone()),
            _ => None,
        }
    }
}

/// How a call to [`crate::Pipeline::submit`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Results were dispatched and the state is `Success`.
    Success,
    /// The state is `Error` with this message.
    Failed(String),
    /// Market data for `code` could not be loaded; the state is back to `Idle`.
    SourceUnavailable {
        /// Code whose series could not be loaded.
        code: String,
    },
    /// A later submit or clear took over; this run wrote nothing after that.
    Superseded,
}
