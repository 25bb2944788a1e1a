#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppErrorDetail {
    Message(String),
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },
}

impl std::fmt::Display for AppErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Message(message) => write!(f, "{message}"),
            Self::Io { kind, message } => write!(f, "{kind}: {message}"),
        }
    }
}

impl From<std::io::Error> for AppErrorDetail {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl From<araharu_core::FetchError> for AppErrorDetail {
    fn from(value: araharu_core::FetchError) -> Self {
        Self::Message(value.to_string())
    }
}

impl From<araharu_core::RepositoryParseError> for AppErrorDetail {
    fn from(value: araharu_core::RepositoryParseError) -> Self {
        Self::Message(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    OpenUrlFailed {
        target: &'static str,
        url: String,
        details: AppErrorDetail,
    },
    PromptFailed {
        details: AppErrorDetail,
    },
    UpdateCheckUnavailable {
        details: AppErrorDetail,
    },
}

impl AppError {
    pub fn open_url_failed(
        target: &'static str,
        url: impl Into<String>,
        details: impl Into<AppErrorDetail>,
    ) -> Self {
        Self::OpenUrlFailed {
            target,
            url: url.into(),
            details: details.into(),
        }
    }

    pub fn prompt_failed(details: impl Into<AppErrorDetail>) -> Self {
        Self::PromptFailed {
            details: details.into(),
        }
    }

    pub fn update_check_unavailable(details: impl Into<AppErrorDetail>) -> Self {
        Self::UpdateCheckUnavailable {
            details: details.into(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenUrlFailed {
                target,
                url,
                details,
            } => write!(f, "Failed to open {target} {url}: {details}"),
            Self::PromptFailed { details } => write!(f, "Update prompt failed: {details}"),
            Self::UpdateCheckUnavailable { details } => {
                write!(f, "Update check unavailable: {details}")
            }
        }
    }
}

impl std::error::Error for AppError {}
