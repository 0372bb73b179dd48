use axum::http::StatusCode;
use axum::{
    body::Body,
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use snafu::{Backtrace, ErrorCompat, Snafu};

use clinic::messages::{ApiFailure, friendly_message};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Error reading config file: {}", source))]
    ConfigFile {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Error parsing config file: {}", source))]
    ConfigParse {
        source: toml::de::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Config error: {}", msg))]
    Config { msg: String },

    #[snafu(display("Unable to bind {}: {}", addr, source))]
    Bind {
        addr: String,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Server error: {}", source))]
    Serve {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("{}", msg))]
    Validation { msg: String },

    #[snafu(display("{}", msg))]
    BadRequest { msg: String },

    #[snafu(display("{}", msg))]
    JsonRejection {
        msg: String,
        source: JsonRejection,
        backtrace: Backtrace,
    },

    /// Backend rejected the call, `message` is already user-facing
    #[snafu(display("{}", message))]
    Api { status: u16, message: String },

    #[snafu(display("{}", message))]
    EmailNotVerified { message: String },

    #[snafu(display("{}", msg))]
    Forbidden { msg: String },

    #[snafu(display("{}", msg))]
    NotFound { msg: String },

    #[snafu(display("{}", msg))]
    Conflict { msg: String },

    #[snafu(display("{}: {}", msg, source))]
    HttpClient {
        msg: String,
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("{}: {}", msg, source))]
    HttpResponseParse {
        msg: String,
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Login to continue"))]
    LoginRequired,

    #[snafu(display("{}", msg))]
    Whatever { msg: String },
}

// Allow string slices to be converted to Error
impl From<&str> for Error {
    fn from(val: &str) -> Self {
        Self::Whatever {
            msg: val.to_string(),
        }
    }
}

impl From<String> for Error {
    fn from(val: String) -> Self {
        Self::Whatever { msg: val }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation {
            msg: dto::validators::flatten_errors(&errors),
        }
    }
}

impl Error {
    /// Message shown to the user
    pub fn user_message(&self) -> String {
        match self {
            Error::HttpClient { .. } => friendly_message(&ApiFailure::transport()),
            Error::LoginRequired => clinic::messages::SESSION_EXPIRED.to_string(),
            Error::Api { .. }
            | Error::EmailNotVerified { .. }
            | Error::Validation { .. }
            | Error::BadRequest { .. }
            | Error::JsonRejection { .. }
            | Error::Forbidden { .. }
            | Error::NotFound { .. }
            | Error::Conflict { .. } => self.to_string(),
            _ => clinic::messages::UNEXPECTED.to_string(),
        }
    }
}

/// Allow Error to be converted to StatusCode
impl From<&Error> for StatusCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::JsonRejection { .. } => StatusCode::BAD_REQUEST,
            Error::Api { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Error::EmailNotVerified { .. } => StatusCode::FORBIDDEN,
            Error::Forbidden { .. } => StatusCode::FORBIDDEN,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Conflict { .. } => StatusCode::CONFLICT,
            Error::HttpClient { .. } => StatusCode::BAD_GATEWAY,
            Error::HttpResponseParse { .. } => StatusCode::BAD_GATEWAY,
            Error::LoginRequired => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Allow errors to be rendered as response
impl IntoResponse for Error {
    fn into_response(self) -> Response<Body> {
        let info = ErrorInfo::from(&self);

        // Build a dummy response, the response mapper renders it
        let mut res = Response::builder()
            .status(info.status_code)
            .body(Body::empty())
            .unwrap_or_default();

        res.extensions_mut().insert(info);
        res
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status_code: u16,
    pub message: String,
    pub error: String,

    #[serde(default)]
    pub email_not_verified: bool,
}

#[derive(Clone, Debug)]
pub struct ErrorInfo {
    pub status_code: StatusCode,
    pub title: String,
    pub message: String,

    /// Internal description, logged for server errors
    pub detail: String,
    pub backtrace: Option<String>,

    /// The backend no longer accepts the session token
    pub login_required: bool,

    pub email_not_verified: bool,
}

impl From<&Error> for ErrorInfo {
    fn from(e: &Error) -> Self {
        let status_code: StatusCode = e.into();
        let backtrace = ErrorCompat::backtrace(e).map(|bt| bt.to_string());
        Self {
            status_code,
            title: status_code
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
            message: e.user_message(),
            detail: e.to_string(),
            backtrace,
            login_required: matches!(e, Error::LoginRequired),
            email_not_verified: matches!(e, Error::EmailNotVerified { .. }),
        }
    }
}

impl From<&ErrorInfo> for ErrorResponse {
    fn from(info: &ErrorInfo) -> Self {
        Self {
            status_code: info.status_code.as_u16(),
            message: info.message.clone(),
            error: info.title.clone(),
            email_not_verified: info.email_not_verified,
        }
    }
}
