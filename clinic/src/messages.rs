use dto::problem::ProblemDetail;

pub const UNEXPECTED: &str = "Ocurrió un error inesperado. Por favor, intentá nuevamente.";
pub const CONNECTION: &str = "No se pudo conectar con el servidor. Verificá tu conexión a internet.";
pub const SESSION_EXPIRED: &str = "Tu sesión expiró. Por favor, iniciá sesión nuevamente.";
pub const BAD_CREDENTIALS: &str = "Usuario o contraseña incorrectos.";
pub const FORBIDDEN: &str = "No tenés permisos para realizar esta acción.";
pub const NOT_FOUND: &str = "No se encontró la información solicitada.";
pub const INVALID_DATA: &str =
    "Los datos ingresados no son válidos. Por favor, verificá todos los campos.";
pub const DUPLICATE: &str =
    "Esta información ya está registrada en el sistema. Por favor, verificá los datos ingresados.";
pub const SERVER_ERROR: &str =
    "Ocurrió un error en el servidor. Por favor, intentá nuevamente más tarde.";
pub const LAST_ADMIN: &str = "No se puede dar de baja al último administrador activo. Debe quedar al menos un administrador en el sistema.";
pub const EMAIL_NOT_VERIFIED: &str = "Tu email no ha sido verificado. Verificá tu bandeja de entrada o corregí tu email si te equivocaste.";
const PROCESSING: &str = "Ocurrió un error al procesar la solicitud. Por favor, intentá nuevamente.";

/// Body of a failed backend response
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Problem(ProblemDetail),
    Text(String),
}

/// Everything known about a failed backend call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiFailure {
    pub status: Option<u16>,
    pub body: Option<ErrorBody>,

    /// The request never got a response
    pub transport: bool,
}

impl ApiFailure {
    /// Classifies a raw response body. JSON objects are read as problem
    /// details, anything else non-blank is kept as text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let trimmed = body.trim();
        let body = if trimmed.is_empty() {
            None
        } else if trimmed.starts_with('{') {
            match serde_json::from_str::<ProblemDetail>(trimmed) {
                Ok(problem) => Some(ErrorBody::Problem(problem)),
                Err(_) => Some(ErrorBody::Text(trimmed.to_string())),
            }
        } else {
            Some(ErrorBody::Text(trimmed.to_string()))
        };

        ApiFailure {
            status: Some(status),
            body,
            transport: false,
        }
    }

    pub fn transport() -> Self {
        ApiFailure {
            status: None,
            body: None,
            transport: true,
        }
    }
}

/// Turns a backend failure into a Spanish message for the user.
///
/// Precedence: problem `detail` (or `message`), problem `title`, plain text
/// body, transport failure, then the status code alone.
pub fn friendly_message(failure: &ApiFailure) -> String {
    let status = failure.status;

    match &failure.body {
        Some(ErrorBody::Problem(problem)) => {
            let detail = problem
                .detail
                .as_deref()
                .filter(|d| !d.is_empty())
                .or(problem.message.as_deref())
                .unwrap_or("");

            if !detail.trim().is_empty() {
                let translated = translate_detail(detail, status);
                if mentions_last_admin(&translated) || mentions_last_admin(detail) {
                    return translated;
                }
                if is_plain_spanish(detail) {
                    return detail.to_string();
                }
                return translated;
            }

            let title = problem.title.as_deref().unwrap_or("");
            if !title.trim().is_empty() {
                return translate_title(title, status).to_string();
            }
        }
        Some(ErrorBody::Text(text)) if !text.trim().is_empty() => {
            return translate_detail(text, status);
        }
        Some(ErrorBody::Text(_)) => {}
        None => {
            if failure.transport {
                return CONNECTION.to_string();
            }
        }
    }

    match status {
        Some(status) => by_status(status).to_string(),
        None => UNEXPECTED.to_string(),
    }
}

/// A 403 whose problem body says the email has not been verified.
pub fn is_email_not_verified(failure: &ApiFailure) -> bool {
    if failure.status != Some(403) {
        return false;
    }
    match &failure.body {
        Some(ErrorBody::Problem(problem)) => {
            let title = problem.title.as_deref().unwrap_or("").to_lowercase();
            let detail = problem.detail.as_deref().unwrap_or("").to_lowercase();
            title.contains("email not verified")
                || (detail.contains("email") && detail.contains("verific"))
        }
        _ => false,
    }
}

pub fn by_status(status: u16) -> &'static str {
    match status {
        400 => INVALID_DATA,
        401 => SESSION_EXPIRED,
        403 => FORBIDDEN,
        404 => NOT_FOUND,
        409 => DUPLICATE,
        500 => SERVER_ERROR,
        _ => UNEXPECTED,
    }
}

fn mentions_last_admin(value: &str) -> bool {
    value.contains("último administrador") || value.contains("debe quedar")
}

/// Short backend text already written in Spanish for the user
fn is_plain_spanish(detail: &str) -> bool {
    detail.chars().count() < 200
        && !detail.contains("http://")
        && !detail.contains("localhost")
        && (detail.contains("último")
            || detail.contains("administrador")
            || detail.contains("debe quedar"))
}

fn translate_detail(detail: &str, status: Option<u16>) -> String {
    let lower = detail.to_lowercase();
    let conflict = status == Some(409);

    if conflict
        && (lower.contains("no se puede crear un diagnóstico")
            || (lower.contains("diagnóstico")
                && (lower.contains("antes") || lower.contains("después") || lower.contains("hora"))))
    {
        if lower.contains("no se puede crear un diagnóstico antes de que comience la cita") {
            return "No se puede crear un diagnóstico antes de que comience la cita.".to_string();
        }
        if lower.contains("no se puede crear un diagnóstico después de 1 hora") {
            return "No se puede crear un diagnóstico después de 1 hora de haber terminado la cita."
                .to_string();
        }
        return detail.to_string();
    }

    if conflict
        && (lower.contains("último administrador")
            || lower.contains("last admin")
            || lower.contains("debe quedar al menos un administrador")
            || lower.contains("no se puede dar de baja"))
    {
        return LAST_ADMIN.to_string();
    }

    if conflict || lower.contains("duplicate") || lower.contains("already exists") {
        let message = if lower.contains("username") {
            "El nombre de usuario ya existe. Por favor, elegí otro."
        } else if lower.contains("email") {
            "El email ya está registrado. Por favor, usá otro email."
        } else if lower.contains("dni") {
            "El DNI ya está registrado. Por favor, verificá los datos ingresados."
        } else {
            DUPLICATE
        };
        return message.to_string();
    }

    if status == Some(401) || lower.contains("authentication") || lower.contains("unauthorized") {
        return BAD_CREDENTIALS.to_string();
    }

    if status == Some(400) || lower.contains("invalid") || lower.contains("validation") {
        // "surname" contains "name", check it first
        let message = if lower.contains("surname") {
            "El apellido ingresado no es válido."
        } else if lower.contains("name") {
            "El nombre ingresado no es válido."
        } else if lower.contains("phone") {
            "El teléfono ingresado no es válido."
        } else if lower.contains("dni") {
            "El DNI ingresado no es válido."
        } else if lower.contains("email") {
            "El email ingresado no es válido."
        } else if lower.contains("password") {
            "La contraseña no cumple con los requisitos."
        } else {
            INVALID_DATA
        };
        return message.to_string();
    }

    if status == Some(403) {
        if lower.contains("email") && lower.contains("verific") {
            return detail.to_string();
        }
        return FORBIDDEN.to_string();
    }
    if lower.contains("forbidden") || lower.contains("access denied") {
        return FORBIDDEN.to_string();
    }

    if status == Some(404) || lower.contains("not found") {
        return NOT_FOUND.to_string();
    }

    if status == Some(500) || lower.contains("internal server error") {
        return SERVER_ERROR.to_string();
    }

    if is_plain_spanish(detail)
        && !lower.contains("timestamp")
        && !lower.contains("instance")
        && !lower.contains("type")
        && !lower.contains("problemdetail")
    {
        return detail.to_string();
    }

    PROCESSING.to_string()
}

fn translate_title(title: &str, status: Option<u16>) -> &'static str {
    let lower = title.to_lowercase();

    if status == Some(409) && (lower.contains("last admin") || lower.contains("último administrador"))
    {
        return LAST_ADMIN;
    }
    if lower.contains("data integrity violation") {
        return "Esta información ya está registrada en el sistema.";
    }
    if lower.contains("user exists") {
        return "El usuario ya existe.";
    }
    if lower.contains("invalid") {
        return "Los datos ingresados no son válidos.";
    }
    if lower.contains("authentication failed") {
        return BAD_CREDENTIALS;
    }
    if lower.contains("not found") {
        return NOT_FOUND;
    }

    "Ocurrió un error al procesar la solicitud."
}
