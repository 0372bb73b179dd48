use clinic::session::Session;

use crate::{Error, Result};

/// Request context built from the session cookies.
#[derive(Clone, Debug)]
pub struct Ctx {
    pub session: Session,
}

impl Ctx {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn token(&self) -> Result<&str> {
        self.session.token().ok_or(Error::LoginRequired)
    }

    pub fn user_id(&self) -> Result<i64> {
        self.session.user_id.ok_or(Error::LoginRequired)
    }
}
