// Current-user extraction. The hosted auth backend is out of scope;
// callers identify themselves with an X-User-Id header and the only
// policy anywhere is owner-or-not.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::domain::error::AppError;

#[derive(Debug)]
pub struct CurrentUser(pub String);

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req
            .headers()
            .get("X-User-Id")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| CurrentUser(value.to_string()))
            .ok_or_else(|| AppError::Unauthorized("Missing X-User-Id header".to_string()));

        ready(user)
    }
}
