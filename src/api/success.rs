use actix_web::{http::StatusCode, HttpResponse};
use serde_json::{json, Value};
use std::borrow::Cow;

#[derive(serde::Serialize)]
pub struct Results<T: serde::Serialize> {
    pub data: Option<T>,
}

/// Response envelope: `{message, results: {data}, status, errors}`.
#[derive(serde::Serialize)]
pub struct SuccessData<T: serde::Serialize> {
    pub message: Cow<'static, str>,
    pub results: Results<T>,
    pub status: u16,
    pub errors: Value,
}

pub struct Success<T: serde::Serialize> {
    pub status: StatusCode,
    pub body: Option<SuccessData<T>>,
}

impl<T: serde::Serialize> Success<T> {
    fn with_status(status: StatusCode, data: Option<T>) -> Self {
        Self {
            status,
            body: Some(SuccessData {
                message: Cow::Borrowed(""),
                results: Results { data },
                status: status.as_u16(),
                errors: json!({ "message": {} }),
            }),
        }
    }

    pub fn ok(data: Option<T>) -> Self {
        Self::with_status(StatusCode::OK, data)
    }

    pub fn created(data: Option<T>) -> Self {
        Self::with_status(StatusCode::CREATED, data)
    }

    pub fn no_content() -> Self {
        Self { status: StatusCode::NO_CONTENT, body: None }
    }

    pub fn message<M>(mut self, msg: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        if let Some(body) = &mut self.body {
            body.message = msg.into();
        }
        self
    }
}

impl<T: serde::Serialize> actix_web::Responder for Success<T> {
    type Body = actix_web::body::BoxBody;

    fn respond_to(self, _req: &actix_web::HttpRequest) -> HttpResponse<Self::Body> {
        let mut response = HttpResponse::build(self.status);

        match self.body {
            Some(body) => response.json(body),
            None => response.finish(),
        }
    }
}
