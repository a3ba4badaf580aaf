use std::{fmt, marker::PhantomData};

use actix_web::{
    dev::Payload, error::ResponseError, http::StatusCode, web::Bytes, FromRequest, HttpRequest,
    HttpResponse,
};
use futures::future::{FutureExt, LocalBoxFuture};
use secstr::SecStr;

use crate::{
    event::{Provider, PushPayload},
    signature::{self, Signature},
};

/// A verified push webhook of provider `T`.
#[derive(Debug, Clone)]
pub struct Webhook<T>(pub T);

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("failed parsing `{header}`: {source}")]
    SignatureParseError {
        header: &'static str,
        source: signature::Error,
    },
    #[error("signature doesn't match")]
    InvalidSignature,
    #[error("`{0}` isn't found")]
    TokenNotFound(&'static str),
    #[error("token doesn't match")]
    InvalidToken,
    #[error("webhook secret is not specified")]
    NoSecret,
    #[error("HMAC key has invalid length")]
    HmacInvalidLength,
    #[error("`{0}` header isn't found")]
    EventHeaderNotFound(&'static str),
    #[error("ignoring event `{0}`")]
    IgnoredEvent(String),
    #[error("failed reading request data: {0}")]
    ActixError(#[from] actix_web::Error),
    #[error("invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<hmac::crypto_mac::InvalidKeyLength> for WebhookError {
    fn from(_: hmac::crypto_mac::InvalidKeyLength) -> Self {
        Self::HmacInvalidLength
    }
}

impl ResponseError for WebhookError {
    fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::SignatureParseError { .. } => StatusCode::BAD_REQUEST,
            WebhookError::InvalidSignature => StatusCode::FORBIDDEN,
            WebhookError::TokenNotFound(_) => StatusCode::BAD_REQUEST,
            WebhookError::InvalidToken => StatusCode::FORBIDDEN,
            WebhookError::NoSecret => StatusCode::INTERNAL_SERVER_ERROR,
            WebhookError::HmacInvalidLength => StatusCode::INTERNAL_SERVER_ERROR,
            WebhookError::EventHeaderNotFound(_) => StatusCode::BAD_REQUEST,
            WebhookError::IgnoredEvent(_) => StatusCode::ACCEPTED,
            WebhookError::JsonError(_) => StatusCode::BAD_REQUEST,
            WebhookError::ActixError(err) => err.as_response_error().status_code(),
        }
    }

    fn error_response(&self) -> HttpResponse {
        json_error(self.status_code(), self)
    }
}

/// `{"message": ...}` response used for every rejection.
pub fn json_error(status: StatusCode, message: &dyn fmt::Display) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({ "message": message.to_string() }))
}

#[derive(Debug, Default)]
pub struct WebhookConfig {
    pub secret: Option<SecStr>,
}

impl WebhookConfig {
    pub fn new(secret: SecStr) -> Self {
        Self {
            secret: Some(secret),
        }
    }
}

fn authenticate(
    provider: Provider,
    req: &HttpRequest,
    secret: &SecStr,
    body: &[u8],
) -> Result<(), WebhookError> {
    let token = match provider {
        Provider::GitHub | Provider::BitbucketServer => {
            let header = match provider {
                Provider::GitHub => "X-Hub-Signature-256",
                _ => "X-Hub-Signature",
            };
            let signature = Signature::from_headers(req.headers(), header)
                .map_err(|source| WebhookError::SignatureParseError { header, source })?;
            return if signature.matches(secret.unsecure(), body)? {
                Ok(())
            } else {
                Err(WebhookError::InvalidSignature)
            };
        }
        Provider::GitLab => req
            .headers()
            .get("X-Gitlab-Token")
            .map(|value| value.as_bytes().to_vec())
            .ok_or(WebhookError::TokenNotFound("X-Gitlab-Token header"))?,
        Provider::Bitbucket => url::form_urlencoded::parse(req.query_string().as_bytes())
            .find(|(name, _)| name == "token")
            .map(|(_, value)| value.into_owned().into_bytes())
            .ok_or(WebhookError::TokenNotFound("token query parameter"))?,
    };

    if SecStr::new(token) == *secret {
        Ok(())
    } else {
        Err(WebhookError::InvalidToken)
    }
}

fn check_event(provider: Provider, req: &HttpRequest) -> Result<(), WebhookError> {
    let header = provider.event_header();
    let event = req
        .headers()
        .get(header)
        .ok_or(WebhookError::EventHeaderNotFound(header))?;
    let event = String::from_utf8_lossy(event.as_bytes());
    if event != provider.push_event() {
        return Err(WebhookError::IgnoredEvent(event.into_owned()));
    }
    Ok(())
}

struct Extract<T>(PhantomData<T>);

impl<T: PushPayload> Extract<T> {
    fn run(req: &HttpRequest, bytes: &[u8]) -> Result<Webhook<T>, WebhookError> {
        let secret = req
            .app_data::<WebhookConfig>()
            .and_then(|config| config.secret.as_ref())
            .ok_or(WebhookError::NoSecret)?;

        authenticate(T::PROVIDER, req, secret, bytes)?;
        check_event(T::PROVIDER, req)?;

        Ok(Webhook(serde_json::from_slice(bytes)?))
    }
}

impl<T> FromRequest for Webhook<T>
where
    T: PushPayload + 'static,
{
    type Error = WebhookError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;
    type Config = WebhookConfig;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(Bytes::from_request(&req, payload).map(
            move |bytes| -> Result<Self, Self::Error> {
                let res = bytes
                    .map_err(WebhookError::from)
                    .and_then(|bytes| Extract::<T>::run(&req, &bytes));

                if let Err(err) = &res {
                    let provider = T::PROVIDER.to_string();
                    match err {
                        WebhookError::IgnoredEvent(_) => {
                            tracing::info!(provider = provider.as_str(), "{}", err)
                        }
                        _ => tracing::warn!(
                            provider = provider.as_str(),
                            "Rejected webhook: {}",
                            err
                        ),
                    }
                }
                res
            },
        ))
    }
}
