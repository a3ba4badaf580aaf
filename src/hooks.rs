use actix_web::{web, HttpResponse};

use crate::{
    bitbucket, bitbucket_server,
    event::{PushPayload, ValidationError},
    github, gitlab,
    http::Webhook,
};

pub async fn push_hook<P>(Webhook(hook): Webhook<P>) -> Result<HttpResponse, ValidationError>
where
    P: PushPayload + 'static,
{
    let provider = P::PROVIDER.to_string();
    let event = match hook.to_event() {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!(
                provider = provider.as_str(),
                repo = hook.full_name().as_str(),
                "Rejected push: {}",
                err
            );
            return Err(err);
        }
    };

    tracing::info!(
        provider = provider.as_str(),
        repo = event.full_name.as_str(),
        branch = event.branch.as_str(),
        "Accepted push to {}#{} on {}",
        event.full_name,
        event.branch,
        event.hostname,
    );

    Ok(HttpResponse::Accepted().json(&event))
}

/// Registers `POST /api/webhooks/<provider>/notify` for every provider.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/webhooks")
            .route(
                "/bitbucket/notify",
                web::post().to(push_hook::<bitbucket::PushEvent>),
            )
            .route(
                "/bitbucketserver/notify",
                web::post().to(push_hook::<bitbucket_server::PushEvent>),
            )
            .route(
                "/github/notify",
                web::post().to(push_hook::<github::PushEvent>),
            )
            .route(
                "/gitlab/notify",
                web::post().to(push_hook::<gitlab::PushEvent>),
            ),
    );
}
