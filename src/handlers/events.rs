// src/handlers/events.rs

use std::convert::Infallible;

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use serde::Deserialize;
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

use crate::{config::AppState, middleware::auth::AuthenticatedUser, models::event::ResourceKind};

#[derive(Debug, Deserialize)]
pub struct EventStreamParams {
    /// Filtro por tipo de recurso, separado por vírgula
    /// (ex: "transaction,inventory"). Sem filtro, recebe tudo.
    pub kinds: Option<String>,
}

// Canal de push: o cliente assina e usa cada evento só como gatilho de
// re-fetch. Eventos perdidos (buffer cheio, reconexão) não são repostos.
pub async fn subscribe(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(params): Query<EventStreamParams>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let kinds: Option<Vec<ResourceKind>> = params.kinds.map(|raw| {
        raw.split(',')
            .filter_map(|kind| ResourceKind::parse(kind.trim()))
            .collect()
    });

    let stream = BroadcastStream::new(app_state.notifier.subscribe()).filter_map(move |result| {
        let event = result.ok()?;
        if let Some(kinds) = &kinds {
            if !kinds.contains(&event.resource) {
                return None;
            }
        }
        let sse_event = Event::default().event("change").json_data(&event).ok()?;
        Some(Ok(sse_event))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
