use crate::{BackgroundMsg, BackgroundState, Effect, FlushFailure, Reply};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: BackgroundState, msg: BackgroundMsg) -> (BackgroundState, Vec<Effect>) {
    let effects = match msg {
        BackgroundMsg::LinkAdded { url, title, html } => {
            let inserted = state.put(&url, title, html);
            vec![Effect::Respond(Reply::Ack { success: inserted })]
        }
        BackgroundMsg::VideoInfoReceived { url, title, html } => {
            state.record(url, title, html);
            Vec::new()
        }
        BackgroundMsg::UrlFound { .. } => {
            // Received for visibility only; the dispatcher logs it.
            Vec::new()
        }
        BackgroundMsg::RequestObserved {
            url, observed_at, ..
        } => match state.observe(&url, &observed_at) {
            Some(link) => vec![
                Effect::RequestPageInfo {
                    url: link.url.clone(),
                },
                Effect::RequestVideoInfo { url: link.url },
            ],
            None => Vec::new(),
        },
        BackgroundMsg::SaveRequested => {
            if state.is_empty() {
                vec![Effect::Respond(Reply::SaveOutcome {
                    success: false,
                    message: None,
                    error: Some(FlushFailure::EmptyStore.to_string()),
                })]
            } else {
                vec![Effect::BeginFlush {
                    batch: state.batch(),
                }]
            }
        }
        BackgroundMsg::ClearRequested => {
            state.clear();
            vec![Effect::Respond(Reply::Ack { success: true })]
        }
        BackgroundMsg::FlushCompleted { result } => match result {
            Ok(count) => {
                state.clear();
                vec![Effect::Respond(Reply::SaveOutcome {
                    success: true,
                    message: Some(format!("Saved {count} videos")),
                    error: None,
                })]
            }
            Err(failure) => vec![Effect::Respond(Reply::SaveOutcome {
                success: false,
                message: None,
                error: Some(failure.to_string()),
            })],
        },
    };

    (state, effects)
}
