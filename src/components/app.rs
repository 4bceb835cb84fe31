use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::board_view::BoardView;
use crate::config::{BoardConfig, current_slug, load_viewer_name};
use crate::model::{SessionAction, SessionState, SessionStatus};
use crate::store::{HttpPhotoStore, SharedStore};
use crate::util::{clog, cwarn, set_debug_logging};

fn notice(title: &str, detail: &str) -> Html {
    html! {
        <div style="display:flex; flex-direction:column; align-items:center; justify-content:center; height:100vh; color:#555; text-align:center;">
            <p style="margin:0; font-size:20px;">{ title.to_string() }</p>
            <p style="margin:6px 0 0; color:#8b949e;">{ detail.to_string() }</p>
        </div>
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo((), |_| {
        let cfg = BoardConfig::load();
        set_debug_logging(cfg.debug_log);
        clog(&format!("config: {:?}", cfg));
        cfg
    });
    let store = {
        let api_base = config.api_base.clone();
        use_memo((), move |_| SharedStore::new(HttpPhotoStore::new(api_base)))
    };
    let session = use_reducer(|| SessionState::new(current_slug(), load_viewer_name()));

    // Follow `#/c/<slug>` navigation
    {
        let session = session.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window();
            let hashchange_cb = Closure::wrap(Box::new(move |_e: web_sys::Event| {
                session.dispatch(SessionAction::Navigate(current_slug()));
            }) as Box<dyn FnMut(_)>);
            if let Some(win) = &window {
                let _ = win.add_event_listener_with_callback(
                    "hashchange",
                    hashchange_cb.as_ref().unchecked_ref(),
                );
            }
            move || {
                if let Some(win) = window {
                    let _ = win.remove_event_listener_with_callback(
                        "hashchange",
                        hashchange_cb.as_ref().unchecked_ref(),
                    );
                }
            }
        });
    }

    // Resolve the canvas whenever the slug changes
    {
        let session = session.clone();
        let store = store.clone();
        use_effect_with(session.slug.clone(), move |slug| {
            if let Some(slug) = slug.clone() {
                let fut = store.0.canvas_by_slug(&slug);
                spawn_local(async move {
                    match fut.await {
                        Ok(canvas) => {
                            clog(&format!("canvas {} ({})", canvas.name, canvas.id));
                            session.dispatch(SessionAction::CanvasLoaded(canvas));
                        }
                        Err(err) => {
                            cwarn(&format!("canvas {slug} failed to load: {err}"));
                            session.dispatch(SessionAction::CanvasFailed {
                                slug,
                                reason: err.to_string(),
                            });
                        }
                    }
                });
            }
            || ()
        });
    }

    match (&session.status, &session.canvas) {
        (SessionStatus::Ready, Some(canvas)) => html! {
            <BoardView
                store={(*store).clone()}
                canvas={canvas.clone()}
                viewer_name={session.viewer_name.clone()}
                poll_interval_ms={config.poll_interval_ms}
            />
        },
        (SessionStatus::NoCanvas, _) => notice("No canvas selected", "Open a board link like #/c/your-board"),
        (SessionStatus::Failed(reason), _) => notice("Could not open this board", reason),
        _ => notice("Loading...", ""),
    }
}
