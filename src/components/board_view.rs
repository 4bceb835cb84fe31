use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlElement, KeyboardEvent, PointerEvent, WheelEvent};
use yew::prelude::*;

use crate::feed::{PhotoFeed, Snapshot};
use crate::model::Canvas;
use crate::render::{board_status, container_style, placements};
use crate::state::{BoardEngine, GestureOutcome, PointerInput, PointerKind, ScreenPoint};
use crate::store::{SharedStore, persist_move};
use crate::util::{clog, cwarn};

use super::{
    camera_controls::CameraControls, header::Header, polaroid::Polaroid,
    status_overlay::StatusOverlay,
};

const KEY_PAN_PX: f64 = 40.0;
const WHEEL_LINE_PX: f64 = 16.0;

#[derive(Properties, PartialEq, Clone)]
pub struct BoardViewProps {
    pub store: SharedStore,
    pub canvas: Canvas,
    pub viewer_name: Option<String>,
    pub poll_interval_ms: u32,
}

/// Pointer position relative to the board viewport.
fn pointer_input(e: &PointerEvent, el: &HtmlElement) -> PointerInput {
    let rect = el.get_bounding_client_rect();
    let mut input = PointerInput::new(
        e.pointer_id(),
        PointerKind::from_pointer_type(&e.pointer_type()),
        e.client_x() as f64 - rect.left(),
        e.client_y() as f64 - rect.top(),
    );
    input.button = e.button();
    input
}

/// Presses on overlaid UI (zoom buttons) are not board gestures.
fn from_board_ui(e: &PointerEvent) -> bool {
    e.target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .and_then(|el| el.closest("[data-board-ui]").ok().flatten())
        .is_some()
}

fn measure(el: &HtmlElement, engine: &RefCell<BoardEngine>) {
    let rect = el.get_bounding_client_rect();
    engine
        .borrow_mut()
        .set_viewport_size(rect.width(), rect.height());
}

#[function_component(BoardView)]
pub fn board_view(props: &BoardViewProps) -> Html {
    let viewport_ref = use_node_ref();
    let engine = use_mut_ref(BoardEngine::new);
    let redraw = use_force_update();
    let store_ref = use_mut_ref(|| props.store.clone());
    *store_ref.borrow_mut() = props.store.clone();

    // Applies a gesture outcome; commits are persisted once, best effort.
    let apply: Rc<dyn Fn(GestureOutcome)> = {
        let engine = engine.clone();
        let redraw = redraw.clone();
        let store_ref = store_ref.clone();
        Rc::new(move |outcome: GestureOutcome| match outcome {
            GestureOutcome::Ignored => {}
            GestureOutcome::Redraw => redraw.force_update(),
            GestureOutcome::Commit(pending) => {
                redraw.force_update();
                let fut = persist_move(store_ref.borrow().0.as_ref(), &pending.request);
                let engine = engine.clone();
                let redraw = redraw.clone();
                spawn_local(async move {
                    let ok = fut.await;
                    engine
                        .borrow_mut()
                        .resolve_commit(&pending.request.photo_id, pending.ticket, ok);
                    redraw.force_update();
                });
            }
        })
    };
    let apply_ref = use_mut_ref(|| apply.clone());
    *apply_ref.borrow_mut() = apply;

    // Feed and edit rights follow the canvas.
    {
        let engine = engine.clone();
        let redraw = redraw.clone();
        let store = props.store.clone();
        let poll_interval_ms = props.poll_interval_ms;
        use_effect_with(props.canvas.id.clone(), move |canvas_id| {
            {
                let mut eng = engine.borrow_mut();
                let geometry = eng.geometry;
                *eng = BoardEngine::new();
                eng.set_viewport_size(geometry.viewport_width, geometry.viewport_height);
            }
            redraw.force_update();
            {
                let engine = engine.clone();
                let redraw = redraw.clone();
                let fut = store.0.viewer_is_owner(canvas_id);
                spawn_local(async move {
                    let owner = fut.await.unwrap_or_else(|err| {
                        cwarn(&format!("owner check failed: {err}"));
                        false
                    });
                    clog(&format!("viewer can edit: {owner}"));
                    engine.borrow_mut().set_can_edit(owner);
                    redraw.force_update();
                });
            }
            let begin_poll = {
                let engine = engine.clone();
                Callback::from(move |()| engine.borrow_mut().begin_poll())
            };
            let on_snapshot = {
                let engine = engine.clone();
                let redraw = redraw.clone();
                Callback::from(move |snapshot: Snapshot| {
                    engine
                        .borrow_mut()
                        .apply_snapshot(snapshot.issued, snapshot.photos);
                    redraw.force_update();
                })
            };
            let feed = PhotoFeed::start(
                store.0.clone(),
                canvas_id.clone(),
                poll_interval_ms,
                begin_poll,
                on_snapshot,
            );
            move || drop(feed)
        });
    }

    // DOM listeners
    {
        let viewport_ref = viewport_ref.clone();
        let engine = engine.clone();
        let redraw = redraw.clone();
        let apply_ref = apply_ref.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window();
            let viewport = viewport_ref.cast::<HtmlElement>();
            let listeners = window.zip(viewport).map(|(window, el)| {
                measure(&el, &engine);
                redraw.force_update();

                let pointerdown_cb = {
                    let el_pd = el.clone();
                    let engine = engine.clone();
                    let apply_ref = apply_ref.clone();
                    Closure::wrap(Box::new(move |e: PointerEvent| {
                        if from_board_ui(&e) {
                            return;
                        }
                        let input = pointer_input(&e, &el_pd);
                        let outcome = engine.borrow_mut().on_pointer_down(input);
                        if outcome != GestureOutcome::Ignored {
                            e.prevent_default();
                            let _ = el_pd.set_pointer_capture(e.pointer_id());
                        }
                        let apply = apply_ref.borrow().clone();
                        apply(outcome);
                    }) as Box<dyn FnMut(_)>)
                };
                let pointermove_cb = {
                    let el_pm = el.clone();
                    let engine = engine.clone();
                    let apply_ref = apply_ref.clone();
                    Closure::wrap(Box::new(move |e: PointerEvent| {
                        let input = pointer_input(&e, &el_pm);
                        let outcome = engine.borrow_mut().on_pointer_move(input);
                        let apply = apply_ref.borrow().clone();
                        apply(outcome);
                    }) as Box<dyn FnMut(_)>)
                };
                let pointerup_cb = {
                    let el_pu = el.clone();
                    let engine = engine.clone();
                    let apply_ref = apply_ref.clone();
                    Closure::wrap(Box::new(move |e: PointerEvent| {
                        let input = pointer_input(&e, &el_pu);
                        let outcome = if e.type_() == "pointercancel" {
                            engine.borrow_mut().on_pointer_cancel(input)
                        } else {
                            engine.borrow_mut().on_pointer_up(input)
                        };
                        let _ = el_pu.release_pointer_capture(e.pointer_id());
                        let apply = apply_ref.borrow().clone();
                        apply(outcome);
                    }) as Box<dyn FnMut(_)>)
                };
                let wheel_cb = {
                    let el_wh = el.clone();
                    let engine = engine.clone();
                    let apply_ref = apply_ref.clone();
                    Closure::wrap(Box::new(move |e: WheelEvent| {
                        e.prevent_default();
                        let rect = el_wh.get_bounding_client_rect();
                        let cursor = ScreenPoint::new(
                            e.client_x() as f64 - rect.left(),
                            e.client_y() as f64 - rect.top(),
                        );
                        let delta_y = match e.delta_mode() {
                            WheelEvent::DOM_DELTA_LINE => e.delta_y() * WHEEL_LINE_PX,
                            WheelEvent::DOM_DELTA_PAGE => e.delta_y() * rect.height(),
                            _ => e.delta_y(),
                        };
                        let outcome = engine.borrow_mut().on_wheel(cursor, delta_y);
                        let apply = apply_ref.borrow().clone();
                        apply(outcome);
                    }) as Box<dyn FnMut(_)>)
                };
                let resize_cb = {
                    let el_rs = el.clone();
                    let engine = engine.clone();
                    let redraw = redraw.clone();
                    Closure::wrap(Box::new(move |_e: web_sys::Event| {
                        measure(&el_rs, &engine);
                        redraw.force_update();
                    }) as Box<dyn FnMut(_)>)
                };
                let keydown_cb = {
                    let engine = engine.clone();
                    let redraw = redraw.clone();
                    Closure::wrap(Box::new(move |e: KeyboardEvent| {
                        let mut eng = engine.borrow_mut();
                        match e.key().as_str() {
                            "ArrowLeft" => eng.pan_by(KEY_PAN_PX, 0.0),
                            "ArrowRight" => eng.pan_by(-KEY_PAN_PX, 0.0),
                            "ArrowUp" => eng.pan_by(0.0, KEY_PAN_PX),
                            "ArrowDown" => eng.pan_by(0.0, -KEY_PAN_PX),
                            "+" | "=" => {
                                eng.zoom_step(true);
                            }
                            "-" | "_" => {
                                eng.zoom_step(false);
                            }
                            _ => return,
                        }
                        drop(eng);
                        redraw.force_update();
                    }) as Box<dyn FnMut(_)>)
                };

                let pointer_events: [(&str, &Closure<dyn FnMut(PointerEvent)>); 4] = [
                    ("pointerdown", &pointerdown_cb),
                    ("pointermove", &pointermove_cb),
                    ("pointerup", &pointerup_cb),
                    ("pointercancel", &pointerup_cb),
                ];
                for (name, cb) in pointer_events {
                    let _ = el.add_event_listener_with_callback(name, cb.as_ref().unchecked_ref());
                }
                let _ = el.add_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref());
                let _ = window
                    .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref());
                let _ = window
                    .add_event_listener_with_callback("keydown", keydown_cb.as_ref().unchecked_ref());

                (
                    window,
                    el,
                    pointerdown_cb,
                    pointermove_cb,
                    pointerup_cb,
                    wheel_cb,
                    resize_cb,
                    keydown_cb,
                )
            });
            if listeners.is_none() {
                cwarn("board viewport not mounted; input disabled");
            }
            // Cleanup
            move || {
                let Some((window, el, down, mv, up, wheel, resize, keydown)) = listeners else {
                    return;
                };
                let _ = el.remove_event_listener_with_callback(
                    "pointerdown",
                    down.as_ref().unchecked_ref(),
                );
                let _ = el.remove_event_listener_with_callback(
                    "pointermove",
                    mv.as_ref().unchecked_ref(),
                );
                let _ =
                    el.remove_event_listener_with_callback("pointerup", up.as_ref().unchecked_ref());
                let _ = el.remove_event_listener_with_callback(
                    "pointercancel",
                    up.as_ref().unchecked_ref(),
                );
                let _ =
                    el.remove_event_listener_with_callback("wheel", wheel.as_ref().unchecked_ref());
                let _ = window
                    .remove_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());
                let _ = window.remove_event_listener_with_callback(
                    "keydown",
                    keydown.as_ref().unchecked_ref(),
                );
            }
        });
    }

    let on_zoom_in = {
        let engine = engine.clone();
        let redraw = redraw.clone();
        Callback::from(move |_| {
            if engine.borrow_mut().zoom_step(true) {
                redraw.force_update();
            }
        })
    };
    let on_zoom_out = {
        let engine = engine.clone();
        let redraw = redraw.clone();
        Callback::from(move |_| {
            if engine.borrow_mut().zoom_step(false) {
                redraw.force_update();
            }
        })
    };
    let on_fit = {
        let engine = engine.clone();
        let redraw = redraw.clone();
        Callback::from(move |_| {
            if engine.borrow_mut().refit() {
                redraw.force_update();
            }
        })
    };

    let eng = engine.borrow();
    let t = eng.transform();
    let board_style = container_style(&t, eng.geometry.board_width(), eng.geometry.board_height());
    let tz_offset = js_sys::Date::new_0().get_timezone_offset();
    let cards = placements(&eng, tz_offset);
    let status = board_status(&eng);
    let photo_count = cards.len();
    let viewport_style = format!(
        "position:relative; flex:1; overflow:hidden; touch-action:none; user-select:none; \
         background:#f4efe6; cursor:{};",
        if eng.dragging_photo().is_some() { "grabbing" } else { "grab" }
    );
    drop(eng);

    html! {
        <div style="display:flex; flex-direction:column; width:100vw; height:100vh;">
            <Header
                canvas_name={props.canvas.name.clone()}
                viewer_name={props.viewer_name.clone()}
                {photo_count}
            />
            <div ref={viewport_ref} style={viewport_style}>
                <div style={board_style}>
                    { for cards.into_iter().map(|placement| {
                        let key = placement.id.0.clone();
                        html! { <Polaroid key={key} {placement} /> }
                    }) }
                </div>
                if let Some(status) = status {
                    <StatusOverlay {status} />
                }
                <CameraControls {on_zoom_in} {on_zoom_out} {on_fit} />
            </div>
        </div>
    }
}
