use yew::prelude::*;

use crate::render::BoardStatus;

#[derive(Properties, PartialEq, Clone)]
pub struct StatusOverlayProps {
    pub status: BoardStatus,
}

#[function_component(StatusOverlay)]
pub fn status_overlay(props: &StatusOverlayProps) -> Html {
    let body = match props.status {
        BoardStatus::Loading => html! { <p style="margin:0;">{"Loading..."}</p> },
        BoardStatus::Empty => html! {
            <>
                <p style="margin:0; font-size:20px;">{"No photos yet"}</p>
                <p style="margin:6px 0 0; color:#8b949e;">{"Be the first to take one"}</p>
            </>
        },
    };
    html! {
        <div style="position:absolute; inset:0; display:flex; flex-direction:column; align-items:center; justify-content:center; pointer-events:none; color:#555; text-align:center;">
            { body }
        </div>
    }
}
