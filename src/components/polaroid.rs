use yew::prelude::*;

use crate::render::PhotoPlacement;

#[derive(Properties, PartialEq, Clone)]
pub struct PolaroidProps {
    pub placement: PhotoPlacement,
}

/// One photo card. Input is hit-tested by the board, so the card itself
/// ignores pointer events.
#[function_component(Polaroid)]
pub fn polaroid(props: &PolaroidProps) -> Html {
    let p = &props.placement;
    let shadow = if p.dragging {
        "0 12px 28px rgba(0,0,0,0.35)"
    } else {
        "0 3px 8px rgba(0,0,0,0.2)"
    };
    let style = format!(
        "{} pointer-events:none; background:#fff; padding:10px 10px 0; box-sizing:border-box; box-shadow:{};",
        p.style(),
        shadow
    );
    html! {
        <div class="polaroid" data-photo-id={p.id.0.clone()} {style}>
            <img src={p.url.clone()} alt={p.label.clone()} draggable="false"
                style="display:block; width:160px; height:160px; object-fit:cover; background:#ddd;" />
            <div style="height:70px; display:flex; flex-direction:column; justify-content:center; align-items:center; font-family:'Caveat', cursive; color:#333;">
                <span style="font-size:18px;">{ p.label.clone() }</span>
                <span style="font-size:13px; color:#777;">{ p.caption_time.clone() }</span>
            </div>
        </div>
    }
}
