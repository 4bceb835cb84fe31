use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct CameraControlsProps {
    pub on_zoom_in: Callback<()>,
    pub on_zoom_out: Callback<()>,
    /// Re-frames every photo.
    pub on_fit: Callback<()>,
}

#[function_component(CameraControls)]
pub fn camera_controls(props: &CameraControlsProps) -> Html {
    let zi = {
        let cb = props.on_zoom_in.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let zo = {
        let cb = props.on_zoom_out.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let fit = {
        let cb = props.on_fit.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {<div data-board-ui="controls" style="position:absolute; right:12px; bottom:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; display:flex; gap:6px; align-items:center;">
        <button onclick={zo} title="Zoom out"> {"-"} </button>
        <button onclick={zi} title="Zoom in"> {"+"} </button>
        <span style="width:8px;"></span>
        <button onclick={fit}> {"Fit"} </button>
    </div>}
}
