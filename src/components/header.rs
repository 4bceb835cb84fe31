use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct HeaderProps {
    pub canvas_name: AttrValue,
    pub viewer_name: Option<String>,
    pub photo_count: usize,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let count = match props.photo_count {
        1 => "1 photo".to_string(),
        n => format!("{} photos", n),
    };
    html! {
        <div style="display:flex; align-items:center; gap:12px; padding:8px 14px; background:rgba(22,27,34,0.95); color:#e6edf3; border-bottom:1px solid #30363d;">
            <strong style="font-size:16px;">{ props.canvas_name.clone() }</strong>
            <span style="color:#8b949e;">{ count }</span>
            <span style="flex:1;"></span>
            if let Some(name) = &props.viewer_name {
                <span style="color:#8b949e;">{ format!("Hi, {}", name) }</span>
            }
        </div>
    }
}
