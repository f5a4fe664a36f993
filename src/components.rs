//! Pure Yew view components for the Topic Wheel UI.
//!
//! Everything here renders from a `WheelView` snapshot; none of it holds
//! state or touches the rotation, which the presenter drives directly.

use std::rc::Rc;
use topic_wheel::controller::WheelView;
use topic_wheel::utils::{build_gradient, history_heading, label_transform};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ViewProps {
    pub view: Rc<WheelView>,
}

/// Colored slices plus one label per active topic.
#[function_component(WheelFace)]
pub fn wheel_face(props: &ViewProps) -> Html {
    let colors: Vec<String> = props.view.slices.iter().map(|s| s.color.clone()).collect();
    let background = format!("background: {};", build_gradient(&colors));
    let radius = props.view.geometry.label_radius_px;

    html! {
        <>
            <div class="wheel-face" style={background}></div>
            <div class="labels">
                { props.view.slices.iter().map(|slice| {
                    let style = format!("transform: {};", label_transform(slice.center_deg, radius));
                    html! { <span class="label" style={style}>{ slice.name.clone() }</span> }
                }).collect::<Html>() }
            </div>
        </>
    }
}

/// Every topic with its color; removed topics are struck through.
#[function_component(Legend)]
pub fn legend(props: &ViewProps) -> Html {
    html! {
        <div class="legend">
            <h3>{ "Topics" }</h3>
            <ul class="legend-list">
                { props.view.legend.iter().map(|entry| {
                    let class = classes!("legend-item", entry.removed.then_some("removed"));
                    let label = if entry.removed {
                        format!("{} (removed)", entry.name)
                    } else {
                        entry.name.clone()
                    };
                    html! {
                        <li {class}>
                            <span class="legend-swatch" style={format!("background: {};", entry.swatch)}></span>
                            <span>{ label }</span>
                        </li>
                    }
                }).collect::<Html>() }
            </ul>
        </div>
    }
}

#[function_component(HistoryPanel)]
pub fn history_panel(props: &ViewProps) -> Html {
    let history = &props.view.history;

    html! {
        <div class="selected-history">
            <h3>{ history_heading(history.len()) }</h3>
            if !history.is_empty() {
                <ul class="selected-topics">
                    { history.iter().enumerate().map(|(idx, name)| {
                        html! { <li class="selected-topic">{ format!("{}. {}", idx + 1, name) }</li> }
                    }).collect::<Html>() }
                </ul>
            }
        </div>
    }
}
