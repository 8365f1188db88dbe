mod keyboard;

pub use keyboard::{action_for_key, KeyAction};

use crate::constants::{volume_label, LIGHTBOX_CLOSE_ID, LIGHTBOX_ID, POINTER_EVENT, VOLUME_BUTTON_ID};
use crate::dom;
use crate::frame::SharedPresentation;
use crate::overlay;
use strip_core::OverlayChange;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

fn apply_overlay(document: &web::Document, change: Option<OverlayChange>) {
    if let Some(change) = change {
        overlay::apply(document, change);
    }
}

fn close_overlay(presentation: &SharedPresentation, document: &web::Document) {
    let change = presentation.borrow_mut().close_overlay();
    apply_overlay(document, change);
}

fn toggle_mute(presentation: &SharedPresentation, document: &web::Document) {
    let muted = presentation.borrow_mut().toggle_mute();
    dom::set_text(document, VOLUME_BUTTON_ID, volume_label(muted));
}

/// Clicks and key presses are the only moments a blocked player may retry.
fn user_interaction(presentation: &SharedPresentation) {
    let retried = presentation.borrow_mut().user_interaction();
    if retried > 0 {
        log::info!("[audio] retried {} blocked channel(s)", retried);
    }
}

pub fn wire_global_keydown(presentation: SharedPresentation, document: web::Document) {
    dom::add_window_listener("keydown", move |ev| {
        user_interaction(&presentation);
        let Some(kev) = ev.dyn_ref::<web::KeyboardEvent>() else {
            return;
        };
        match action_for_key(&kev.key()) {
            Some(KeyAction::CloseOverlay) => close_overlay(&presentation, &document),
            Some(KeyAction::ToggleMute) => toggle_mute(&presentation, &document),
            None => {}
        }
    });
}

pub fn wire_user_interaction(presentation: SharedPresentation) {
    dom::add_window_listener("pointerdown", move |_| user_interaction(&presentation));
}

/// The renderer reports scene hits as a `strip:pointer` event whose detail is
/// the list of node names from the hit mesh up to the scene root.
pub fn wire_scene_pointer(presentation: SharedPresentation, document: web::Document) {
    dom::add_window_listener(POINTER_EVENT, move |ev| {
        let Some(cev) = ev.dyn_ref::<web::CustomEvent>() else {
            return;
        };
        let ancestry: Vec<String> = js_sys::Array::from(&cev.detail())
            .iter()
            .filter_map(|v| v.as_string())
            .collect();
        let change = presentation
            .borrow_mut()
            .pointer_down(ancestry.iter().map(String::as_str));
        apply_overlay(&document, change);
    });
}

pub fn wire_lightbox(presentation: SharedPresentation, document: web::Document) {
    {
        let presentation = presentation.clone();
        let doc = document.clone();
        dom::add_click_listener(&document, LIGHTBOX_CLOSE_ID, move |_| {
            close_overlay(&presentation, &doc)
        });
    }
    let doc = document.clone();
    dom::add_click_listener(&document, LIGHTBOX_ID, move |ev| {
        // backdrop only; clicks on the video bubble up with a different target
        let target = ev.target().map(JsValue::from);
        let current = ev.current_target().map(JsValue::from);
        if target.is_some() && target == current {
            close_overlay(&presentation, &doc);
        }
    });
}

pub fn wire_volume_button(presentation: SharedPresentation, document: web::Document) {
    let doc = document.clone();
    dom::add_click_listener(&document, VOLUME_BUTTON_ID, move |ev| {
        ev.stop_propagation();
        toggle_mute(&presentation, &doc);
    });
}

pub fn wire_pagehide(presentation: SharedPresentation) {
    dom::add_window_listener("pagehide", move |_| {
        log::info!("[presentation] page hidden, stopping audio");
        presentation.borrow_mut().shutdown();
    });
}
