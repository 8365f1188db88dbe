#![cfg(target_arch = "wasm32")]
//! Browser front end: binds the scroll position, page elements and `<audio>`
//! channels to the presentation synchronizer in `strip-core`.

use std::cell::RefCell;
use std::rc::Rc;
use strip_core::{Presentation, PresentationConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;

fn size_scroll_track(document: &web::Document) {
    match document.get_element_by_id(constants::SCROLL_SPACER_ID) {
        Some(el) => {
            let height = format!("height:{}vh", constants::SCROLL_PAGES * 100);
            _ = el.set_attribute("style", &height);
        }
        None => log::warn!("[dom] missing #{}", constants::SCROLL_SPACER_ID),
    }
}

fn hide_page_overlays(document: &web::Document, config: &PresentationConfig) {
    for table in &config.tables {
        if table.kind != strip_core::SignalKind::Caption {
            continue;
        }
        for w in &table.windows {
            dom::set_visible(document, &constants::caption_element_id(&w.signal), false);
        }
    }
    overlay::hide(document);
    dom::set_text(document, constants::VOLUME_BUTTON_ID, constants::volume_label(false));
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("strip-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let config = PresentationConfig::music_strip();
    size_scroll_track(&document);
    hide_page_overlays(&document, &config);

    let fade_tick_ms = config.tuning.fade_tick_ms;
    let presentation: frame::SharedPresentation = Rc::new(RefCell::new(Presentation::try_new(
        config,
        audio::HtmlAudioChannel::new,
    )?));

    events::wire_global_keydown(presentation.clone(), document.clone());
    events::wire_user_interaction(presentation.clone());
    events::wire_scene_pointer(presentation.clone(), document.clone());
    events::wire_lightbox(presentation.clone(), document.clone());
    events::wire_volume_button(presentation.clone(), document.clone());
    events::wire_pagehide(presentation.clone());

    // the background's delayed start is counted by this interval
    frame::start_fade_interval(presentation.clone(), fade_tick_ms)?;

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        presentation,
        document,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
