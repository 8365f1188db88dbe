//! `<audio>` element outputs for the channel registry.

use std::cell::RefCell;
use std::rc::Rc;
use strip_core::{ChannelDef, PlayableChannel, PlaybackRejected};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// One looping media element. Failures reported asynchronously by the
/// browser land in `pending_error` and are drained by the registry's tick.
pub struct HtmlAudioChannel {
    name: String,
    el: web::HtmlAudioElement,
    pending_error: Rc<RefCell<Option<String>>>,
}

impl HtmlAudioChannel {
    pub fn new(def: &ChannelDef) -> anyhow::Result<Self> {
        let el = web::HtmlAudioElement::new_with_src(&def.source)
            .map_err(|e| anyhow::anyhow!("audio element for {}: {:?}", def.name, e))?;
        el.set_loop(true);
        el.set_preload("auto");
        el.set_volume(0.0);

        let pending_error = Rc::new(RefCell::new(None));
        let sink = pending_error.clone();
        let name = def.name.clone();
        let on_error = Closure::wrap(Box::new(move || {
            log::error!("[audio] {} media error", name);
            *sink.borrow_mut() = Some("media error".to_string());
        }) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref());
        on_error.forget();

        log::info!("[audio] {} <- {}", def.name, def.source);
        Ok(Self {
            name: def.name.clone(),
            el,
            pending_error,
        })
    }
}

impl PlayableChannel for HtmlAudioChannel {
    fn set_volume(&mut self, volume: f32) {
        self.el.set_volume(volume.clamp(0.0, 1.0) as f64);
    }

    fn play(&mut self) -> Result<(), PlaybackRejected> {
        self.pending_error.borrow_mut().take();
        let promise = self
            .el
            .play()
            .map_err(|e| PlaybackRejected::new(format!("{:?}", e)))?;
        let sink = self.pending_error.clone();
        let name = self.name.clone();
        // autoplay refusal arrives here, after play() already returned
        let on_reject = Closure::wrap(Box::new(move |e: JsValue| {
            log::warn!("[audio] {} play rejected: {:?}", name, e);
            *sink.borrow_mut() = Some(format!("{:?}", e));
        }) as Box<dyn FnMut(JsValue)>);
        _ = promise.catch(&on_reject);
        on_reject.forget();
        Ok(())
    }

    fn pause(&mut self) {
        _ = self.el.pause();
    }

    fn rewind(&mut self) {
        self.el.set_current_time(0.0);
    }

    fn take_error(&mut self) -> Option<PlaybackRejected> {
        self.pending_error.borrow_mut().take().map(PlaybackRejected::new)
    }
}
