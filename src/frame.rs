use crate::audio::HtmlAudioChannel;
use crate::constants::{caption_element_id, FRAME_EVENT, MAX_FADE_STEP_MS};
use crate::dom;
use crate::input;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use strip_core::{Edge, Presentation, SignalKind};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type SharedPresentation = Rc<RefCell<Presentation<HtmlAudioChannel>>>;

pub struct FrameContext {
    pub presentation: SharedPresentation,
    pub document: web::Document,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let fraction = read_scroll_fraction(&self.document);
        let (position, changes) = {
            let mut p = self.presentation.borrow_mut();
            let report = p.frame(fraction);
            let changes: Vec<(SignalKind, String, Edge)> = report
                .transitions
                .iter()
                .map(|t| (t.kind, p.windows().name(t.signal).to_string(), t.edge))
                .collect();
            (report.position, changes)
        };

        for (kind, name, edge) in &changes {
            if *kind == SignalKind::Caption {
                dom::set_visible(&self.document, &caption_element_id(name), *edge == Edge::Enter);
            }
        }
        dispatch_frame_event(position, &changes);
    }
}

fn read_scroll_fraction(document: &web::Document) -> f32 {
    match document.document_element() {
        Some(root) => input::scroll_fraction(
            root.scroll_top() as f64,
            root.scroll_height() as f64,
            root.client_height() as f64,
        ),
        None => 0.0,
    }
}

/// Hand the smoothed position and this frame's edges to the scene renderer.
fn dispatch_frame_event(position: f32, changes: &[(SignalKind, String, Edge)]) {
    let edges = |edge: Edge| -> Vec<serde_json::Value> {
        changes
            .iter()
            .filter(|(_, _, e)| *e == edge)
            .map(|(kind, name, _)| serde_json::json!({ "kind": kind.label(), "signal": name }))
            .collect()
    };
    let detail = serde_json::json!({
        "position": position,
        "enter": edges(Edge::Enter),
        "exit": edges(Edge::Exit),
    });
    let Ok(detail) = js_sys::JSON::parse(&detail.to_string()) else {
        return;
    };
    let init = web::CustomEventInit::new();
    init.set_detail(&detail);
    if let (Some(w), Ok(ev)) = (
        web::window(),
        web::CustomEvent::new_with_event_init_dict(FRAME_EVENT, &init),
    ) {
        _ = w.dispatch_event(&ev);
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

/// Drive fades from a fixed browser interval, independent of the frame rate.
/// The measured gap is used so throttled timers still land on time.
pub fn start_fade_interval(presentation: SharedPresentation, interval_ms: u32) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let mut last = Instant::now();
    let closure = Closure::wrap(Box::new(move || {
        let now = Instant::now();
        let elapsed_ms = (now - last).as_secs_f32() * 1000.0;
        last = now;
        presentation
            .borrow_mut()
            .advance(input::clamp_step_ms(elapsed_ms, MAX_FADE_STEP_MS));
    }) as Box<dyn FnMut()>);
    window
        .set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            interval_ms as i32,
        )
        .map_err(|e| anyhow::anyhow!("setInterval: {:?}", e))?;
    closure.forget();
    Ok(())
}
