use crate::constants::{video_source, LIGHTBOX_ID, LIGHTBOX_VIDEO_ID};
use crate::dom;
use strip_core::{ContentId, OverlayChange};
use wasm_bindgen::JsCast;
use web_sys as web;

fn lightbox_video(document: &web::Document) -> Option<web::HtmlVideoElement> {
    document
        .get_element_by_id(LIGHTBOX_VIDEO_ID)?
        .dyn_into::<web::HtmlVideoElement>()
        .ok()
}

pub fn show(document: &web::Document, content: ContentId) {
    if let Some(video) = lightbox_video(document) {
        video.set_src(&video_source(content));
        _ = video.play();
    }
    dom::set_visible(document, LIGHTBOX_ID, true);
}

pub fn hide(document: &web::Document) {
    if let Some(video) = lightbox_video(document) {
        _ = video.pause();
        _ = video.remove_attribute("src");
        video.load();
    }
    dom::set_visible(document, LIGHTBOX_ID, false);
}

/// Mirror a controller change onto the page.
pub fn apply(document: &web::Document, change: OverlayChange) {
    match change {
        OverlayChange::Opened(content) | OverlayChange::Switched(content) => {
            log::info!("[overlay] showing video {}", content);
            show(document, content);
        }
        OverlayChange::Closed => {
            log::info!("[overlay] closed");
            hide(document);
        }
    }
}
