/// Page element ids, classes and asset paths shared by the front end.
///
/// Kept free of web-sys so host tests can include this file directly.
// Scroll container sizing
pub const SCROLL_PAGES: u32 = 5; // scroll track height in viewport heights
pub const SCROLL_SPACER_ID: &str = "scroll-spacer";

// Caption overlays are `caption-0` .. `caption-8`
pub const CAPTION_PREFIX: &str = "caption-";
pub const HIDDEN_CLASS: &str = "hidden";

// Video lightbox
pub const LIGHTBOX_ID: &str = "lightbox";
pub const LIGHTBOX_VIDEO_ID: &str = "lightbox-video";
pub const LIGHTBOX_CLOSE_ID: &str = "lightbox-close";
pub const VIDEO_DIR: &str = "/video";

// Mute button
pub const VOLUME_BUTTON_ID: &str = "volume-button";
pub const VOLUME_LABEL_ON: &str = "\u{266A}"; // audible
pub const VOLUME_LABEL_MUTED: &str = "\u{00D7}";

// DOM events exchanged with the scene renderer
pub const FRAME_EVENT: &str = "strip:frame"; // dispatched every animation frame
pub const POINTER_EVENT: &str = "strip:pointer"; // detail: hit node names, leaf first

// Audio interval clamp after a throttled background tab
pub const MAX_FADE_STEP_MS: f32 = 250.0;

pub fn caption_element_id(signal: &str) -> String {
    if signal.starts_with(CAPTION_PREFIX) {
        signal.to_string()
    } else {
        format!("{CAPTION_PREFIX}{signal}")
    }
}

pub fn video_source(content: u32) -> String {
    format!("{VIDEO_DIR}/{content}.mp4")
}

pub fn volume_label(muted: bool) -> &'static str {
    if muted {
        VOLUME_LABEL_MUTED
    } else {
        VOLUME_LABEL_ON
    }
}
