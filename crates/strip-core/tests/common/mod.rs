// Recording output used by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use strip_core::*;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Volume(f32),
    Play,
    Pause,
    Rewind,
}

#[derive(Debug, Default)]
pub struct ProbeState {
    pub calls: Vec<Call>,
    pub volume: f32,
    pub playing: bool,
    pub reject_play: bool,
    pub pending_error: Option<PlaybackRejected>,
}

/// Shared handle to what a [`TestChannel`] has been told to do.
#[derive(Clone, Debug, Default)]
pub struct Probe(pub Rc<RefCell<ProbeState>>);

impl Probe {
    pub fn volume(&self) -> f32 {
        self.0.borrow().volume
    }
    pub fn playing(&self) -> bool {
        self.0.borrow().playing
    }
    pub fn count(&self, call: &Call) -> usize {
        self.0.borrow().calls.iter().filter(|c| *c == call).count()
    }
    pub fn set_reject(&self, reject: bool) {
        self.0.borrow_mut().reject_play = reject;
    }
    pub fn fail_later(&self, reason: &str) {
        self.0.borrow_mut().pending_error = Some(PlaybackRejected::new(reason));
    }
    pub fn clear_calls(&self) {
        self.0.borrow_mut().calls.clear();
    }
}

#[derive(Debug)]
pub struct TestChannel {
    pub probe: Probe,
}

impl PlayableChannel for TestChannel {
    fn set_volume(&mut self, volume: f32) {
        let mut s = self.probe.0.borrow_mut();
        s.volume = volume;
        s.calls.push(Call::Volume(volume));
    }

    fn play(&mut self) -> Result<(), PlaybackRejected> {
        let mut s = self.probe.0.borrow_mut();
        s.calls.push(Call::Play);
        if s.reject_play {
            return Err(PlaybackRejected::new("autoplay blocked"));
        }
        s.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        let mut s = self.probe.0.borrow_mut();
        s.calls.push(Call::Pause);
        s.playing = false;
    }

    fn rewind(&mut self) {
        self.probe.0.borrow_mut().calls.push(Call::Rewind);
    }

    fn take_error(&mut self) -> Option<PlaybackRejected> {
        let mut s = self.probe.0.borrow_mut();
        let err = s.pending_error.take();
        if err.is_some() {
            s.playing = false;
        }
        err
    }
}

pub fn channel(name: &str, base: f32) -> (Channel<TestChannel>, Probe) {
    let probe = Probe::default();
    (
        Channel::new(
            name,
            base,
            TestChannel {
                probe: probe.clone(),
            },
        ),
        probe,
    )
}

/// Registry with a background and the given ambients, plus their probes.
pub fn registry(
    ambient_names: &[&str],
) -> (AudioChannelRegistry<TestChannel>, HashMap<String, Probe>) {
    let mut probes = HashMap::new();
    let (bg, bg_probe) = channel("background", BACKGROUND_LEVEL_BEFORE);
    probes.insert("background".to_string(), bg_probe);
    let ambients = ambient_names
        .iter()
        .map(|name| {
            let (ch, probe) = channel(name, AMBIENT_BASE_VOLUME);
            probes.insert(name.to_string(), probe);
            ch
        })
        .collect();
    let reg = AudioChannelRegistry::new(bg, ambients, BackgroundRule::default(), Tuning::default());
    (reg, probes)
}

pub fn presentation(
    config: PresentationConfig,
) -> (Presentation<TestChannel>, HashMap<String, Probe>) {
    let probes: Rc<RefCell<HashMap<String, Probe>>> = Rc::default();
    let sink = probes.clone();
    let p = Presentation::new(config, move |def| {
        let probe = Probe::default();
        sink.borrow_mut().insert(def.name.clone(), probe.clone());
        TestChannel { probe }
    })
    .expect("valid config");
    let map = probes.borrow().clone();
    (p, map)
}

/// Run fade ticks until `ms` milliseconds have passed.
pub fn run_ms(reg: &mut AudioChannelRegistry<TestChannel>, ms: u32) {
    let mut t = 0;
    while t < ms {
        reg.tick(FADE_TICK_MS as f32);
        t += FADE_TICK_MS;
    }
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}
