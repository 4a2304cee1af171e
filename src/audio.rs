use crate::constants::{
    track_url, AMBIENT_GAIN, LISTENER_Z, MASTER_GAIN, PANNER_MAX_DISTANCE, PANNER_REF_DISTANCE,
    STOP_TAIL_SEC, VOLUME_STEP, WHISPER_GAIN,
};
use crate::core::{AudioDirector, StopOneShot, TrackId};
use fnv::FnvHashMap;
use glam::Vec3;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

type BufferCache = Rc<RefCell<FnvHashMap<TrackId, web::AudioBuffer>>>;

struct AmbientVoice {
    id: u64,
    track: TrackId,
    gain: web::GainNode,
    source: Option<web::AudioBufferSourceNode>,
}

/// WebAudio implementation of the journey's audio side.
///
/// Ambient tracks loop through their own gain node into the master bus; a
/// crossfade ramps the playing voice down and a new one up over the same
/// window. Whispers play once through a panner.
#[derive(Clone)]
pub struct WebAudioDirector {
    ctx: web::AudioContext,
    master: web::GainNode,
    buffers: BufferCache,
    ambient: Rc<RefCell<Option<AmbientVoice>>>,
    next_voice: Rc<Cell<u64>>,
}

fn js_err(e: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

fn create_gain(
    audio_ctx: &web::AudioContext,
    value: f32,
    label: &str,
) -> anyhow::Result<web::GainNode> {
    let g = web::GainNode::new(audio_ctx)
        .map_err(|e| anyhow::anyhow!("{} GainNode error: {:?}", label, e))?;
    g.gain().set_value(value);
    Ok(g)
}

/// Ramp `param` from wherever it is now to `target` over `seconds`.
fn ramp_to(param: &web::AudioParam, target: f32, now: f64, seconds: f64) {
    let current = param.value();
    _ = param.cancel_scheduled_values(now);
    _ = param.set_value_at_time(current, now);
    _ = param.linear_ramp_to_value_at_time(target, now + seconds.max(0.0));
}

async fn load_buffer(
    ctx: &web::AudioContext,
    cache: &BufferCache,
    track: TrackId,
) -> anyhow::Result<web::AudioBuffer> {
    if let Some(b) = cache.borrow().get(track) {
        return Ok(b.clone());
    }
    let url = track_url(track);
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let resp: web::Response = JsFuture::from(window.fetch_with_str(&url))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    if !resp.ok() {
        anyhow::bail!("fetch {} failed with status {}", url, resp.status());
    }
    let bytes: js_sys::ArrayBuffer = JsFuture::from(resp.array_buffer().map_err(js_err)?)
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    let buffer: web::AudioBuffer = JsFuture::from(ctx.decode_audio_data(&bytes).map_err(js_err)?)
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    log::debug!("[audio] decoded {} ({:.1}s)", url, buffer.duration());
    cache.borrow_mut().insert(track, buffer.clone());
    Ok(buffer)
}

impl WebAudioDirector {
    pub fn new() -> anyhow::Result<Self> {
        let ctx = web::AudioContext::new().map_err(js_err)?;
        let listener = ctx.listener();
        listener.set_position(0.0, 0.0, LISTENER_Z as f64);

        let master = create_gain(&ctx, MASTER_GAIN, "Master")?;
        master
            .connect_with_audio_node(&ctx.destination())
            .map_err(js_err)?;
        Ok(Self {
            ctx,
            master,
            buffers: Rc::new(RefCell::new(FnvHashMap::default())),
            ambient: Rc::new(RefCell::new(None)),
            next_voice: Rc::new(Cell::new(0)),
        })
    }

    /// Browsers start contexts suspended until a user gesture.
    pub fn resume(&self) {
        if self.ctx.state() != web::AudioContextState::Running {
            _ = self.ctx.resume();
        }
    }

    pub fn master_volume(&self) -> f32 {
        self.master.gain().value()
    }

    pub fn set_master_volume(&self, v: f32) {
        self.master.gain().set_value(v.clamp(0.0, 1.0));
    }

    pub fn nudge_volume(&self, up: bool) {
        let step = if up { VOLUME_STEP } else { -VOLUME_STEP };
        self.set_master_volume(self.master_volume() + step);
    }

    /// Start fetching tracks ahead of their scenes.
    pub fn preload(&self, tracks: impl IntoIterator<Item = TrackId>) {
        for track in tracks {
            let ctx = self.ctx.clone();
            let cache = self.buffers.clone();
            spawn_local(async move {
                if let Err(e) = load_buffer(&ctx, &cache, track).await {
                    log::warn!("[audio] preload {}: {:#}", track, e);
                }
            });
        }
    }

    fn fade_out_ambient(&self, seconds: f64) {
        let now = self.ctx.current_time();
        if let Some(voice) = self.ambient.borrow_mut().take() {
            ramp_to(&voice.gain.gain(), 0.0, now, seconds);
            if let Some(src) = &voice.source {
                let sched: &web::AudioScheduledSourceNode = src.as_ref();
                _ = sched.stop_with_when(now + seconds + STOP_TAIL_SEC);
            }
            log::debug!("[audio] fading out {}", voice.track);
        }
    }
}

impl AudioDirector for WebAudioDirector {
    fn crossfade(&self, from: Option<TrackId>, to: TrackId, duration: Duration) {
        let seconds = duration.as_secs_f64();
        let playing = self.ambient.borrow().as_ref().map(|v| v.track);
        if playing != from {
            log::debug!("[audio] crossfade from {:?} but {:?} is playing", from, playing);
        }
        self.fade_out_ambient(seconds);

        let gain = match create_gain(&self.ctx, 0.0, "Ambient") {
            Ok(g) => g,
            Err(e) => {
                log::error!("[audio] {:#}", e);
                return;
            }
        };
        _ = gain.connect_with_audio_node(&self.master);
        let id = self.next_voice.get() + 1;
        self.next_voice.set(id);
        *self.ambient.borrow_mut() = Some(AmbientVoice {
            id,
            track: to,
            gain: gain.clone(),
            source: None,
        });

        let this = self.clone();
        spawn_local(async move {
            let buffer = match load_buffer(&this.ctx, &this.buffers, to).await {
                Ok(b) => b,
                Err(e) => {
                    log::error!("[audio] load {}: {:#}", to, e);
                    return;
                }
            };
            let mut ambient = this.ambient.borrow_mut();
            let voice = match ambient.as_mut() {
                Some(v) if v.id == id => v,
                // A newer crossfade replaced this voice while it was loading.
                _ => return,
            };
            let src = match web::AudioBufferSourceNode::new(&this.ctx) {
                Ok(s) => s,
                Err(e) => {
                    log::error!("[audio] AudioBufferSourceNode error: {:?}", e);
                    return;
                }
            };
            src.set_buffer(Some(&buffer));
            src.set_loop(true);
            _ = src.connect_with_audio_node(&gain);
            let now = this.ctx.current_time();
            let sched: &web::AudioScheduledSourceNode = src.as_ref();
            _ = sched.start_with_when(now);
            ramp_to(&gain.gain(), AMBIENT_GAIN, now, seconds);
            voice.source = Some(src);
            log::info!("[audio] ambient {} over {:.1}s", to, seconds);
        });
    }

    fn play_one_shot(&self, track: TrackId, origin: Vec3, delay: Duration) -> Option<StopOneShot> {
        let requested_at = self.ctx.current_time();
        let stopped = Rc::new(Cell::new(false));
        let playing: Rc<RefCell<Option<web::AudioBufferSourceNode>>> = Rc::default();
        let this = self.clone();
        let (task_stopped, task_playing) = (stopped.clone(), playing.clone());
        spawn_local(async move {
            let buffer = match load_buffer(&this.ctx, &this.buffers, track).await {
                Ok(b) => b,
                Err(e) => {
                    log::error!("[audio] load {}: {:#}", track, e);
                    return;
                }
            };
            if task_stopped.get() {
                log::debug!("[audio] whisper {} stopped while loading", track);
                return;
            }
            let panner = match web::PannerNode::new(&this.ctx) {
                Ok(p) => p,
                Err(e) => {
                    log::error!("[audio] PannerNode error: {:?}", e);
                    return;
                }
            };
            panner.set_panning_model(web::PanningModelType::Hrtf);
            panner.set_distance_model(web::DistanceModelType::Inverse);
            panner.set_ref_distance(PANNER_REF_DISTANCE as f64);
            panner.set_max_distance(PANNER_MAX_DISTANCE as f64);
            panner.position_x().set_value(origin.x);
            panner.position_y().set_value(origin.y);
            panner.position_z().set_value(origin.z);

            let gain = match create_gain(&this.ctx, WHISPER_GAIN, "Whisper") {
                Ok(g) => g,
                Err(e) => {
                    log::error!("[audio] {:#}", e);
                    return;
                }
            };
            let src = match web::AudioBufferSourceNode::new(&this.ctx) {
                Ok(s) => s,
                Err(e) => {
                    log::error!("[audio] AudioBufferSourceNode error: {:?}", e);
                    return;
                }
            };
            src.set_buffer(Some(&buffer));
            _ = src.connect_with_audio_node(&gain);
            _ = gain.connect_with_audio_node(&panner);
            _ = panner.connect_with_audio_node(&this.master);

            // Delay counts from the request, not from when loading finished.
            let when = (requested_at + delay.as_secs_f64()).max(this.ctx.current_time());
            let sched: &web::AudioScheduledSourceNode = src.as_ref();
            _ = sched.start_with_when(when);
            *task_playing.borrow_mut() = Some(src);
            log::info!("[audio] whisper {} at t={:.2}", track, when);
        });

        Some(Box::new(move || {
            stopped.set(true);
            if let Some(src) = playing.borrow_mut().take() {
                let sched: &web::AudioScheduledSourceNode = src.as_ref();
                _ = sched.stop();
                log::debug!("[audio] whisper {} stopped", track);
            }
        }))
    }
}
