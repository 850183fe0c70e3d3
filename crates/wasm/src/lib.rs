mod dom;

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use chrono::DateTime;
use okuma_seyri_core::{
    Calibration, ConfigError, GazeHub, GazeSource, ReadingSession, SampleOutcome, TrackerConfig,
    views::render_reading_map,
};
use okuma_seyri_protocol::{GazeEstimate, TextBlock, Viewport, ViewportSize};
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub use dom::DomLayout;

/// One reader's session, owned by the page.
///
/// The page forwards every gaze callback to [`ReadingTracker::push_gaze`],
/// which publishes it on a [`GazeHub`] the session is subscribed to, and
/// reads counters and reports back as JSON.
#[wasm_bindgen]
pub struct ReadingTracker {
    session: Rc<RefCell<ReadingSession>>,
    hub: GazeHub,
    last_outcome: Rc<Cell<Option<SampleOutcome>>>,
    calibration: Option<Calibration>,
}

impl ReadingTracker {
    pub fn from_config(config: TrackerConfig) -> Result<Self, ConfigError> {
        let session = Rc::new(RefCell::new(ReadingSession::new(config)?));
        let last_outcome = Rc::new(Cell::new(None));
        let mut hub = GazeHub::new();
        let (sink, outcome) = (Rc::clone(&session), Rc::clone(&last_outcome));
        hub.subscribe(Box::new(move |estimate: &GazeEstimate| {
            outcome.set(sink.borrow_mut().on_estimate(estimate));
        }));
        Ok(Self {
            session,
            hub,
            last_outcome,
            calibration: None,
        })
    }

    pub fn session(&self) -> Ref<'_, ReadingSession> {
        self.session.borrow()
    }
}

#[wasm_bindgen]
impl ReadingTracker {
    /// Create a tracker from an optional JSON config (defaults otherwise).
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<ReadingTracker, JsError> {
        let config = match config_json {
            Some(json) => serde_json::from_str(&json).map_err(to_js)?,
            None => TrackerConfig::default(),
        };
        Self::from_config(config).map_err(to_js)
    }

    /// Map the reading container from the DOM and start a session.
    /// Returns the number of mapped blocks.
    #[wasm_bindgen(js_name = startReading)]
    pub fn start_reading(&mut self, now_ms: f64) -> Result<usize, JsError> {
        let layout = DomLayout::from_window().map_err(to_js)?;
        let mut session = self.session.borrow_mut();
        session.start_with(&layout, to_millis(now_ms)).map_err(to_js)?;
        Ok(session.blocks().len())
    }

    /// Start a session over blocks the page measured itself, in document
    /// order. Their ids are reassigned from that order.
    #[wasm_bindgen(js_name = startReadingWithBlocks)]
    pub fn start_reading_with_blocks(
        &mut self,
        blocks_json: &str,
        now_ms: f64,
    ) -> Result<usize, JsError> {
        let blocks: Vec<TextBlock> = serde_json::from_str(blocks_json).map_err(to_js)?;
        let mut session = self.session.borrow_mut();
        session.start(blocks, to_millis(now_ms));
        Ok(session.blocks().len())
    }

    /// Re-measure the container after a scroll or resize.
    #[wasm_bindgen]
    pub fn remap(&mut self) -> Result<usize, JsError> {
        let layout = DomLayout::from_window().map_err(to_js)?;
        self.session.borrow_mut().remap_with(&layout).map_err(to_js)
    }

    /// Stop the session. Returns elapsed seconds, `undefined` if not reading.
    #[wasm_bindgen(js_name = stopReading)]
    pub fn stop_reading(&mut self, now_ms: f64) -> Option<f64> {
        self.session.borrow_mut().stop(to_millis(now_ms))
    }

    /// Feed one gaze callback. `x`/`y` are `null` when the tracker found no
    /// face; such callbacks are dropped. Returns the block id the estimate
    /// fell into, or `undefined` when it matched no block, was dropped, or
    /// no session is running.
    #[wasm_bindgen(js_name = pushGaze)]
    pub fn push_gaze(
        &mut self,
        x: Option<f64>,
        y: Option<f64>,
        t_ms: f64,
        width: u32,
        height: u32,
    ) -> Option<usize> {
        let viewport = ViewportSize::new(width, height);
        let estimate = x
            .zip(y)
            .map(|(x, y)| GazeEstimate::new(to_millis(t_ms), x, y, viewport));
        self.last_outcome.set(None);
        self.hub.publish_optional(estimate.as_ref());
        self.last_outcome.get()?.block_id
    }

    #[wasm_bindgen(js_name = isReading)]
    pub fn is_reading(&self) -> bool {
        self.session.borrow().is_reading()
    }

    #[wasm_bindgen(js_name = sampleCount)]
    pub fn sample_count(&self) -> usize {
        self.session.borrow().sample_count()
    }

    #[wasm_bindgen(js_name = durationSec)]
    pub fn duration_sec(&self, now_ms: f64) -> Option<f64> {
        self.session.borrow().duration_sec(to_millis(now_ms))
    }

    /// `{lineChanges, lineBack, lineSkip}`.
    #[wasm_bindgen(js_name = countersJson)]
    pub fn counters_json(&self) -> Result<String, JsError> {
        json(&self.session.borrow().counters())
    }

    /// The latest few samples, for the live panel.
    #[wasm_bindgen(js_name = recentJson)]
    pub fn recent_json(&self) -> Result<String, JsError> {
        json(&self.session.borrow().recent())
    }

    #[wasm_bindgen(js_name = blocksJson)]
    pub fn blocks_json(&self) -> Result<String, JsError> {
        json(&self.session.borrow().blocks())
    }

    /// The downloadable session report, pretty-printed.
    #[wasm_bindgen(js_name = reportJson)]
    pub fn report_json(&self, created_ms: f64, now_ms: f64) -> Result<String, JsError> {
        let created_at = DateTime::from_timestamp_millis(created_ms as i64)
            .ok_or_else(|| JsError::new("timestamp out of range"))?;
        let report = self.session.borrow().report(created_at, to_millis(now_ms));
        okuma_seyri_core::report::to_json_pretty(&report).map_err(to_js)
    }

    #[wasm_bindgen(js_name = reportFileName)]
    pub fn report_file_name() -> String {
        okuma_seyri_protocol::REPORT_FILE_NAME.to_string()
    }

    /// Reading map render commands as JSON, for a canvas renderer.
    #[wasm_bindgen(js_name = readingMapJson)]
    pub fn reading_map_json(&self, width: f64, height: f64) -> Result<String, JsError> {
        let session = self.session.borrow();
        let samples = session.samples().to_vec();
        let commands = render_reading_map(
            session.blocks(),
            &samples,
            session.counters(),
            &Viewport::sized(width, height),
        );
        json(&commands)
    }

    /// Begin calibration for the given window size, or start over if it is
    /// already running. Returns the first target as JSON.
    #[wasm_bindgen(js_name = startCalibration)]
    pub fn start_calibration(&mut self, width: u32, height: u32) -> Result<String, JsError> {
        let viewport = ViewportSize::new(width, height);
        if let Some(calibration) = self.calibration.as_mut() {
            calibration.set_viewport(viewport);
            calibration.restart();
        } else {
            let config = self.session.borrow().config().calibration.clone();
            self.calibration = Some(Calibration::new(&config, viewport));
        }
        json(&self.calibration.as_ref().and_then(Calibration::current))
    }

    /// The target to draw in the current window, `undefined` when
    /// calibration is not running.
    #[wasm_bindgen(js_name = calibrationTargetJson)]
    pub fn calibration_target_json(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<Option<String>, JsError> {
        let Some(calibration) = self.calibration.as_mut() else {
            return Ok(None);
        };
        calibration.set_viewport(ViewportSize::new(width, height));
        calibration.current().map(|t| json(&t)).transpose()
    }

    /// Register a click on the current target, placed in the current window.
    /// The returned `record` position should be passed to the gaze library
    /// as a training point.
    #[wasm_bindgen(js_name = calibrationClick)]
    pub fn calibration_click(&mut self, width: u32, height: u32) -> Result<Option<String>, JsError> {
        let Some(calibration) = self.calibration.as_mut() else {
            return Ok(None);
        };
        calibration.set_viewport(ViewportSize::new(width, height));
        let click = calibration.click();
        if calibration.is_finished() {
            self.calibration = None;
        }
        click.map(|c| json(&c)).transpose()
    }
}

fn to_millis(ms: f64) -> u64 {
    if ms.is_finite() && ms > 0.0 {
        ms as u64
    } else {
        0
    }
}

fn json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(to_js)
}

fn to_js(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}
