//! Spin state machine and the async driver that sequences one spin.
//!
//! The controller owns every piece of mutable wheel state: the topic registry,
//! the selection history, the resting rotation and the layout geometry. A spin
//! moves it from `Idle` to `Spinning`; only the completion of that same spin
//! (matched by id) moves it back and commits the chosen topic.

use crate::config::{
    selected_status, DEFAULT_WHEEL_SIZE_PX, FALLBACK_SWATCH, REMOVED_SWATCH, STATUS_ALL_SELECTED,
    STATUS_PLEASE_WAIT, STATUS_READY,
};
use crate::planner::{plan_rotation, plan_spin, slice_center, SpinPlan};
use crate::utils::{generate_colors, WheelGeometry};
use crate::{choose_index, SelectionHistory, TopicRegistry, WheelError};
use futures::channel::oneshot;
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinStatus {
    Idle,
    Spinning,
}

#[derive(Debug, Clone)]
struct PendingSpin {
    id: u64,
    topic: String,
    plan: SpinPlan,
}

/// Everything the presenter needs to animate a spin that has just started.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinTicket {
    pub id: u64,
    pub topic: String,
    pub from_deg: f64,
    pub plan: SpinPlan,
}

/// Outcome of a committed spin.
#[derive(Debug, Clone, PartialEq)]
pub struct Landing {
    pub id: u64,
    pub topic: String,
    /// Resting rotation in [0, 360)
    pub rotation: f64,
    pub remaining: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliceView {
    pub name: String,
    pub color: String,
    pub center_deg: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub name: String,
    pub removed: bool,
    /// CSS background for the legend swatch
    pub swatch: String,
}

/// Snapshot of the wheel handed to the presenter on every render.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelView {
    /// Active topics only, in slice order
    pub slices: Vec<SliceView>,
    /// Every topic, removed ones included
    pub legend: Vec<LegendEntry>,
    pub history: Vec<String>,
    pub geometry: WheelGeometry,
    pub status_text: String,
    pub trigger_enabled: bool,
}

pub struct SpinController {
    registry: TopicRegistry,
    history: SelectionHistory,
    rotation: f64,
    pending: Option<PendingSpin>,
    next_spin_id: u64,
    status_text: String,
    geometry: WheelGeometry,
    deferred_geometry: Option<WheelGeometry>,
}

impl SpinController {
    pub fn new(registry: TopicRegistry) -> Self {
        let status_text = if registry.is_exhausted() {
            STATUS_ALL_SELECTED.to_string()
        } else {
            STATUS_READY.to_string()
        };
        Self {
            registry,
            history: SelectionHistory::new(),
            rotation: 0.0,
            pending: None,
            next_spin_id: 1,
            status_text,
            geometry: WheelGeometry::from_diameter(DEFAULT_WHEEL_SIZE_PX),
            deferred_geometry: None,
        }
    }

    pub fn status(&self) -> SpinStatus {
        if self.pending.is_some() {
            SpinStatus::Spinning
        } else {
            SpinStatus::Idle
        }
    }

    pub fn registry(&self) -> &TopicRegistry {
        &self.registry
    }

    pub fn history(&self) -> &SelectionHistory {
        &self.history
    }

    /// Resting rotation in degrees; not updated until a spin lands.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn geometry(&self) -> WheelGeometry {
        self.geometry
    }

    pub fn trigger_enabled(&self) -> bool {
        self.pending.is_none() && !self.registry.is_exhausted()
    }

    /// Reject the request if a spin is in flight or nothing is left to pick.
    fn check_can_spin(&mut self) -> Result<usize, WheelError> {
        if self.pending.is_some() {
            debug!("Spin requested while spinning, ignoring");
            self.status_text = STATUS_PLEASE_WAIT.to_string();
            return Err(WheelError::SpinInProgress);
        }
        let n = self.registry.active_count();
        if n == 0 {
            debug!("Spin requested with no topics left");
            self.status_text = STATUS_ALL_SELECTED.to_string();
            return Err(WheelError::AllTopicsExhausted);
        }
        Ok(n)
    }

    /// Start a spin toward a uniformly chosen active topic.
    pub fn request_spin<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) -> Result<SpinTicket, WheelError> {
        let n = self.check_can_spin()?;
        let index = choose_index(rng, n)?;
        let plan = plan_spin(rng, n, index, self.rotation)?;
        Ok(self.start(plan))
    }

    /// Start a spin toward a given active slice with a fixed number of extra turns.
    pub fn begin_spin(&mut self, selected_index: usize, extra_spins: u32) -> Result<SpinTicket, WheelError> {
        let n = self.check_can_spin()?;
        let plan = plan_rotation(n, selected_index, self.rotation, extra_spins)?;
        Ok(self.start(plan))
    }

    fn start(&mut self, plan: SpinPlan) -> SpinTicket {
        let topic = self.registry.active()[plan.selected_index].name.clone();
        let id = self.next_spin_id;
        self.next_spin_id += 1;

        info!(
            "Spin #{} started: '{}' ({} of {}), {} extra turns over {:.1}s",
            id,
            topic,
            plan.selected_index + 1,
            plan.slice_count,
            plan.extra_spins,
            plan.duration_secs
        );

        self.pending = Some(PendingSpin {
            id,
            topic: topic.clone(),
            plan,
        });

        SpinTicket {
            id,
            topic,
            from_deg: self.rotation,
            plan,
        }
    }

    /// Commit the spin with the given id. Any other id, or a repeat, changes nothing.
    pub fn complete_spin(&mut self, id: u64) -> Result<Landing, WheelError> {
        let pending = match self.pending.take() {
            Some(pending) if pending.id == id => pending,
            other => {
                warn!("Ignoring completion for spin #{}", id);
                self.pending = other;
                return Err(WheelError::NoSpinInFlight);
            }
        };

        self.rotation = pending.plan.landed_rotation();

        match self.registry.mark_removed(&pending.topic) {
            Ok(()) => self.history.push(pending.topic.clone()),
            Err(e) => warn!("Spin #{} landed but could not be committed: {}", id, e),
        }

        if let Some(geometry) = self.deferred_geometry.take() {
            debug!("Applying layout deferred during spin #{}", id);
            self.geometry = geometry;
        }

        let remaining = self.registry.active_count();
        self.status_text = if remaining > 0 {
            selected_status(&pending.topic)
        } else {
            STATUS_ALL_SELECTED.to_string()
        };

        info!(
            "Spin #{} landed on '{}' at {:.2}°, {} topics left",
            id, pending.topic, self.rotation, remaining
        );

        Ok(Landing {
            id,
            topic: pending.topic,
            rotation: self.rotation,
            remaining,
        })
    }

    /// Record a new wheel size. Returns the geometry to apply now, or `None` if
    /// nothing changed or a spin is in flight (the change is applied on landing).
    pub fn resize(&mut self, diameter_px: f64) -> Option<WheelGeometry> {
        let geometry = WheelGeometry::from_diameter(diameter_px);
        if self.pending.is_some() {
            self.deferred_geometry = Some(geometry);
            return None;
        }
        if geometry == self.geometry {
            return None;
        }
        self.geometry = geometry;
        Some(geometry)
    }

    pub fn view(&self) -> WheelView {
        let active = self.registry.active();
        let n = active.len();
        let colors = generate_colors(n);

        let slices = active
            .iter()
            .zip(colors.iter())
            .enumerate()
            .map(|(i, (topic, color))| SliceView {
                name: topic.name.clone(),
                color: color.clone(),
                center_deg: slice_center(n, i),
            })
            .collect();

        let color_by_name: HashMap<&str, &str> = active
            .iter()
            .zip(colors.iter())
            .map(|(t, c)| (t.name.as_str(), c.as_str()))
            .collect();

        let legend = self
            .registry
            .all()
            .iter()
            .map(|t| LegendEntry {
                name: t.name.clone(),
                removed: t.removed,
                swatch: if t.removed {
                    REMOVED_SWATCH.to_string()
                } else {
                    color_by_name
                        .get(t.name.as_str())
                        .copied()
                        .unwrap_or(FALLBACK_SWATCH)
                        .to_string()
                },
            })
            .collect();

        WheelView {
            slices,
            legend,
            history: self.history.names().to_vec(),
            geometry: self.geometry,
            status_text: self.status_text.clone(),
            trigger_enabled: self.trigger_enabled(),
        }
    }
}

/// Receiving half of a spin's one-shot completion signal.
pub struct SpinCompletion {
    rx: oneshot::Receiver<()>,
}

/// Sending half; only the first `fire` is delivered.
pub struct CompletionSignal {
    tx: Cell<Option<oneshot::Sender<()>>>,
}

impl CompletionSignal {
    /// Returns false if the signal had already fired.
    pub fn fire(&self) -> bool {
        match self.tx.take() {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }
}

impl SpinCompletion {
    pub fn pair() -> (CompletionSignal, SpinCompletion) {
        let (tx, rx) = oneshot::channel();
        (CompletionSignal { tx: Cell::new(Some(tx)) }, SpinCompletion { rx })
    }

    /// A completion that has already fired, for presenters that cannot animate.
    pub fn ready() -> SpinCompletion {
        let (signal, completion) = Self::pair();
        signal.fire();
        completion
    }

    /// Resolves once the animation finished. `false` means the signal was
    /// dropped without firing.
    pub async fn wait(self) -> bool {
        self.rx.await.is_ok()
    }
}

/// Visual side of the wheel.
pub trait Presenter {
    /// Redraw slices, labels, legend and history from a snapshot.
    fn render(&self, view: &WheelView);
    fn set_trigger_enabled(&self, enabled: bool);
    fn set_status_text(&self, text: &str);
    /// Animate from `from_deg` to `to_deg`; the returned completion fires once the
    /// wheel shows `to_deg`.
    fn animate_rotation(&self, from_deg: f64, to_deg: f64, duration_secs: f64) -> SpinCompletion;
    /// Jump to `deg` without a transition, then re-arm transitions for the next spin.
    fn snap_rotation(&self, deg: f64);
}

/// Run one spin end to end: request, animate, wait, commit, redraw.
///
/// Rejected requests only update the status text and trigger state. The
/// controller is never borrowed across the wait, so other events (resizes,
/// further clicks) can reach it while the wheel turns.
pub async fn run_spin<P, R>(
    controller: &RefCell<SpinController>,
    presenter: &P,
    rng: &mut R,
) -> Result<Landing, WheelError>
where
    P: Presenter + ?Sized,
    R: rand::Rng + ?Sized,
{
    let requested = controller.borrow_mut().request_spin(rng);
    let ticket = match requested {
        Ok(ticket) => ticket,
        Err(e) => {
            let ctrl = controller.borrow();
            presenter.set_status_text(ctrl.status_text());
            presenter.set_trigger_enabled(ctrl.trigger_enabled());
            return Err(e);
        }
    };

    presenter.set_trigger_enabled(false);
    let completion = presenter.animate_rotation(
        ticket.from_deg,
        ticket.plan.final_rotation,
        ticket.plan.duration_secs,
    );
    if !completion.wait().await {
        warn!("Spin #{} lost its completion signal, committing anyway", ticket.id);
    }

    let landing = controller.borrow_mut().complete_spin(ticket.id)?;
    presenter.snap_rotation(landing.rotation);

    let view = controller.borrow().view();
    presenter.render(&view);
    presenter.set_status_text(&view.status_text);
    presenter.set_trigger_enabled(view.trigger_enabled);
    Ok(landing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::slice_under_pointer;
    use futures::executor::block_on;
    use futures::FutureExt;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn controller() -> SpinController {
        SpinController::new(
            TopicRegistry::from_names(["AI", "Cybersecurity", "C programming", "Cloud computing", "Browsers"])
                .unwrap(),
        )
    }

    #[derive(Default)]
    struct HeldPresenter {
        signal: RefCell<Option<CompletionSignal>>,
        animations: RefCell<Vec<(f64, f64, f64)>>,
        snaps: RefCell<Vec<f64>>,
        statuses: RefCell<Vec<String>>,
        trigger: Cell<Option<bool>>,
        renders: Cell<usize>,
    }

    impl Presenter for HeldPresenter {
        fn render(&self, _view: &WheelView) {
            self.renders.set(self.renders.get() + 1);
        }
        fn set_trigger_enabled(&self, enabled: bool) {
            self.trigger.set(Some(enabled));
        }
        fn set_status_text(&self, text: &str) {
            self.statuses.borrow_mut().push(text.to_string());
        }
        fn animate_rotation(&self, from_deg: f64, to_deg: f64, duration_secs: f64) -> SpinCompletion {
            self.animations.borrow_mut().push((from_deg, to_deg, duration_secs));
            let (signal, completion) = SpinCompletion::pair();
            *self.signal.borrow_mut() = Some(signal);
            completion
        }
        fn snap_rotation(&self, deg: f64) {
            self.snaps.borrow_mut().push(deg);
        }
    }

    /// Loses every completion signal, as when the wheel unmounts mid-spin.
    #[derive(Default)]
    struct DroppingPresenter {
        animations: Cell<usize>,
        snaps: RefCell<Vec<f64>>,
    }

    impl Presenter for DroppingPresenter {
        fn render(&self, _view: &WheelView) {}
        fn set_trigger_enabled(&self, _enabled: bool) {}
        fn set_status_text(&self, _text: &str) {}
        fn animate_rotation(&self, _from_deg: f64, _to_deg: f64, _duration_secs: f64) -> SpinCompletion {
            self.animations.set(self.animations.get() + 1);
            let (signal, completion) = SpinCompletion::pair();
            drop(signal);
            completion
        }
        fn snap_rotation(&self, deg: f64) {
            self.snaps.borrow_mut().push(deg);
        }
    }

    #[test]
    fn starts_idle_with_ready_status() {
        let ctrl = controller();
        assert_eq!(ctrl.status(), SpinStatus::Idle);
        assert_eq!(ctrl.status_text(), STATUS_READY);
        assert!(ctrl.trigger_enabled());
        assert_eq!(ctrl.rotation(), 0.0);
    }

    #[test]
    fn first_spin_toward_middle_slice_matches_hand_computation() {
        let mut ctrl = controller();
        let ticket = ctrl.begin_spin(2, 2).unwrap();
        assert_eq!(ticket.topic, "C programming");
        assert_eq!(ticket.from_deg, 0.0);
        assert!((ticket.plan.final_rotation - 630.0).abs() < 1e-9);
        assert!((ticket.plan.duration_secs - 2.8).abs() < 1e-9);
        assert_eq!(ctrl.status(), SpinStatus::Spinning);
        assert!(!ctrl.trigger_enabled());

        let landing = ctrl.complete_spin(ticket.id).unwrap();
        assert_eq!(landing.topic, "C programming");
        assert!((landing.rotation - 270.0).abs() < 1e-9);
        assert_eq!(landing.remaining, 4);
        assert_eq!(ctrl.history().names(), ["C programming"]);
        assert_eq!(ctrl.status_text(), "🎯 Selected: C programming");
        assert!(ctrl.trigger_enabled());
    }

    #[test]
    fn second_request_while_spinning_changes_nothing_but_status() {
        let mut ctrl = controller();
        let mut rng = StdRng::seed_from_u64(11);
        let ticket = ctrl.request_spin(&mut rng).unwrap();
        let registry_before = ctrl.registry().clone();

        assert_eq!(ctrl.request_spin(&mut rng), Err(WheelError::SpinInProgress));
        assert_eq!(ctrl.begin_spin(0, 2), Err(WheelError::SpinInProgress));
        assert_eq!(ctrl.status_text(), STATUS_PLEASE_WAIT);
        assert_eq!(ctrl.registry(), &registry_before);
        assert!(ctrl.history().is_empty());
        assert_eq!(ctrl.status(), SpinStatus::Spinning);

        let landing = ctrl.complete_spin(ticket.id).unwrap();
        assert!((landing.rotation - ticket.plan.landed_rotation()).abs() < 1e-9);
    }

    #[test]
    fn duplicate_or_stale_completion_is_ignored() {
        let mut ctrl = controller();
        let ticket = ctrl.begin_spin(0, 3).unwrap();
        assert_eq!(ctrl.complete_spin(ticket.id + 1), Err(WheelError::NoSpinInFlight));
        assert_eq!(ctrl.status(), SpinStatus::Spinning);

        ctrl.complete_spin(ticket.id).unwrap();
        assert_eq!(ctrl.complete_spin(ticket.id), Err(WheelError::NoSpinInFlight));
        assert_eq!(ctrl.history().len(), 1);
        assert_eq!(ctrl.registry().active_count(), 4);
    }

    #[test]
    fn exhausted_wheel_rejects_spins() {
        let mut ctrl = SpinController::new(TopicRegistry::from_names(["Only"]).unwrap());
        let ticket = ctrl.begin_spin(0, 2).unwrap();
        ctrl.complete_spin(ticket.id).unwrap();
        assert_eq!(ctrl.status_text(), STATUS_ALL_SELECTED);
        assert!(!ctrl.trigger_enabled());

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(ctrl.request_spin(&mut rng), Err(WheelError::AllTopicsExhausted));
        assert_eq!(ctrl.status_text(), STATUS_ALL_SELECTED);
        assert_eq!(ctrl.history().len(), 1);
    }

    #[test]
    fn resize_is_deferred_until_landing() {
        let mut ctrl = controller();
        assert_eq!(ctrl.resize(DEFAULT_WHEEL_SIZE_PX), None);
        assert_eq!(ctrl.resize(500.0), Some(WheelGeometry::from_diameter(500.0)));

        let ticket = ctrl.begin_spin(1, 2).unwrap();
        assert_eq!(ctrl.resize(300.0), None);
        assert_eq!(ctrl.geometry().diameter_px, 500.0);

        ctrl.complete_spin(ticket.id).unwrap();
        assert_eq!(ctrl.geometry(), WheelGeometry::from_diameter(300.0));
    }

    #[test]
    fn view_separates_wheel_from_legend() {
        let mut ctrl = controller();
        let ticket = ctrl.begin_spin(0, 2).unwrap();
        ctrl.complete_spin(ticket.id).unwrap();

        let view = ctrl.view();
        let names: Vec<&str> = view.slices.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Cybersecurity", "C programming", "Cloud computing", "Browsers"]);
        assert_eq!(view.slices[0].color, "hsl(220 75% 45%)");
        assert!((view.slices[1].center_deg - 135.0).abs() < 1e-9);

        assert_eq!(view.legend.len(), 5);
        assert!(view.legend[0].removed);
        assert_eq!(view.legend[0].swatch, REMOVED_SWATCH);
        assert_eq!(view.legend[1].swatch, "hsl(220 75% 45%)");
        assert_eq!(view.history, ["AI"]);
        assert!(view.trigger_enabled);
    }

    #[test]
    fn completion_signal_fires_once() {
        let (signal, completion) = SpinCompletion::pair();
        assert!(signal.fire());
        assert!(!signal.fire());
        assert!(block_on(completion.wait()));

        let (signal, completion) = SpinCompletion::pair();
        drop(signal);
        assert!(!block_on(completion.wait()));
    }

    #[test]
    fn driver_commits_only_after_completion_fires() {
        let ctrl = RefCell::new(controller());
        let presenter = HeldPresenter::default();
        let mut rng = StdRng::seed_from_u64(5);

        let mut spin = Box::pin(run_spin(&ctrl, &presenter, &mut rng));
        assert!(spin.as_mut().now_or_never().is_none());

        assert_eq!(ctrl.borrow().status(), SpinStatus::Spinning);
        assert_eq!(presenter.trigger.get(), Some(false));
        assert!(ctrl.borrow().history().is_empty());

        // a click while the wheel turns
        let mut other_rng = StdRng::seed_from_u64(6);
        let rejected = block_on(run_spin(&ctrl, &presenter, &mut other_rng));
        assert_eq!(rejected, Err(WheelError::SpinInProgress));
        assert_eq!(presenter.animations.borrow().len(), 1);
        assert_eq!(presenter.statuses.borrow().last().unwrap(), STATUS_PLEASE_WAIT);

        let signal = presenter.signal.borrow_mut().take().unwrap();
        assert!(signal.fire());
        assert!(!signal.fire());

        let landing = block_on(spin).unwrap();
        let (from, to, secs) = presenter.animations.borrow()[0];
        assert_eq!(from, 0.0);
        assert!((2.0..=4.0).contains(&secs));
        assert_eq!(presenter.snaps.borrow().as_slice(), [landing.rotation]);
        assert!((landing.rotation - crate::planner::normalize_degrees(to)).abs() < 1e-9);

        let ctrl = ctrl.borrow();
        assert_eq!(ctrl.history().names(), [landing.topic.clone()]);
        assert_eq!(ctrl.status(), SpinStatus::Idle);
        assert_eq!(presenter.renders.get(), 1);
        assert_eq!(presenter.trigger.get(), Some(true));
        assert_eq!(presenter.statuses.borrow().last().unwrap(), &selected_status(&landing.topic));

        let before = TopicRegistry::from_names(["AI", "Cybersecurity", "C programming", "Cloud computing", "Browsers"])
            .unwrap();
        let landed_index = before
            .active()
            .iter()
            .position(|t| t.name == landing.topic)
            .unwrap();
        assert_eq!(slice_under_pointer(5, to), Some(landed_index));
    }

    #[test]
    fn driver_commits_when_completion_signal_is_lost() {
        let ctrl = RefCell::new(controller());
        let presenter = DroppingPresenter::default();
        let mut rng = StdRng::seed_from_u64(9);

        let landing = block_on(run_spin(&ctrl, &presenter, &mut rng)).unwrap();

        let ctrl = ctrl.borrow();
        assert_eq!(presenter.animations.get(), 1);
        assert_eq!(ctrl.status(), SpinStatus::Idle);
        assert_eq!(ctrl.history().names(), [landing.topic.clone()]);
        assert_eq!(ctrl.registry().active_count(), 4);
        assert_eq!(landing.remaining, 4);
        assert_eq!(presenter.snaps.borrow().as_slice(), [landing.rotation]);
        assert!(ctrl.trigger_enabled());
    }
}
