//! Modal activation loop and key injection.
//!
//! Dispatch order for one key:
//!
//! 1. pre-process hook (false swallows the key)
//! 2. binding for `(W::TYPE, key)` (true stops activation)
//! 3. escape key, refresh key, then the widget's own `handle_key`
//! 4. post-process hook, for keys that did not stop activation

use tracing::{debug, trace};

use super::{KeyOutcome, Widget};
use crate::error::Result;
use crate::input::{InputEvent, Key};
use crate::types::ExitState;

/// Run a widget until a key ends activation or input closes.
pub fn run<W: Widget>(widget: &mut W, actions: &[Key]) -> Result<Option<W::Output>> {
    widget.base_mut().set_exit_state(ExitState::None);
    let boxed = widget.base().is_boxed();
    widget.draw(boxed)?;

    let screen = widget.base().screen().clone();
    let mut preloaded = actions.iter().copied();
    debug!(kind = %W::TYPE, preloaded = actions.len(), "activation started");

    loop {
        let key = match preloaded.next() {
            Some(key) => key,
            None => {
                screen.refresh()?;
                match screen.read_event()? {
                    Some(InputEvent::Key(key)) => key,
                    Some(InputEvent::Resize(width, height)) => {
                        screen.set_size(width, height);
                        continue;
                    }
                    None => {
                        debug!(kind = %W::TYPE, "input closed");
                        widget.base_mut().set_exit_state(ExitState::EarlyExit);
                        return Ok(None);
                    }
                }
            }
        };

        if let KeyOutcome::Exit(state, value) = inject(widget, key)? {
            debug!(kind = %W::TYPE, ?state, "activation finished");
            return Ok(value);
        }
    }
}

/// Process one key. Sets the exit state when the key ends activation.
pub fn inject<W: Widget>(widget: &mut W, key: Key) -> Result<KeyOutcome<W::Output>> {
    trace!(kind = %W::TYPE, %key, "inject");
    widget.base_mut().set_exit_state(ExitState::None);

    if let Some(hook) = widget.bindings().pre_process() {
        if !hook(widget, key) {
            trace!(%key, "swallowed by pre-process");
            return Ok(KeyOutcome::Continue);
        }
    }

    let outcome = dispatch(widget, key)?;
    match &outcome {
        KeyOutcome::Exit(state, _) => widget.base_mut().set_exit_state(*state),
        KeyOutcome::Continue => {
            if let Some(hook) = widget.bindings().post_process() {
                hook(widget, key);
            }
        }
    }
    Ok(outcome)
}

fn dispatch<W: Widget>(widget: &mut W, key: Key) -> Result<KeyOutcome<W::Output>> {
    if let Some(handler) = widget.bindings().handler(W::TYPE, key) {
        match handler(widget, key) {
            Some(true) => {
                let state = match widget.exit_state() {
                    ExitState::None => ExitState::EarlyExit,
                    state => state,
                };
                return Ok(KeyOutcome::Exit(state, None));
            }
            Some(false) => return Ok(KeyOutcome::Continue),
            // Context gone or busy: fall through as unbound
            None => {}
        }
    }

    let screen = widget.base().screen().clone();
    if key == screen.escape_key() {
        return Ok(KeyOutcome::Exit(ExitState::EscapeHit, None));
    }
    if key == screen.refresh_key() {
        screen.refresh()?;
        return Ok(KeyOutcome::Continue);
    }
    widget.handle_key(key)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::backend::TestBackend;
    use crate::screen::Screen;
    use crate::types::{Rect, WidgetType};
    use crate::widget::{BindingTable, WidgetBase};

    /// Counts keys; Enter finishes with the count.
    struct Probe {
        base: WidgetBase,
        bindings: BindingTable<Probe>,
        seen: Vec<Key>,
        draws: usize,
    }

    impl Probe {
        fn new(screen: &Screen) -> Self {
            let mut base = WidgetBase::new(screen, false);
            base.attach(WidgetType::Scale, Rect::new(0, 0, 4, 1), false)
                .unwrap();
            Self {
                base,
                bindings: BindingTable::new(),
                seen: Vec::new(),
                draws: 0,
            }
        }
    }

    impl Widget for Probe {
        type Output = usize;
        const TYPE: WidgetType = WidgetType::Scale;

        fn base(&self) -> &WidgetBase {
            &self.base
        }
        fn base_mut(&mut self) -> &mut WidgetBase {
            &mut self.base
        }
        fn bindings(&self) -> &BindingTable<Self> {
            &self.bindings
        }
        fn bindings_mut(&mut self) -> &mut BindingTable<Self> {
            &mut self.bindings
        }

        fn draw(&mut self, _boxed: bool) -> Result<()> {
            self.draws += 1;
            Ok(())
        }

        fn handle_key(&mut self, key: Key) -> Result<KeyOutcome<usize>> {
            if key == Key::Enter {
                return Ok(KeyOutcome::Exit(ExitState::Normal, Some(self.seen.len())));
            }
            self.seen.push(key);
            Ok(KeyOutcome::Continue)
        }
    }

    fn setup() -> (Screen, TestBackend) {
        let backend = TestBackend::new(20, 5);
        (Screen::new(backend.clone()).unwrap(), backend)
    }

    #[test]
    fn test_escape_without_binding() {
        let (screen, _) = setup();
        let mut probe = Probe::new(&screen);
        let result = probe.activate(&[Key::Char('a'), Key::Escape]).unwrap();
        assert_eq!(result, None);
        assert_eq!(probe.exit_state(), ExitState::EscapeHit);
        assert_eq!(probe.seen, vec![Key::Char('a')]);
    }

    #[test]
    fn test_normal_finish_returns_value() {
        let (screen, _) = setup();
        let mut probe = Probe::new(&screen);
        let result = probe
            .activate(&[Key::Char('a'), Key::Char('b'), Key::Enter])
            .unwrap();
        assert_eq!(result, Some(2));
        assert_eq!(probe.exit_state(), ExitState::Normal);
        assert_eq!(probe.draws, 1);
    }

    #[test]
    fn test_reads_backend_after_actions() {
        let (screen, backend) = setup();
        backend.push_keys([Key::Char('z'), Key::Enter]);
        let mut probe = Probe::new(&screen);
        assert_eq!(probe.activate(&[Key::Char('y')]).unwrap(), Some(2));
        assert!(backend.present_count() >= 1);
    }

    #[test]
    fn test_closed_input_is_early_exit() {
        let (screen, _) = setup();
        let mut probe = Probe::new(&screen);
        assert_eq!(probe.activate(&[]).unwrap(), None);
        assert_eq!(probe.exit_state(), ExitState::EarlyExit);
    }

    #[test]
    fn test_resize_event_updates_screen() {
        let (screen, backend) = setup();
        backend.resize(30, 8);
        backend.push_key(Key::Escape);
        let mut probe = Probe::new(&screen);
        probe.activate(&[]).unwrap();
        assert_eq!(screen.size(), (30, 8));
        assert_eq!(probe.exit_state(), ExitState::EscapeHit);
    }

    #[test]
    fn test_binding_runs_before_default() {
        let (screen, _) = setup();
        let mut probe = Probe::new(&screen);
        let calls = Rc::new(RefCell::new(0));
        probe.bind(WidgetType::Scale, Key::Escape, &calls, |_, calls, _| {
            *calls += 1;
            false
        });

        let result = probe.activate(&[Key::Escape, Key::Enter]).unwrap();
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(result, Some(0));
    }

    #[test]
    fn test_stopping_handler_defaults_to_early_exit() {
        let (screen, _) = setup();
        let mut probe = Probe::new(&screen);
        probe.bind_fn(WidgetType::Scale, Key::Char('q'), |_, _| true);
        assert_eq!(probe.activate(&[Key::Char('q')]).unwrap(), None);
        assert_eq!(probe.exit_state(), ExitState::EarlyExit);
    }

    #[test]
    fn test_stopping_handler_keeps_its_exit_state() {
        let (screen, _) = setup();
        let mut probe = Probe::new(&screen);
        probe.bind_fn(WidgetType::Scale, Key::Char('q'), |probe, _| {
            probe.base_mut().set_exit_state(ExitState::Normal);
            true
        });
        probe.activate(&[Key::Char('q')]).unwrap();
        assert_eq!(probe.exit_state(), ExitState::Normal);
    }

    #[test]
    fn test_binding_for_other_type_ignored() {
        let (screen, _) = setup();
        let mut probe = Probe::new(&screen);
        probe.bind_fn(WidgetType::Histogram, Key::Char('q'), |_, _| true);
        probe.activate(&[Key::Char('q'), Key::Escape]).unwrap();
        assert_eq!(probe.seen, vec![Key::Char('q')]);
        assert_eq!(probe.exit_state(), ExitState::EscapeHit);
    }

    #[test]
    fn test_dropped_context_falls_through() {
        let (screen, _) = setup();
        let mut probe = Probe::new(&screen);
        let context = Rc::new(RefCell::new(()));
        probe.bind(WidgetType::Scale, Key::Char('q'), &context, |_, _, _| true);
        drop(context);

        probe.activate(&[Key::Char('q'), Key::Enter]).unwrap();
        assert_eq!(probe.seen, vec![Key::Char('q')]);
        assert_eq!(probe.exit_state(), ExitState::Normal);
    }

    #[test]
    fn test_pre_process_swallows() {
        let (screen, _) = setup();
        let mut probe = Probe::new(&screen);
        probe.set_pre_process(|_, key| !matches!(key, Key::Char('g' | 'G')));
        probe
            .activate(&[Key::Char('g'), Key::Char('a'), Key::Char('G'), Key::Enter])
            .unwrap();
        assert_eq!(probe.seen, vec![Key::Char('a')]);
    }

    #[test]
    fn test_post_process_skips_terminating_key() {
        let (screen, _) = setup();
        let mut probe = Probe::new(&screen);
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        probe.set_post_process(move |_, key| {
            sink.borrow_mut().push(key);
            true
        });
        probe.activate(&[Key::Char('a'), Key::Enter]).unwrap();
        assert_eq!(*log.borrow(), vec![Key::Char('a')]);
    }

    #[test]
    fn test_refresh_key_presents() {
        let (screen, backend) = setup();
        let mut probe = Probe::new(&screen);
        probe.inject(Key::Ctrl('l')).unwrap();
        assert_eq!(backend.present_count(), 1);
        assert!(probe.seen.is_empty());
    }

    #[test]
    fn test_activate_resets_exit_state() {
        let (screen, _) = setup();
        let mut probe = Probe::new(&screen);
        probe.activate(&[Key::Escape]).unwrap();
        assert_eq!(probe.exit_state(), ExitState::EscapeHit);
        probe.activate(&[Key::Enter]).unwrap();
        assert_eq!(probe.exit_state(), ExitState::Normal);
    }
}
