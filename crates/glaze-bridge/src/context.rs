//! Context ownership and the process-wide "current context" indirection.
//!
//! The wrapped GUI library exposes a single implicit current-state slot, so
//! the bridge mirrors it with one thread-confined cell here, at the
//! outermost layer. Component APIs take the context explicitly; only this
//! module and the library itself deal in ambient state.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use tracing::{debug, trace};

use glaze_core::{Io, TextureHandle, TextureId, TextureRegistry};

use crate::driver::{GuiDriver, StateHandle};

/// Callback building UI during the layout phase of a frame.
pub type LayoutFn = Box<dyn FnMut() -> Result<()>>;

thread_local! {
    static CURRENT: RefCell<Option<CurrentSlot>> = const { RefCell::new(None) };
    static GLOBAL_LAYOUT: RefCell<Vec<LayoutFn>> = const { RefCell::new(Vec::new()) };
}

struct CurrentSlot {
    state: StateHandle,
    textures: Rc<RefCell<TextureRegistry>>,
    driver: Rc<dyn GuiDriver>,
}

/// One GUI-library state block plus the io and texture registry scoped to
/// it. At most one context is current at any instant; see [`make_current`].
pub struct Context {
    state: StateHandle,
    /// Per-frame io block; the platform backend refreshes it every tick
    pub io: Io,
    textures: Rc<RefCell<TextureRegistry>>,
    driver: Rc<dyn GuiDriver>,
}

impl Context {
    /// Allocate the library state and a fresh registry. Pure allocation; no
    /// backend or font work happens here.
    pub fn new(driver: Rc<dyn GuiDriver>) -> Self {
        let state = driver.create_state();
        debug!(state = state.0, "created gui context");
        Self {
            state,
            io: Io::new(),
            textures: Rc::new(RefCell::new(TextureRegistry::new())),
            driver,
        }
    }

    pub fn state(&self) -> StateHandle {
        self.state
    }

    /// Run `f` against this context's texture registry.
    pub fn with_textures<R>(&self, f: impl FnOnce(&mut TextureRegistry) -> R) -> R {
        f(&mut self.textures.borrow_mut())
    }

    /// Whether the process-wide slot currently points at this context.
    pub fn is_current(&self) -> bool {
        CURRENT.with(|cell| {
            cell.borrow()
                .as_ref()
                .is_some_and(|slot| Rc::ptr_eq(&slot.textures, &self.textures))
        })
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        // A dying context must not leave the process-wide slot pointing at
        // freed library state.
        if self.is_current() {
            make_current(None);
        }
        self.textures.borrow_mut().clear();
        self.driver.destroy_state(self.state);
        debug!(state = self.state.0, "destroyed gui context");
    }
}

/// Point the process-wide slot (and the GUI library) at `ctx`, or at
/// nothing. This is the single synchronization point for all implicit
/// library state. Thread-confined: call it only from the update thread.
pub fn make_current(ctx: Option<&Context>) {
    match ctx {
        Some(ctx) => {
            let slot = CurrentSlot {
                state: ctx.state,
                textures: Rc::clone(&ctx.textures),
                driver: Rc::clone(&ctx.driver),
            };
            CURRENT.with(|cell| *cell.borrow_mut() = Some(slot));
            ctx.driver.set_current(Some(ctx.state));
            trace!(state = ctx.state.0, "context made current");
        }
        None => {
            let old = CURRENT.with(|cell| cell.borrow_mut().take());
            if let Some(old) = old {
                old.driver.set_current(None);
                trace!(state = old.state.0, "current context cleared");
            }
        }
    }
}

/// Whether any context is current.
pub fn has_current() -> bool {
    CURRENT.with(|cell| cell.borrow().is_some())
}

/// Texture id for `handle` in the current context's registry, registering
/// it on the fly when new this frame. [`TextureId::INVALID`] when no
/// context is current.
pub fn texture_id(handle: TextureHandle) -> TextureId {
    CURRENT.with(|cell| match cell.borrow().as_ref() {
        Some(slot) => slot.textures.borrow_mut().id_of(handle),
        None => TextureId::INVALID,
    })
}

/// Register a process-wide layout callback. The bridge runs these before
/// its instance callbacks on every frame, when configured for global
/// layout.
pub fn on_global_layout(f: impl FnMut() -> Result<()> + 'static) {
    GLOBAL_LAYOUT.with(|cbs| cbs.borrow_mut().push(Box::new(f)));
}

/// Drop all process-wide layout callbacks.
pub fn clear_global_layout() {
    GLOBAL_LAYOUT.with(|cbs| cbs.borrow_mut().clear());
}

/// Run the global layout tier. Callback errors are collected rather than
/// propagated so one failing callback cannot starve the others.
pub(crate) fn run_global_layout(errors: &mut Vec<anyhow::Error>) {
    // Callbacks may register further callbacks; take the list out so the
    // cell is free during the calls, then splice newcomers back behind the
    // originals.
    let mut callbacks = GLOBAL_LAYOUT.with(|cbs| std::mem::take(&mut *cbs.borrow_mut()));
    for callback in callbacks.iter_mut() {
        if let Err(err) = callback() {
            errors.push(err);
        }
    }
    GLOBAL_LAYOUT.with(|cbs| {
        let mut cell = cbs.borrow_mut();
        let newcomers = std::mem::replace(&mut *cell, callbacks);
        cell.extend(newcomers);
    });
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use glaze_core::{TextureHandle, TextureId};

    use super::*;
    use crate::driver::testing::{new_log, RecordingDriver};

    #[test]
    fn test_make_current_forwards_to_driver() {
        let log = new_log();
        let driver = Rc::new(RecordingDriver::new(log));
        let ctx = Context::new(driver.clone());

        assert!(!ctx.is_current());
        make_current(Some(&ctx));
        assert!(ctx.is_current());
        assert_eq!(driver.current(), Some(ctx.state()));

        make_current(None);
        assert!(!ctx.is_current());
        assert_eq!(driver.current(), None);
    }

    #[test]
    fn test_texture_id_requires_a_current_context() {
        let handle = TextureHandle(0xbeef);
        assert_eq!(texture_id(handle), TextureId::INVALID);

        let driver = Rc::new(RecordingDriver::new(new_log()));
        let ctx = Context::new(driver);
        make_current(Some(&ctx));

        let id = texture_id(handle);
        assert!(id.is_valid());
        // Lookup-or-insert: asking again returns the same id.
        assert_eq!(texture_id(handle), id);
        assert_eq!(ctx.with_textures(|t| t.lookup(id)), Some(handle));

        make_current(None);
        assert_eq!(texture_id(handle), TextureId::INVALID);
    }

    #[test]
    fn test_null_handle_yields_invalid_even_when_current() {
        let driver = Rc::new(RecordingDriver::new(new_log()));
        let ctx = Context::new(driver);
        make_current(Some(&ctx));
        assert_eq!(texture_id(TextureHandle::NULL), TextureId::INVALID);
        make_current(None);
    }

    #[test]
    fn test_dropping_current_context_clears_the_slot() {
        let driver = Rc::new(RecordingDriver::new(new_log()));
        let ctx = Context::new(driver.clone());
        make_current(Some(&ctx));
        drop(ctx);
        assert!(!has_current());
        assert_eq!(driver.current(), None);
        assert_eq!(driver.live_states(), 0);
    }

    #[test]
    fn test_dropping_non_current_context_leaves_slot_alone() {
        let driver = Rc::new(RecordingDriver::new(new_log()));
        let kept = Context::new(driver.clone());
        let dropped = Context::new(driver.clone());
        make_current(Some(&kept));
        drop(dropped);
        assert!(kept.is_current());
        make_current(None);
    }

    #[test]
    fn test_global_layout_runs_in_registration_order() {
        clear_global_layout();
        let log = new_log();
        let (a, b) = (log.clone(), log.clone());
        on_global_layout(move || {
            a.borrow_mut().push("first".into());
            Ok(())
        });
        on_global_layout(move || {
            b.borrow_mut().push("second".into());
            Ok(())
        });

        let mut errors = Vec::new();
        run_global_layout(&mut errors);
        assert!(errors.is_empty());
        assert_eq!(*log.borrow(), vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_global_layout_collects_errors_and_keeps_going() {
        clear_global_layout();
        let log = new_log();
        let after = log.clone();
        on_global_layout(|| Err(anyhow::anyhow!("boom")));
        on_global_layout(move || {
            after.borrow_mut().push("ran".into());
            Ok(())
        });

        let mut errors = Vec::new();
        run_global_layout(&mut errors);
        assert_eq!(errors.len(), 1);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_callback_registering_callback_does_not_deadlock() {
        clear_global_layout();
        let log = new_log();
        let outer = log.clone();
        on_global_layout(move || {
            let inner = outer.clone();
            on_global_layout(move || {
                inner.borrow_mut().push("inner".into());
                Ok(())
            });
            Ok(())
        });

        let mut errors = Vec::new();
        run_global_layout(&mut errors);
        // The newcomer is deferred to the next tier run.
        assert!(log.borrow().is_empty());
        run_global_layout(&mut errors);
        assert_eq!(log.borrow().len(), 1);
        assert!(errors.is_empty());
    }
}
