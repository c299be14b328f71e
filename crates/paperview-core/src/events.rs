//! Typed event source and the events emitted by a paper area.

use crate::input::PointerInfo;
use crate::options::PointerMode;
use kurbo::{Point, Size, Vec2};
use std::cell::RefCell;

/// Identifies a subscription returned by [`EventSource::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<E> = Box<dyn FnMut(&E)>;

struct Listeners<E> {
    next_id: u64,
    entries: Vec<(ListenerId, Listener<E>)>,
    removed: Vec<ListenerId>,
    /// Nesting level of in-flight [`EventSource::trigger`] calls.
    depth: usize,
}

/// Synchronous fire-and-forget event dispatch.
///
/// Listeners may subscribe or unsubscribe from inside a callback; such changes
/// take effect for the next [`trigger`](Self::trigger).
pub struct EventSource<E> {
    listeners: RefCell<Listeners<E>>,
}

impl<E> Default for EventSource<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for EventSource<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSource")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<E> EventSource<E> {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
                removed: Vec::new(),
                depth: 0,
            }),
        }
    }

    /// Register a listener for every subsequently triggered event.
    pub fn subscribe(&self, listener: impl FnMut(&E) + 'static) -> ListenerId {
        let mut listeners = self.listeners.borrow_mut();
        let id = ListenerId(listeners.next_id);
        listeners.next_id += 1;
        listeners.entries.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: ListenerId) {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.entries.len();
        listeners.entries.retain(|(entry_id, _)| *entry_id != id);
        if listeners.entries.len() == before {
            // Might be detached by an in-flight trigger.
            listeners.removed.push(id);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }

    /// Deliver `event` to all listeners in subscription order.
    ///
    /// A listener that triggers another event while being called only reaches
    /// listeners subscribed during the outer dispatch; the listeners being
    /// dispatched are not re-entered. Unsubscriptions take effect once the
    /// outermost dispatch returns.
    pub fn trigger(&self, event: &E) {
        let mut dispatching = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.depth += 1;
            std::mem::take(&mut listeners.entries)
        };
        for (id, listener) in dispatching.iter_mut() {
            if !self.listeners.borrow().removed.contains(id) {
                listener(event);
            }
        }
        let mut listeners = self.listeners.borrow_mut();
        listeners.depth -= 1;
        dispatching.append(&mut listeners.entries);
        if listeners.depth == 0 {
            let removed = std::mem::take(&mut listeners.removed);
            dispatching.retain(|(id, _)| !removed.contains(id));
        }
        listeners.entries = dispatching;
    }
}

/// Events emitted by a [`PaperArea`](crate::PaperArea).
///
/// `C` is the content strategy's cell type; `None` targets mean the empty
/// canvas area.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent<C> {
    PointerDown {
        pointer: PointerInfo,
        target: Option<C>,
        /// Whether the gesture pans the viewport.
        panning: bool,
    },
    PointerMove {
        pointer: PointerInfo,
        target: Option<C>,
        panning: bool,
    },
    PointerUp {
        pointer: PointerInfo,
        target: Option<C>,
        panning: bool,
        /// No qualifying movement and no pinch happened during the gesture.
        trigger_as_click: bool,
    },
    /// The viewport scroll offset changed.
    Scroll { offset: Vec2 },
    /// A drag-and-drop payload was dropped at `position` (paper coordinates).
    Drop { position: Point },
    /// Context menu requested over `target`.
    ContextMenu { target: Option<C>, position: Point },
    /// The viewport client area was resized.
    Resize { client_size: Size },
    ChangePointerMode { previous: PointerMode },
    ChangeScale { previous: f64 },
    ChangeAnimating { previous: bool },
}
