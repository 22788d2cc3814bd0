// event.rs - panorama events and listener registry

use crate::panorama::PanoramaId;
use std::collections::HashMap;

/// Request for the viewer-level controller. The panorama never switches scenes itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerRequest {
    SetPanorama(PanoramaId),
}

impl ViewerRequest {
    pub fn method(&self) -> &'static str {
        match self {
            ViewerRequest::SetPanorama(_) => "setPanorama",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanoramaEvent {
    Load,
    Progress(f32),
    Error,
    Enter,
    EnterStart,
    Leave,
    ViewerHandler(ViewerRequest),
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum EventKind {
    Load,
    Progress,
    Error,
    Enter,
    EnterStart,
    Leave,
    ViewerHandler,
}

impl EventKind {
    /// Wire name of the event type.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Load => "load",
            EventKind::Progress => "progress",
            EventKind::Error => "error",
            EventKind::Enter => "enter",
            EventKind::EnterStart => "enter-start",
            EventKind::Leave => "leave",
            EventKind::ViewerHandler => "panolens-viewer-handler",
        }
    }
}

impl PanoramaEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PanoramaEvent::Load => EventKind::Load,
            PanoramaEvent::Progress(_) => EventKind::Progress,
            PanoramaEvent::Error => EventKind::Error,
            PanoramaEvent::Enter => EventKind::Enter,
            PanoramaEvent::EnterStart => EventKind::EnterStart,
            PanoramaEvent::Leave => EventKind::Leave,
            PanoramaEvent::ViewerHandler(_) => EventKind::ViewerHandler,
        }
    }
}

pub type ListenerId = u32;

type Listener = Box<dyn FnMut(&PanoramaEvent)>;

/// Synchronous dispatch: listeners run inside `dispatch`, in registration order.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: HashMap<EventKind, Vec<(ListenerId, Listener)>>,
    next_id: ListenerId,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&PanoramaEvent) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners
            .entry(kind)
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        for list in self.listeners.values_mut() {
            if let Some(pos) = list.iter().position(|(lid, _)| *lid == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    pub fn dispatch(&mut self, event: &PanoramaEvent) {
        if let Some(list) = self.listeners.get_mut(&event.kind()) {
            for (_, listener) in list.iter_mut() {
                listener(event);
            }
        }
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .listeners
            .iter()
            .map(|(k, v)| (k.as_str(), v.len()))
            .collect();
        f.debug_struct("EventDispatcher")
            .field("listeners", &counts)
            .finish()
    }
}
