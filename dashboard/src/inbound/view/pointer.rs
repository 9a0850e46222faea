//! Pointer press bus shared by the renderer and transient widgets.
//!
//! The renderer publishes every pointer press; widgets that care about
//! presses outside themselves subscribe while they are visible and drop the
//! subscription when they hide, which unregisters them.

use tokio::sync::broadcast::{self, error::TryRecvError};

const DEFAULT_CAPACITY: usize = 32;

/// Screen position in renderer units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    /// Horizontal offset from the left edge.
    pub x: i32,
    /// Vertical offset from the top edge.
    pub y: i32,
}

impl Point {
    /// Build a point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle occupied by a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    /// Top-left corner.
    pub origin: Point,
    /// Width in renderer units.
    pub width: u32,
    /// Height in renderer units.
    pub height: u32,
}

impl Bounds {
    /// Build bounds from a corner and a size.
    pub const fn new(origin: Point, width: u32, height: u32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// True when `point` lies inside, edges included on the top-left.
    pub fn contains(&self, point: Point) -> bool {
        let dx = i64::from(point.x) - i64::from(self.origin.x);
        let dy = i64::from(point.y) - i64::from(self.origin.y);
        (0..i64::from(self.width)).contains(&dx) && (0..i64::from(self.height)).contains(&dy)
    }
}

/// A pointer press at a screen position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerPress {
    /// Where the press landed.
    pub position: Point,
}

/// Fan-out channel for pointer presses.
#[derive(Debug, Clone)]
pub struct PointerBus {
    sender: broadcast::Sender<PointerPress>,
}

impl Default for PointerBus {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl PointerBus {
    /// Bus buffering up to `capacity` undrained presses per subscriber.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Deliver a press to every live subscriber, returning how many got it.
    pub fn publish(&self, press: PointerPress) -> usize {
        self.sender.send(press).unwrap_or(0)
    }

    /// Start receiving presses published from now on.
    pub fn subscribe(&self) -> PointerSubscription {
        PointerSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Live registration on a [`PointerBus`]; dropping it unregisters.
#[derive(Debug)]
pub struct PointerSubscription {
    receiver: broadcast::Receiver<PointerPress>,
}

impl PointerSubscription {
    /// Take every press buffered since the last drain.
    ///
    /// Presses lost to buffer overflow are skipped.
    pub fn drain(&mut self) -> Vec<PointerPress> {
        let mut presses = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(press) => presses.push(press),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "pointer subscriber lagged");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return presses,
            }
        }
    }
}
