//! Dropdown anchored to the navigation bar's user button.

use tracing::error;

use super::pointer::{Bounds, PointerBus, PointerSubscription};
use crate::domain::SessionStore;

/// Open/closed dropdown holding the sign-out action.
///
/// While open, the menu listens on the [`PointerBus`] and closes on the first
/// press outside its bounds. Closing (or dropping) the menu drops the
/// subscription.
#[derive(Debug)]
pub struct ProfileMenu {
    bus: PointerBus,
    bounds: Bounds,
    outside_presses: Option<PointerSubscription>,
}

impl ProfileMenu {
    /// Closed menu occupying `bounds` once shown.
    pub fn new(bus: PointerBus, bounds: Bounds) -> Self {
        Self {
            bus,
            bounds,
            outside_presses: None,
        }
    }

    /// True while the dropdown is shown.
    pub fn is_open(&self) -> bool {
        self.outside_presses.is_some()
    }

    /// Area covered by the button and dropdown.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Move or resize the menu's hit area.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Show the dropdown.
    pub fn open(&mut self) {
        if self.outside_presses.is_none() {
            self.outside_presses = Some(self.bus.subscribe());
        }
    }

    /// Hide the dropdown.
    pub fn close(&mut self) {
        self.outside_presses = None;
    }

    /// Flip between open and closed.
    pub fn toggle(&mut self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    /// Drain pending pointer presses, closing on any outside the menu.
    ///
    /// Returns whether the menu is still open.
    pub fn process_pointer_events(&mut self) -> bool {
        let Some(subscription) = self.outside_presses.as_mut() else {
            return false;
        };
        let bounds = self.bounds;
        let outside = subscription
            .drain()
            .iter()
            .any(|press| !bounds.contains(press.position));
        if outside {
            self.close();
        }
        self.is_open()
    }

    /// Close the menu and sign out.
    ///
    /// The session always ends locally; a failure reported by the identity
    /// service is logged and not surfaced.
    pub async fn sign_out(&mut self, store: &SessionStore) {
        self.close();
        if let Err(err) = store.sign_out().await {
            error!(error = %err, "sign-out request failed");
        }
    }
}
