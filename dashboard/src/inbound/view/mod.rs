//! View models for the screens a renderer draws.
//!
//! [`ViewRouter`] follows the session store and decides between the loading
//! placeholder, the two unauthenticated forms and the dashboard shell. The
//! shell's [`ProfileMenu`] listens on the [`PointerBus`] only while open.

mod dashboard;
pub mod pointer;
mod profile_menu;
mod router;

pub use dashboard::DashboardView;
pub use pointer::{Bounds, Point, PointerBus, PointerPress, PointerSubscription};
pub use profile_menu::ProfileMenu;
pub use router::{AuthScreen, LOADING_CAPTION, SignInRedirect, View, ViewRouter};
