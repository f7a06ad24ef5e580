//! Pointer interaction: hotspot annotations and proxy regions.
//!
//! Both kinds of hotspot follow the same pattern: a manager owns the
//! hotspots, each hotspot owns at most one click [`Subscription`], and clicks
//! are delivered explicitly by the host through `handle_click`.

pub mod annotation;
pub mod input;
pub mod listener;
pub mod proxy;

pub use annotation::{Annotation, AnnotationDesc, AnnotationKey, AnnotationManager};
pub use input::Input;
pub use listener::{ClickCallback, ListenerId, Subscription};
pub use proxy::{ProxyRegion, RegionDesc, RegionKey, RegionManager, pulse_opacity};
