pub mod ban;
pub(crate) mod embeds;
pub mod enforcement;
pub mod history;
pub mod mute;
pub mod panel;
pub mod render;
pub mod warn;

pub use panel::{handle_component, handle_modal};
pub use render::{FormSubmission, RenderRequest};
