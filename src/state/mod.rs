// ============================================================================
// STATE MODULE - Rc<RefCell> state shared across screens
// ============================================================================

pub mod reactivity;
pub mod loading_state;
pub mod session_context;
pub mod notification_state;
pub mod app_state;

pub use reactivity::*;
pub use loading_state::*;
pub use session_context::*;
pub use notification_state::*;
pub use app_state::*;
