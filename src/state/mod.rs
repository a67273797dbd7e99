// ============================================================================
// STATE MODULE - State Management con Rc<RefCell> + notificaciones
// ============================================================================

pub mod reactivity;
pub mod collection_state;
pub mod auth_state;
pub mod notifications;
pub mod generation;

pub use reactivity::*;
pub use collection_state::*;
pub use auth_state::*;
pub use notifications::*;
pub use generation::*;
