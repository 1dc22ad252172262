// ============================================================================
// VIEWS - Functions that build DOM from view-model state (no logic)
// ============================================================================

pub mod widgets;
pub mod feedback;
pub mod layout;
pub mod login;
pub mod dashboard;
pub mod pacientes;
pub mod consultas;
pub mod telemedicina;

pub use feedback::{mount_loading_bar, mount_snackbar};
pub use layout::{render_layout, render_not_found};
pub use login::render_login;
pub use dashboard::{render_dashboard, render_dashboard_avancado};
pub use pacientes::render_pacientes;
pub use consultas::render_consultas;
pub use telemedicina::render_telemedicina;
