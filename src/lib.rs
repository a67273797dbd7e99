// ============================================================================
// FLEET DASHBOARD - Núcleo cliente del panel de operaciones logísticas
// ============================================================================
// Arquitectura MVVM:
// - Models: Estructuras compartidas con backend
// - Services: SOLO comunicación API
// - State: Estado reactivo, sesión y notificaciones
// - Stores: Un escritor por recurso
// - ViewModels: Asistentes (importación masiva, onboarding)
// ============================================================================

pub mod app;
pub mod config;
pub mod models;
pub mod runtime;
pub mod services;
pub mod state;
pub mod stores;
pub mod utils;
pub mod viewmodels;

pub use app::App;
pub use config::{AppConfig, CONFIG};

#[cfg(target_arch = "wasm32")]
mod entry {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;

    use crate::app::App;
    use crate::config::CONFIG;

    // Instancia global de la app
    thread_local! {
        static APP: RefCell<Option<App>> = RefCell::new(None);
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let level = if CONFIG.is_logging_enabled() {
            log::Level::Info
        } else {
            log::Level::Warn
        };
        wasm_logger::init(wasm_logger::Config::new(level));
        log::info!("🚀 Fleet Dashboard ({})", CONFIG.environment);

        let app = App::browser(CONFIG.clone());
        APP.with(|cell| *cell.borrow_mut() = Some(app));
        Ok(())
    }

    /// El proveedor de sesión entrega el token tras el login
    #[wasm_bindgen]
    pub fn sign_in(token: String, tenant_id: Option<String>, user_name: Option<String>) {
        APP.with(|cell| {
            if let Some(app) = cell.borrow().as_ref() {
                app.auth.sign_in(token, tenant_id, user_name);
            }
        });
    }

    #[wasm_bindgen]
    pub fn sign_out() {
        APP.with(|cell| {
            if let Some(app) = cell.borrow().as_ref() {
                app.sign_out();
            }
        });
    }
}
