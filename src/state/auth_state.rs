// ============================================================================
// AUTH STATE - Token de sesión + cascada de cierre de sesión ante 401
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

type SignOutHandler = Rc<dyn Fn()>;

/// Estado de autenticación compartido por ApiClient y los stores
#[derive(Clone, Default)]
pub struct AuthState {
    pub is_logged_in: Rc<RefCell<bool>>,
    pub user_name: Rc<RefCell<Option<String>>>,
    pub token: Rc<RefCell<Option<String>>>,
    pub tenant_id: Rc<RefCell<Option<String>>>,
    signing_out: Rc<Cell<bool>>,
    sign_out_handlers: Rc<RefCell<Vec<SignOutHandler>>>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Guarda el token entregado por el proveedor de sesión
    pub fn sign_in(&self, token: impl Into<String>, tenant_id: Option<String>, user_name: Option<String>) {
        *self.token.borrow_mut() = Some(token.into());
        *self.tenant_id.borrow_mut() = tenant_id;
        *self.user_name.borrow_mut() = user_name;
        *self.is_logged_in.borrow_mut() = true;
        self.signing_out.set(false);
        log::info!("🔐 [AUTH] Sesión iniciada");
    }

    pub fn get_token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    pub fn get_tenant_id(&self) -> Option<String> {
        self.tenant_id.borrow().clone()
    }

    pub fn get_logged_in(&self) -> bool {
        *self.is_logged_in.borrow()
    }

    pub fn is_signing_out(&self) -> bool {
        self.signing_out.get()
    }

    /// Registra un callback que se ejecuta al cerrar la sesión por 401
    pub fn on_sign_out<F>(&self, handler: F)
    where
        F: Fn() + 'static,
    {
        self.sign_out_handlers.borrow_mut().push(Rc::new(handler));
    }

    /// Cascada de cierre de sesión. Solo la primera llamada de la sesión la ejecuta;
    /// devuelve `false` si ya estaba en curso o hecha.
    pub fn handle_unauthorized(&self) -> bool {
        if self.signing_out.replace(true) {
            log::debug!("🔐 [AUTH] 401 ignorado: cierre de sesión ya en curso");
            return false;
        }

        log::warn!("⚠️ [AUTH] 401 recibido, cerrando sesión");
        self.clear_credentials();

        // Copia para que un handler pueda registrar otros sin doble borrow
        let handlers: Vec<SignOutHandler> = self.sign_out_handlers.borrow().clone();
        for handler in handlers {
            handler();
        }
        true
    }

    /// Logout voluntario: limpia credenciales sin disparar la cascada
    pub fn logout(&self) {
        self.clear_credentials();
        self.signing_out.set(false);
    }

    fn clear_credentials(&self) {
        *self.is_logged_in.borrow_mut() = false;
        *self.user_name.borrow_mut() = None;
        *self.token.borrow_mut() = None;
        *self.tenant_id.borrow_mut() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_cascade_runs_once_per_session() {
        let auth = AuthState::new();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        auth.on_sign_out(move || counter.set(counter.get() + 1));

        auth.sign_in("token-1", Some("tenant-a".into()), None);
        assert!(auth.handle_unauthorized());
        assert!(!auth.handle_unauthorized());
        assert_eq!(calls.get(), 1);
        assert_eq!(auth.get_token(), None);
        assert!(!auth.get_logged_in());

        auth.sign_in("token-2", None, None);
        assert!(auth.handle_unauthorized());
        assert_eq!(calls.get(), 2);
    }
}
