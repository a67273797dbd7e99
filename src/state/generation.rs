use std::cell::Cell;
use std::rc::Rc;

/// Contador compartido entre clones de un store. Una respuesta solo se aplica
/// si el contador no cambió mientras estaba en vuelo.
#[derive(Debug, Clone, Default)]
pub struct Generation(Rc<Cell<u64>>);

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.0.get()
    }

    /// Invalida todo lo que esté en vuelo
    pub fn bump(&self) -> u64 {
        let next = self.0.get() + 1;
        self.0.set(next);
        next
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.0.get() == token
    }
}
