use crate::services::ApiError;

/// Slice de un recurso: items + flags de carga.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionState<T> {
    pub items: Vec<T>,
    pub is_loading: bool,
    pub has_fetched: bool,
    pub error: Option<String>,
}

impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            has_fetched: false,
            error: None,
        }
    }
}

impl<T> CollectionState<T> {
    /// `initializeX()`: solo si no se cargó antes ni hay una carga en curso
    pub fn needs_initial_fetch(&self) -> bool {
        !self.has_fetched && !self.is_loading
    }

    pub fn begin_fetch(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Cierra la carga en ambos caminos (equivalente a `finally`)
    pub fn finish_fetch(&mut self, result: Result<Vec<T>, ApiError>) {
        self.is_loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.has_fetched = true;
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|item| predicate(item))
    }

    /// Reemplaza el item que cumple `matches` o lo agrega al final
    pub fn upsert(&mut self, item: T, matches: impl Fn(&T) -> bool) {
        match self.items.iter_mut().find(|existing| matches(existing)) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    pub fn remove_where(&mut self, matches: impl Fn(&T) -> bool) -> bool {
        let before = self.items.len();
        self.items.retain(|item| !matches(item));
        before != self.items.len()
    }
}
