/// The address bar, seen as "read the current query string / replace it".
///
/// Replacing never creates a history entry, so back/forward do not step
/// through intermediate filter states.
pub trait LocationStore {
    fn search(&self) -> String;
    fn replace_search(&mut self, search: &str);
}

impl<T: LocationStore + ?Sized> LocationStore for Box<T> {
    fn search(&self) -> String {
        (**self).search()
    }

    fn replace_search(&mut self, search: &str) {
        (**self).replace_search(search)
    }
}

/// In-memory location for one document lifetime.
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    path: String,
    search: String,
    history_len: usize,
    replace_count: usize,
}

impl MemoryLocation {
    pub fn new(path: impl Into<String>, search: impl Into<String>) -> Self {
        let search = search.into();
        Self {
            path: path.into(),
            search: search.strip_prefix('?').unwrap_or(&search).to_string(),
            history_len: 1,
            replace_count: 0,
        }
    }

    /// Splits `href` at the first `?` into path and query string.
    pub fn from_href(href: &str) -> Self {
        match href.split_once('?') {
            Some((path, search)) => Self::new(path, search),
            None => Self::new(href, ""),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn href(&self) -> String {
        if self.search.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.search)
        }
    }

    /// Number of navigable history entries; replacing never grows it.
    pub fn history_len(&self) -> usize {
        self.history_len
    }

    pub fn replace_count(&self) -> usize {
        self.replace_count
    }
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::new("/", "")
    }
}

impl LocationStore for MemoryLocation {
    fn search(&self) -> String {
        self.search.clone()
    }

    fn replace_search(&mut self, search: &str) {
        self.search = search.strip_prefix('?').unwrap_or(search).to_string();
        self.replace_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_href_splits_path_and_search() {
        let location = MemoryLocation::from_href("/products?q=phone&page=2");
        assert_eq!(location.path(), "/products");
        assert_eq!(location.search(), "q=phone&page=2");
        assert_eq!(location.href(), "/products?q=phone&page=2");
    }

    #[test]
    fn replace_does_not_grow_history() {
        let mut location = MemoryLocation::default();
        location.replace_search("?page=2");
        location.replace_search("page=3");
        assert_eq!(location.search(), "page=3");
        assert_eq!(location.history_len(), 1);
        assert_eq!(location.replace_count(), 2);
    }
}
