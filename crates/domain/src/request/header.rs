//! HTTP Header types

/// Name of the authorization header.
pub const AUTHORIZATION: &str = "Authorization";

/// Name of the content type header.
pub const CONTENT_TYPE: &str = "Content-Type";

/// A single HTTP header with name and value.
///
/// A disabled header is declared on the request but never sent. This is how
/// a request states "no `Authorization` header, do not add one".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// The header name (e.g., "Content-Type")
    pub name: String,
    /// The header value (e.g., "application/json")
    pub value: String,
    /// Whether this header is sent
    pub enabled: bool,
}

impl Header {
    /// Creates a new enabled header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            enabled: true,
        }
    }

    /// Creates a declared-but-absent header.
    #[must_use]
    pub fn absent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            enabled: false,
        }
    }

    fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Ordered collection of HTTP headers. Name lookups ignore case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    items: Vec<Header>,
}

impl Headers {
    /// Creates an empty header collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Sets a header, replacing any header with the same name.
    pub fn set(&mut self, header: Header) {
        if let Some(existing) = self.items.iter_mut().find(|h| h.is(&header.name)) {
            *existing = header;
        } else {
            self.items.push(header);
        }
    }

    /// Sets an enabled header.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.set(Header::new(name, value));
    }

    /// Adds a received header value. Repeated names are joined with `", "`,
    /// the way a field list is combined.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let header = Header::new(name, value);
        match self.items.iter_mut().find(|h| h.is(&header.name)) {
            Some(existing) if existing.enabled => {
                existing.value.push_str(", ");
                existing.value.push_str(&header.value);
            }
            Some(existing) => *existing = header,
            None => self.items.push(header),
        }
    }

    /// Declares a header as explicitly absent.
    pub fn declare_absent(&mut self, name: impl Into<String>) {
        self.set(Header::absent(name));
    }

    /// Returns true if the header is declared, sent or not.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|h| h.is(name))
    }

    /// Returns the value of an enabled header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|h| h.enabled && h.is(name))
            .map(|h| h.value.as_str())
    }

    /// Applies every header of `other` over this collection.
    pub fn merge(&mut self, other: Self) {
        for header in other.items {
            self.set(header);
        }
    }

    /// Returns an iterator over headers that are sent.
    pub fn enabled(&self) -> impl Iterator<Item = &Header> {
        self.items.iter().filter(|h| h.enabled)
    }

    /// Returns all headers (enabled and disabled).
    #[must_use]
    pub fn all(&self) -> &[Header] {
        &self.items
    }

    /// Returns the number of headers.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len is not const in stable
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::is_empty is not const in stable
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Header> for Headers {
    fn from_iter<T: IntoIterator<Item = Header>>(iter: T) -> Self {
        let mut headers = Self::new();
        for header in iter {
            headers.set(header);
        }
        headers
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        iter.into_iter().map(|(k, v)| Header::new(k, v)).collect()
    }
}
