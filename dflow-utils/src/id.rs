use std::{cmp::Ordering, fmt};

/// Interned symbol shared by every [Id].
pub type GSym = symbol_table::GlobalSymbol;

/// Represents an identifier in a program: a variable, a block label, or a
/// function name. Identifiers are interned so copying and comparing them is
/// cheap.
///
/// Ordering is lexicographic on the underlying string so sorted collections
/// of identifiers print in a stable order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id {
    id: GSym,
}

impl Id {
    pub fn new<S: AsRef<str>>(id: S) -> Self {
        Id {
            id: GSym::from(id.as_ref()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.id.as_str()
    }
}

impl PartialOrd for Id {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Id {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::new(s)
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::new(s)
    }
}

impl From<&String> for Id {
    fn from(s: &String) -> Self {
        Id::new(s)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::Id;

    #[test]
    fn interned_ids_compare_by_text() {
        let a = Id::from("loop");
        let b = Id::new(String::from("loop"));
        assert_eq!(a, b);
        assert_eq!(a, "loop");
    }

    #[test]
    fn ordering_is_lexicographic() {
        // Intern in reverse order so symbol indices disagree with the text.
        let z = Id::from("zz_order_test");
        let a = Id::from("aa_order_test");
        let mut ids = vec![z, a];
        ids.sort();
        assert_eq!(ids, vec![a, z]);
    }
}
