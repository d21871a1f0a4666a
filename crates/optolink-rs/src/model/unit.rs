// crates/optolink-rs/src/model/unit.rs

//! Units (value types) and their enumeration tables.

/// A measurement/value type with get/set conversion expressions and an
/// enumeration table.
#[derive(Debug)]
pub struct Unit {
    /// `@name`.
    pub name: String,
    /// `<abbrev>`: unique among units; this is the lookup key commands use.
    pub abbrev: String,
    /// `<calc get=...>`: expression turning raw bytes into a value.
    pub get_calc: String,
    /// `<calc set=...>`: expression turning a value into raw bytes.
    pub set_calc: String,
    /// `<icalc get=...>`: inverse get expression.
    pub get_icalc: String,
    /// `<icalc set=...>`: inverse set expression.
    pub set_icalc: String,
    /// `<entity>`: display entity (e.g. "°C").
    pub entity: String,
    /// `<type>`: type tag consumed by the expression compiler downstream.
    pub unit_type: String,
    /// `<enum>` children, in declaration order.
    pub enums: Vec<Enumeration>,
}

/// A text ↔ byte-pattern mapping entry within a [`Unit`].
#[derive(Debug)]
pub struct Enumeration {
    /// `@text`: the display text.
    pub text: String,
    /// `@bytes`, decoded to a raw pattern. `None` marks the unit's default
    /// entry; at most one entry per unit should omit `bytes`.
    pub bytes: Option<Vec<u8>>,
}

/// How to search a unit's enumeration table.
#[derive(Debug, Clone, Copy)]
pub enum EnumLookup<'a> {
    /// Match the leading bytes of an entry's pattern.
    Bytes(&'a [u8]),
    /// Match the display text exactly.
    Text(&'a str),
    /// Return the unit's default entry (the one without a byte pattern).
    Default,
}

impl Unit {
    /// Looks up an enumeration entry, first match wins.
    ///
    /// Precedence follows the query: a byte-pattern search only matches
    /// entries carrying a pattern, a text search compares display text
    /// exactly, and `Default` returns the entry without a pattern.
    pub fn lookup(&self, query: EnumLookup<'_>) -> Option<&Enumeration> {
        self.enums.iter().find(|e| match query {
            EnumLookup::Bytes(search) => e
                .bytes
                .as_deref()
                .is_some_and(|b| b.get(..search.len()) == Some(search)),
            EnumLookup::Text(text) => e.text == text,
            EnumLookup::Default => e.bytes.is_none(),
        })
    }

    /// Resolves an entry with full precedence: byte-pattern match, else
    /// exact text match, else the unit's default entry.
    pub fn resolve(&self, bytes: Option<&[u8]>, text: Option<&str>) -> Option<&Enumeration> {
        bytes
            .and_then(|b| self.lookup(EnumLookup::Bytes(b)))
            .or_else(|| text.and_then(|t| self.lookup(EnumLookup::Text(t))))
            .or_else(|| self.lookup(EnumLookup::Default))
    }
}
