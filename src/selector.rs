//! Minimal CSS selector engine for resolving directive targets.
//!
//! Supports what landing-page markup uses for `data-da` targets: type,
//! `#id`, `.class`, `[attr]`, `[attr=value]` and `*` simple selectors,
//! compounds of those, the descendant, child (`>`), adjacent (`+`) and
//! general sibling (`~`) combinators, and comma-separated lists.
//!
//! Matching walks right to left from the candidate element through an
//! [`ElementAdapter`], so any tree that can answer parent / sibling / tag /
//! class / attribute questions can be queried.

#[cfg(test)]
#[path = "selector_test.rs"]
mod selector_test;

use thiserror::Error;

/// Tree access needed to match selectors.
pub trait ElementAdapter {
    type Handle: Copy + Eq;

    /// Parent element, `None` at the top of the element tree.
    fn parent(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Previous sibling element.
    fn previous_sibling(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Tag name in ASCII lowercase.
    fn tag_name(&self, element: Self::Handle) -> &str;

    /// True if the element's class list contains `class`.
    fn has_class(&self, element: Self::Handle, class: &str) -> bool;

    /// Attribute value, if present.
    fn attr(&self, element: Self::Handle, name: &str) -> Option<&str>;
}

/// Selector text that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected `{found}` at byte {at}")]
    Unexpected { found: char, at: usize },
    #[error("combinator without a following selector")]
    DanglingCombinator,
    #[error("unclosed attribute selector")]
    UnclosedAttribute,
}

/// One simple selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Simple {
    Universal,
    Type(String),
    Id(String),
    Class(String),
    Attr { name: String, value: Option<String> },
}

/// Simple selectors that must all match the same element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Compound {
    pub simples: Vec<Simple>,
}

/// Relationship between two compounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: any ancestor.
    Descendant,
    /// `>`: the parent.
    Child,
    /// `+`: the previous sibling.
    Adjacent,
    /// `~`: any previous sibling.
    Sibling,
}

/// Compounds joined by combinators, stored left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complex {
    pub head: Compound,
    pub tail: Vec<(Combinator, Compound)>,
}

/// Comma-separated selectors; an element matches if any entry matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    pub selectors: Vec<Complex>,
}

impl SelectorList {
    /// Parse selector text.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] for empty input or unsupported syntax.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let selectors = input
            .split(',')
            .map(parse_complex)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { selectors })
    }

    /// Whether `element` matches any selector in the list.
    pub fn matches<A: ElementAdapter>(&self, adapter: &A, element: A::Handle) -> bool {
        self.selectors
            .iter()
            .any(|complex| complex.matches(adapter, element))
    }
}

impl Complex {
    /// Whether `element` is the subject of this selector.
    pub fn matches<A: ElementAdapter>(&self, adapter: &A, element: A::Handle) -> bool {
        self.match_from(adapter, element, self.tail.len())
    }

    fn compound(&self, position: usize) -> &Compound {
        match position.checked_sub(1).and_then(|i| self.tail.get(i)) {
            Some((_, compound)) => compound,
            None => &self.head,
        }
    }

    /// Match compound `position` (0 = head) against `element`, then relate
    /// the remaining compounds to its left through their combinators.
    fn match_from<A: ElementAdapter>(&self, adapter: &A, element: A::Handle, position: usize) -> bool {
        if !self.compound(position).matches(adapter, element) {
            return false;
        }
        let Some(left) = position.checked_sub(1) else {
            return true;
        };
        let Some((combinator, _)) = self.tail.get(left) else {
            return true;
        };
        match combinator {
            Combinator::Child => adapter
                .parent(element)
                .is_some_and(|parent| self.match_from(adapter, parent, left)),
            Combinator::Adjacent => adapter
                .previous_sibling(element)
                .is_some_and(|prev| self.match_from(adapter, prev, left)),
            Combinator::Descendant => {
                let mut current = adapter.parent(element);
                while let Some(ancestor) = current {
                    if self.match_from(adapter, ancestor, left) {
                        return true;
                    }
                    current = adapter.parent(ancestor);
                }
                false
            }
            Combinator::Sibling => {
                let mut current = adapter.previous_sibling(element);
                while let Some(sibling) = current {
                    if self.match_from(adapter, sibling, left) {
                        return true;
                    }
                    current = adapter.previous_sibling(sibling);
                }
                false
            }
        }
    }
}

impl Compound {
    /// Whether every simple selector matches `element`.
    pub fn matches<A: ElementAdapter>(&self, adapter: &A, element: A::Handle) -> bool {
        self.simples.iter().all(|simple| match simple {
            Simple::Universal => true,
            Simple::Type(tag) => adapter.tag_name(element) == tag,
            Simple::Id(id) => adapter.attr(element, "id") == Some(id.as_str()),
            Simple::Class(class) => adapter.has_class(element, class),
            Simple::Attr { name, value: None } => adapter.attr(element, name).is_some(),
            Simple::Attr { name, value: Some(value) } => {
                adapter.attr(element, name) == Some(value.as_str())
            }
        })
    }
}

// ── Parsing ─────────────────────────────────────────────────────

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos..).and_then(|rest| rest.chars().next())
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skip whitespace, returning whether any was consumed.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos != start
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::Unexpected { found, at: self.pos },
            None => SelectorError::Empty,
        }
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(self.input.get(start..self.pos).unwrap_or_default().to_owned())
    }

    fn attr_value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.bump();
                }
                let value = self.input.get(start..self.pos).unwrap_or_default().to_owned();
                if self.bump().is_none() {
                    return Err(SelectorError::UnclosedAttribute);
                }
                Ok(value)
            }
            _ => self.ident(),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

fn parse_complex(input: &str) -> Result<Complex, SelectorError> {
    let mut cursor = Cursor::new(input);
    cursor.skip_whitespace();
    let head = parse_compound(&mut cursor)?;
    if head.simples.is_empty() {
        return Err(cursor.unexpected());
    }

    let mut tail = Vec::new();
    loop {
        let spaced = cursor.skip_whitespace();
        let combinator = match cursor.peek() {
            None => break,
            Some('>') => Combinator::Child,
            Some('+') => Combinator::Adjacent,
            Some('~') => Combinator::Sibling,
            Some(_) if spaced => Combinator::Descendant,
            Some(_) => return Err(cursor.unexpected()),
        };
        if combinator != Combinator::Descendant {
            cursor.bump();
            cursor.skip_whitespace();
        }
        let compound = parse_compound(&mut cursor)?;
        if compound.simples.is_empty() {
            return Err(SelectorError::DanglingCombinator);
        }
        tail.push((combinator, compound));
    }
    Ok(Complex { head, tail })
}

fn parse_compound(cursor: &mut Cursor<'_>) -> Result<Compound, SelectorError> {
    let mut compound = Compound::default();
    while let Some(c) = cursor.peek() {
        let simple = match c {
            '*' => {
                cursor.bump();
                Simple::Universal
            }
            '.' => {
                cursor.bump();
                Simple::Class(cursor.ident()?)
            }
            '#' => {
                cursor.bump();
                Simple::Id(cursor.ident()?)
            }
            '[' => {
                cursor.bump();
                parse_attr(cursor)?
            }
            c if is_ident_char(c) && compound.simples.is_empty() => {
                Simple::Type(cursor.ident()?.to_ascii_lowercase())
            }
            _ => break,
        };
        compound.simples.push(simple);
    }
    Ok(compound)
}

fn parse_attr(cursor: &mut Cursor<'_>) -> Result<Simple, SelectorError> {
    cursor.skip_whitespace();
    let name = cursor.ident()?.to_ascii_lowercase();
    cursor.skip_whitespace();
    let value = if cursor.peek() == Some('=') {
        cursor.bump();
        cursor.skip_whitespace();
        let value = cursor.attr_value()?;
        cursor.skip_whitespace();
        Some(value)
    } else {
        None
    };
    match cursor.bump() {
        Some(']') => Ok(Simple::Attr { name, value }),
        _ => Err(SelectorError::UnclosedAttribute),
    }
}
