//! Minimal CSS selector support
//!
//! Covers what the page markup needs: a comma-separated list of compound
//! selectors of the form `tag#id.class.class`. No combinators, attributes or
//! pseudo-classes.

use super::Element;
use anyhow::{bail, Result};
use std::fmt;

/// One `tag#id.class` group
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn parse(input: &str) -> Result<Self> {
        let mut compound = Compound::default();
        // Split into (sigil, name) parts: "div.a#b" -> [('\0', "div"), ('.', "a"), ('#', "b")]
        let mut sigil = '\0';
        let mut name = String::new();

        let flush = |sigil: char, name: &mut String, compound: &mut Compound| -> Result<()> {
            if name.is_empty() {
                if sigil != '\0' {
                    bail!("empty name after '{}' in selector {:?}", sigil, input);
                }
                return Ok(());
            }
            let value = std::mem::take(name);
            match sigil {
                '\0' => compound.tag = Some(value.to_ascii_lowercase()),
                '#' => {
                    if compound.id.is_some() {
                        bail!("selector {:?} names more than one id", input);
                    }
                    compound.id = Some(value);
                }
                _ => compound.classes.push(value),
            }
            Ok(())
        };

        for ch in input.chars() {
            match ch {
                '.' | '#' => {
                    flush(sigil, &mut name, &mut compound)?;
                    sigil = ch;
                }
                c if c.is_alphanumeric() || c == '-' || c == '_' => name.push(c),
                c => bail!("unsupported character {:?} in selector {:?}", c, input),
            }
        }
        flush(sigil, &mut name, &mut compound)?;

        if compound == Compound::default() {
            bail!("empty selector");
        }
        Ok(compound)
    }

    fn matches(&self, el: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if !el.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if el.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| el.has_class(c))
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            write!(f, "{}", tag)?;
        }
        if let Some(id) = &self.id {
            write!(f, "#{}", id)?;
        }
        for class in &self.classes {
            write!(f, ".{}", class)?;
        }
        Ok(())
    }
}

/// A selector list such as `.service-card, .team-card`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self> {
        let alternatives = input
            .split(',')
            .map(|part| Compound::parse(part.trim()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { alternatives })
    }

    pub fn matches(&self, el: &Element) -> bool {
        self.alternatives.iter().any(|c| c.matches(el))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, compound) in self.alternatives.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", compound)?;
        }
        Ok(())
    }
}
