//! Root margin parsing (`rootMargin` CSS shorthand)

use anyhow::{bail, Context, Result};
use std::fmt;
use std::str::FromStr;

/// A single margin length
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    /// Percentage of the root's size along the same axis
    Percent(f64),
}

impl Length {
    /// Resolve against the root size along the same axis
    pub fn resolve(self, root_size: f64) -> f64 {
        match self {
            Length::Px(v) => v,
            Length::Percent(p) => root_size * p / 100.0,
        }
    }
}

impl FromStr for Length {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(v) = s.strip_suffix("px") {
            return Ok(Length::Px(parse_number(v, s)?));
        }
        if let Some(v) = s.strip_suffix('%') {
            return Ok(Length::Percent(parse_number(v, s)?));
        }
        // Bare zero is valid CSS; any other unitless value is not
        if parse_number(s, s)? == 0.0 {
            return Ok(Length::Px(0.0));
        }
        bail!("margin length {:?} must be in px or %", s)
    }
}

fn parse_number(v: &str, original: &str) -> Result<f64> {
    let n: f64 = v
        .parse()
        .with_context(|| format!("invalid margin length {:?}", original))?;
    if !n.is_finite() {
        bail!("invalid margin length {:?}", original);
    }
    Ok(n)
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(v) => write!(f, "{}px", v),
            Length::Percent(p) => write!(f, "{}%", p),
        }
    }
}

/// Margin around the observation root, in CSS box order (top right bottom left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl Default for RootMargin {
    fn default() -> Self {
        let zero = Length::Px(0.0);
        Self {
            top: zero,
            right: zero,
            bottom: zero,
            left: zero,
        }
    }
}

impl FromStr for RootMargin {
    type Err = anyhow::Error;

    /// Accepts 1-4 lengths with the usual CSS shorthand expansion
    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split_whitespace()
            .map(Length::from_str)
            .collect::<Result<Vec<_>>>()?;

        let (top, right, bottom, left) = match parts.as_slice() {
            [all] => (*all, *all, *all, *all),
            [v, h] => (*v, *h, *v, *h),
            [t, h, b] => (*t, *h, *b, *h),
            [t, r, b, l] => (*t, *r, *b, *l),
            _ => bail!("root margin {:?} must have 1 to 4 lengths", s),
        };
        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}
