//! Fade-and-slide styling shared by the scroll reveal and the hero intro
//!
//! Both work the same way: park the element transparent and pushed down, then
//! write the end state and let the CSS transition animate between the two.

/// Inline style writes, as (property, value) pairs in application order
pub type StyleSet = Vec<(&'static str, String)>;

/// Transparent and shifted `offset_px` down, optionally with a transition
pub fn hidden(offset_px: f64, transition: Option<&str>) -> StyleSet {
    let mut styles = vec![
        ("opacity", "0".to_string()),
        ("transform", format!("translateY({}px)", offset_px)),
    ];
    if let Some(transition) = transition {
        styles.push(("transition", transition.to_string()));
    }
    styles
}

/// Fully visible at the natural position, optionally setting a transition first
pub fn shown(transition: Option<&str>) -> StyleSet {
    let mut styles = Vec::new();
    if let Some(transition) = transition {
        styles.push(("transition", transition.to_string()));
    }
    styles.push(("opacity", "1".to_string()));
    styles.push(("transform", "translateY(0)".to_string()));
    styles
}
