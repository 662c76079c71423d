//! Typed model of the rendered page.
//!
//! The dashboard renders a fixed screensaver layout; the updater never
//! creates display regions itself, it only discovers and mutates the
//! elements the page already contains.

use serde::{Deserialize, Serialize};

/// Stable handle to an element within a [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    pub text: String,
    pub italic: bool,
    /// Set once a display region binds to this element, for styling.
    pub marked: bool,
}

impl Element {
    pub fn new(kind: ElementKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            italic: false,
            marked: false,
        }
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    elements: Vec<Element>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: Element) -> ElementId {
        self.elements.push(element);
        ElementId(self.elements.len() - 1)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(|element| element.text.as_str())
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        if let Some(element) = self.elements.get_mut(id.0) {
            element.text = text.into();
        }
    }

    pub fn mark(&mut self, id: ElementId) {
        if let Some(element) = self.elements.get_mut(id.0) {
            element.marked = true;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, element)| (ElementId(i), element))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The stock screensaver layout: greeting, clock, date, weather,
    /// traffic and a quote. Texts are placeholders shaped so the
    /// heuristic scanner recognizes them before real data arrives.
    pub fn screensaver(user_name: &str) -> Self {
        let mut page = Self::new();
        page.push(Element::new(
            ElementKind::Heading1,
            format!("Good Morning, {user_name}!"),
        ));
        page.push(Element::new(ElementKind::Heading2, "00:00"));
        page.push(Element::new(ElementKind::Inline, ":00"));
        page.push(Element::new(ElementKind::Heading3, "Monday, January 1, 2024"));
        page.push(Element::new(ElementKind::Paragraph, "Weather: Loading..."));
        page.push(Element::new(ElementKind::Paragraph, "Traffic: Loading..."));
        page.push(
            Element::new(
                ElementKind::Paragraph,
                "The best way to predict the future is to invent it.",
            )
            .italic(),
        );
        page
    }
}
