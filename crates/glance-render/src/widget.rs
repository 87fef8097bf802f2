//! Widget view model: everything the SVG writer needs, with colours already
//! resolved for the current appearance.

use glance_core::{Appearance, WidgetError};

use crate::color::Color;
use crate::geometry::{Drawing, FontWeight};

pub const WIDGET_SIZE: f64 = 340.0;
pub const ERROR_TEXT_SIZE: f64 = 20.0;
pub const ERROR_HINT_SIZE: f64 = 15.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    /// Top-to-bottom two-stop gradient.
    Gradient { start: Color, end: Color },
    Plain(Color),
}

impl Background {
    /// Plain system background for the given appearance.
    pub fn system(appearance: Appearance) -> Self {
        match appearance {
            Appearance::Light => Background::Plain(Color::WHITE),
            Appearance::Dark => Background::Plain(Color::BLACK),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub size: f64,
    pub weight: FontWeight,
}

impl TextLine {
    pub fn new(text: impl Into<String>, size: f64, weight: FontWeight) -> Self {
        Self {
            text: text.into(),
            size,
            weight,
        }
    }

    pub fn regular(text: impl Into<String>, size: f64) -> Self {
        Self::new(text, size, FontWeight::Regular)
    }
}

/// Air-quality style glyph: three bars, the first `level` of them solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    AqiLow,
    AqiMedium,
    AqiHigh,
}

impl Symbol {
    pub fn level(self) -> u8 {
        match self {
            Symbol::AqiLow => 1,
            Symbol::AqiMedium => 2,
            Symbol::AqiHigh => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Icon {
    Symbol(Symbol),
    /// Base64 PNG used as an alpha mask and filled with the tint.
    TemplatePng(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IconView {
    pub icon: Icon,
    pub tint: Color,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetContent {
    pub text_color: Color,
    pub header: TextLine,
    pub value: TextLine,
    pub icon: IconView,
    /// Chart or gauge, scaled to fit between the value and the footer.
    pub graphic: Drawing,
    pub footer: Vec<TextLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetBody {
    Content(WidgetContent),
    Error {
        message: String,
        /// Shorter advice shown under the message.
        hint: Option<String>,
        color: Color,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    pub width: f64,
    pub height: f64,
    pub background: Background,
    pub body: WidgetBody,
    /// Opened when the widget is activated.
    pub url: Option<String>,
}

impl WidgetView {
    pub fn content(background: Background, content: WidgetContent, url: Option<String>) -> Self {
        Self {
            width: WIDGET_SIZE,
            height: WIDGET_SIZE,
            background,
            body: WidgetBody::Content(content),
            url,
        }
    }

    /// Plain-text error in place of all themed content.
    pub fn error(message: impl Into<String>, appearance: Appearance) -> Self {
        Self {
            width: WIDGET_SIZE,
            height: WIDGET_SIZE,
            background: Background::system(appearance),
            body: WidgetBody::Error {
                message: message.into(),
                hint: None,
                color: Color::RED,
            },
            url: None,
        }
    }

    /// Error view for a failed widget run: the error text plus its
    /// user-facing advice.
    pub fn failure(error: &WidgetError, appearance: Appearance) -> Self {
        let mut view = Self::error(error.to_string(), appearance);
        if let WidgetBody::Error { hint, .. } = &mut view.body {
            *hint = Some(error.user_message().to_string());
        }
        view
    }

    pub fn is_error(&self) -> bool {
        matches!(self.body, WidgetBody::Error { .. })
    }

    pub fn error_text(&self) -> Option<&str> {
        match &self.body {
            WidgetBody::Error { message, .. } => Some(message),
            WidgetBody::Content(_) => None,
        }
    }

    pub fn error_hint(&self) -> Option<&str> {
        match &self.body {
            WidgetBody::Error { hint, .. } => hint.as_deref(),
            WidgetBody::Content(_) => None,
        }
    }

    pub fn content_ref(&self) -> Option<&WidgetContent> {
        match &self.body {
            WidgetBody::Content(c) => Some(c),
            WidgetBody::Error { .. } => None,
        }
    }

    pub fn value_text(&self) -> Option<&str> {
        self.content_ref().map(|c| c.value.text.as_str())
    }

    pub fn footer_texts(&self) -> Vec<&str> {
        self.content_ref()
            .map(|c| c.footer.iter().map(|l| l.text.as_str()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_view_has_no_theme_content() {
        let view = WidgetView::error("boom", Appearance::Dark);
        assert!(view.is_error());
        assert_eq!(view.error_text(), Some("boom"));
        assert_eq!(view.value_text(), None);
        assert!(view.footer_texts().is_empty());
        assert_eq!(view.background, Background::Plain(Color::BLACK));
        assert!(view.url.is_none());
        assert_eq!(view.error_hint(), None);
    }

    #[test]
    fn test_failure_view_carries_advice() {
        let err: WidgetError = glance_core::NetworkError::ServerError {
            status: 401,
            message: "unauthorized".into(),
        }
        .into();
        let view = WidgetView::failure(&err, Appearance::Light);
        assert_eq!(view.error_text(), Some("Server error: 401 - unauthorized"));
        assert_eq!(
            view.error_hint(),
            Some("The service rejected the credentials. Check your settings.")
        );
    }

    #[test]
    fn test_symbol_levels() {
        assert_eq!(Symbol::AqiLow.level(), 1);
        assert_eq!(Symbol::AqiHigh.level(), 3);
    }
}
