//! Data model for the gallery site: the gallery items themselves plus the
//! site-level state (theme) and its persisted preference record.

use serde::{Deserialize, Serialize};
use std::rc::Rc;
use yew::Reducible;

/// One enlargeable image on the page. The gallery is an ordered list of
/// these, built once at startup; order is stable for the app's lifetime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub src: String,
    pub alt: String,
}

impl GalleryItem {
    fn new(src: &str, alt: &str) -> Self {
        Self {
            src: src.to_string(),
            alt: alt.to_string(),
        }
    }
}

/// The page's photo set. Thumbnails and the lightbox both render from this
/// single list, so indices agree between them.
pub fn default_gallery() -> Vec<GalleryItem> {
    vec![
        GalleryItem::new(
            "https://picsum.photos/seed/harbor/1600/1200",
            "Fishing harbor at dawn",
        ),
        GalleryItem::new(
            "https://picsum.photos/seed/ridge/1600/1200",
            "Fog rolling over a mountain ridge",
        ),
        GalleryItem::new(
            "https://picsum.photos/seed/oldtown/1600/1200",
            "Cobbled lane in the old town",
        ),
        GalleryItem::new(
            "https://picsum.photos/seed/kelp/1600/1200",
            "Diver above a kelp forest",
        ),
        GalleryItem::new(
            "https://picsum.photos/seed/birches/1600/1200",
            "Birch trunks after fresh snow",
        ),
        GalleryItem::new(
            "https://picsum.photos/seed/market/1600/1200",
            "Spice pyramids at the street market",
        ),
        GalleryItem::new(
            "https://picsum.photos/seed/arch/1600/1200",
            "Sandstone arch at golden hour",
        ),
        GalleryItem::new(
            "https://picsum.photos/seed/ferry/1600/1200",
            "Ferry lights crossing the strait",
        ),
    ]
}

// ---------------- Theme -----------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Class applied to `<body>` while this theme is active. Light is the
    /// stylesheet default and carries no class.
    pub fn body_class(self) -> Option<&'static str> {
        match self {
            Theme::Light => None,
            Theme::Dark => Some("dark-theme"),
        }
    }

    pub fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark { Theme::Dark } else { Theme::Light }
    }
}

/// Preference record persisted to localStorage as JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SitePrefs {
    pub theme: Option<Theme>,
}

pub const PREFS_STORAGE_KEY: &str = "pg_site_prefs";

// ---------------- Reducer & Actions -----------------

#[derive(Clone, Debug, PartialEq)]
pub struct SiteState {
    pub theme: Theme,
}

impl Default for SiteState {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
        }
    }
}

#[derive(Clone, Debug)]
pub enum SiteAction {
    ToggleTheme,
    /// Set the theme outright (persisted preference at load, or a live
    /// system preference change).
    SetTheme(Theme),
}

impl Reducible for SiteState {
    type Action = SiteAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut new = (*self).clone();
        match action {
            SiteAction::ToggleTheme => {
                new.theme = new.theme.toggled();
            }
            SiteAction::SetTheme(theme) => {
                new.theme = theme;
            }
        }
        Rc::new(new)
    }
}
