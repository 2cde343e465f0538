//! Built-in gallery of style artworks.
//!
//! Each artwork is identified by a slug and resolved to an image file named
//! `<slug>.jpg`, `<slug>.jpeg` or `<slug>.png` inside a catalog directory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::image::{load_image, PixelBuffer};

const EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// The built-in style artworks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artwork {
    AbstractSpeedSound,
    BathingMen,
    BeheadingOfSaintPaul,
    Lego,
    PabloStrawHat,
    RedRectangle,
    SaladOil,
    Scream,
    SketchbookOfGreekAndNearEast,
    StarryNight,
    Stripes,
    Sunday,
    ValleyWithFirs,
    WaveHokusai,
    WilliamMorris,
}

impl Artwork {
    /// Every artwork, in gallery order.
    pub const ALL: [Self; 15] = [
        Self::AbstractSpeedSound,
        Self::BathingMen,
        Self::BeheadingOfSaintPaul,
        Self::Lego,
        Self::PabloStrawHat,
        Self::RedRectangle,
        Self::SaladOil,
        Self::Scream,
        Self::SketchbookOfGreekAndNearEast,
        Self::StarryNight,
        Self::Stripes,
        Self::Sunday,
        Self::ValleyWithFirs,
        Self::WaveHokusai,
        Self::WilliamMorris,
    ];

    /// File stem of the artwork in the catalog directory.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::AbstractSpeedSound => "abstract_speed_sound",
            Self::BathingMen => "bathing_men",
            Self::BeheadingOfSaintPaul => "beheading_of_saint_paul",
            Self::Lego => "lego",
            Self::PabloStrawHat => "pablo_straw_hat",
            Self::RedRectangle => "red_rectangle",
            Self::SaladOil => "salad_oil",
            Self::Scream => "scream",
            Self::SketchbookOfGreekAndNearEast => "sketchbook_of_greek_and_near_east",
            Self::StarryNight => "starry_night",
            Self::Stripes => "stripes",
            Self::Sunday => "sunday",
            Self::ValleyWithFirs => "valley_with_firs",
            Self::WaveHokusai => "wave_hokusai",
            Self::WilliamMorris => "william_morris",
        }
    }
}

impl fmt::Display for Artwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Artwork {
    type Err = Error;

    /// Accepts the slug case-insensitively, with `-` in place of `_`.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");

        Self::ALL
            .into_iter()
            .find(|artwork| artwork.slug() == wanted)
            .ok_or_else(|| Error::InvalidParameter {
                name: "artwork".to_string(),
                reason: format!("unknown artwork {s:?}"),
            })
    }
}

/// Directory holding the image files of the built-in artworks.
#[derive(Debug, Clone)]
pub struct ArtworkCatalog {
    dir: PathBuf,
}

impl ArtworkCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Platform data directory for artworks, next to the default model directory.
    #[must_use]
    pub fn default_location() -> PathBuf {
        dirs::data_dir().map_or_else(
            || PathBuf::from("artworks"),
            |base| base.join("pastiche").join("artworks"),
        )
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the first existing image file for `artwork`.
    #[must_use]
    pub fn path_for(&self, artwork: Artwork) -> Option<PathBuf> {
        EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{}.{ext}", artwork.slug())))
            .find(|path| path.is_file())
    }

    /// Artworks with an image file present.
    #[must_use]
    pub fn available(&self) -> Vec<Artwork> {
        Artwork::ALL
            .into_iter()
            .filter(|&artwork| self.path_for(artwork).is_some())
            .collect()
    }

    /// Load the pixels of `artwork`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArtworkNotFound`] if no file exists for it, or an image
    /// error if it cannot be decoded.
    pub fn load(&self, artwork: Artwork) -> Result<PixelBuffer> {
        let path = self.path_for(artwork).ok_or_else(|| Error::ArtworkNotFound {
            name: artwork.slug().to_string(),
            dir: self.dir.clone(),
        })?;

        load_image(path)
    }
}
