//! Font discovery and loading.
//!
//! The report is set in a proportional family plus an optional monospace family for code. Fonts
//! are looked up, in order, in `$SEO_REPORT_FONTS_DIR`, in `assets/fonts` next to the executable,
//! in `assets/fonts` under the crate manifest, and finally in a few well-known system locations.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::fonts::{FontData, FontFamily};
use log::{info, warn};

use crate::error::ReportError;

/// Environment variable naming a directory with the bundled font files.
pub const FONTS_DIR_ENV: &str = "SEO_REPORT_FONTS_DIR";

/// File names of the four faces of one family.
#[derive(Clone, Copy, Debug)]
struct FaceFiles {
    regular: &'static str,
    bold: &'static str,
    italic: &'static str,
    bold_italic: &'static str,
}

impl FaceFiles {
    fn all(&self) -> [&'static str; 4] {
        [self.regular, self.bold, self.italic, self.bold_italic]
    }

    fn present_in(&self, directory: &Path) -> bool {
        self.all().iter().all(|name| directory.join(name).is_file())
    }

    fn missing_in(&self, directory: &Path) -> Vec<&'static str> {
        self.all()
            .into_iter()
            .filter(|name| !directory.join(name).is_file())
            .collect()
    }
}

const ROBOTO: FaceFiles = FaceFiles {
    regular: "Roboto-Regular.ttf",
    bold: "Roboto-Bold.ttf",
    italic: "Roboto-Italic.ttf",
    bold_italic: "Roboto-BoldItalic.ttf",
};

const ROBOTO_MONO: FaceFiles = FaceFiles {
    regular: "RobotoMono-Regular.ttf",
    bold: "RobotoMono-Bold.ttf",
    italic: "RobotoMono-Italic.ttf",
    bold_italic: "RobotoMono-BoldItalic.ttf",
};

const DEJAVU_SANS: FaceFiles = FaceFiles {
    regular: "DejaVuSans.ttf",
    bold: "DejaVuSans-Bold.ttf",
    italic: "DejaVuSans-Oblique.ttf",
    bold_italic: "DejaVuSans-BoldOblique.ttf",
};

const DEJAVU_MONO: FaceFiles = FaceFiles {
    regular: "DejaVuSansMono.ttf",
    bold: "DejaVuSansMono-Bold.ttf",
    italic: "DejaVuSansMono-Oblique.ttf",
    bold_italic: "DejaVuSansMono-BoldOblique.ttf",
};

const LIBERATION_SANS: FaceFiles = FaceFiles {
    regular: "LiberationSans-Regular.ttf",
    bold: "LiberationSans-Bold.ttf",
    italic: "LiberationSans-Italic.ttf",
    bold_italic: "LiberationSans-BoldItalic.ttf",
};

const LIBERATION_MONO: FaceFiles = FaceFiles {
    regular: "LiberationMono-Regular.ttf",
    bold: "LiberationMono-Bold.ttf",
    italic: "LiberationMono-Italic.ttf",
    bold_italic: "LiberationMono-BoldItalic.ttf",
};

const ARIAL: FaceFiles = FaceFiles {
    regular: "arial.ttf",
    bold: "arialbd.ttf",
    italic: "ariali.ttf",
    bold_italic: "arialbi.ttf",
};

const COURIER_NEW: FaceFiles = FaceFiles {
    regular: "cour.ttf",
    bold: "courbd.ttf",
    italic: "couri.ttf",
    bold_italic: "courbi.ttf",
};

/// A directory that may hold a proportional and a monospace family.
#[derive(Clone, Debug)]
struct FontSource {
    name: &'static str,
    directory: PathBuf,
    sans: FaceFiles,
    mono: FaceFiles,
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn bundled_directories() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env_path(FONTS_DIR_ENV) {
        candidates.push(path);
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            let candidate = bin_dir.join("assets/fonts");
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }

    let manifest_candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts");
    if !candidates.contains(&manifest_candidate) {
        candidates.push(manifest_candidate);
    }

    candidates
}

fn windows_font_directory() -> Option<PathBuf> {
    ["WINDIR", "SystemRoot"]
        .iter()
        .filter_map(|var| env_path(var))
        .map(|root| root.join("Fonts"))
        .find(|candidate| candidate.is_dir())
}

fn font_sources() -> Vec<FontSource> {
    let mut sources: Vec<FontSource> = bundled_directories()
        .into_iter()
        .map(|directory| FontSource {
            name: "Roboto",
            directory,
            sans: ROBOTO,
            mono: ROBOTO_MONO,
        })
        .collect();

    for directory in [
        "/usr/share/fonts/truetype/dejavu",
        "/usr/share/fonts/dejavu",
        "/usr/share/fonts/TTF",
    ] {
        sources.push(FontSource {
            name: "DejaVu",
            directory: PathBuf::from(directory),
            sans: DEJAVU_SANS,
            mono: DEJAVU_MONO,
        });
    }

    for directory in [
        "/usr/share/fonts/truetype/liberation",
        "/usr/share/fonts/truetype/liberation2",
    ] {
        sources.push(FontSource {
            name: "Liberation",
            directory: PathBuf::from(directory),
            sans: LIBERATION_SANS,
            mono: LIBERATION_MONO,
        });
    }

    if let Some(directory) = windows_font_directory() {
        sources.push(FontSource {
            name: "Arial",
            directory,
            sans: ARIAL,
            mono: COURIER_NEW,
        });
    }

    sources
}

fn load_face(directory: &Path, file: &str) -> Result<FontData, Error> {
    let path = directory.join(file);
    FontData::load(&path, None).map_err(|err| {
        Error::new(
            format!("Failed to load font {}: {}", path.display(), err),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

fn load_family(directory: &Path, files: &FaceFiles) -> Result<FontFamily<FontData>, Error> {
    Ok(FontFamily {
        regular: load_face(directory, files.regular)?,
        bold: load_face(directory, files.bold)?,
        italic: load_face(directory, files.italic)?,
        bold_italic: load_face(directory, files.bold_italic)?,
    })
}

/// The font families a document is rendered with.
pub struct FontSet {
    pub sans: FontFamily<FontData>,
    /// `None` when the source has no monospace family; code then prints in `sans`.
    pub mono: Option<FontFamily<FontData>>,
    /// Name of the family that was found, e.g. `Roboto` or `DejaVu`.
    pub family: &'static str,
    pub directory: PathBuf,
}

impl FontSet {
    /// Loads the first complete proportional family found on the search path.
    pub fn load() -> Result<Self, ReportError> {
        let mut attempts = Vec::new();

        for source in font_sources() {
            if !source.directory.is_dir() {
                attempts.push(format!("{} (directory missing)", source.directory.display()));
                continue;
            }
            if !source.sans.present_in(&source.directory) {
                attempts.push(format!(
                    "{} (missing files [{}])",
                    source.directory.display(),
                    source.sans.missing_in(&source.directory).join(", ")
                ));
                continue;
            }

            let sans = load_family(&source.directory, &source.sans).map_err(ReportError::FontLoad)?;
            let mono = if source.mono.present_in(&source.directory) {
                Some(load_family(&source.directory, &source.mono).map_err(ReportError::FontLoad)?)
            } else {
                warn!(
                    "No monospace fonts next to {} in {}; code will use the proportional face.",
                    source.name,
                    source.directory.display()
                );
                None
            };

            if source.name != "Roboto" {
                warn!(
                    "Bundled fonts unavailable ({}); falling back to '{}' fonts.",
                    attempts.join(", "),
                    source.name
                );
            }
            info!(
                "using '{}' fonts from {}",
                source.name,
                source.directory.display()
            );
            return Ok(Self {
                sans,
                mono,
                family: source.name,
                directory: source.directory,
            });
        }

        let summary = if attempts.is_empty() {
            "no search paths were available".to_owned()
        } else {
            attempts.join(", ")
        };
        Err(ReportError::FontLoad(Error::new(
            format!(
                "Unable to locate fonts. Checked: {}. Set {} to a directory with Roboto-*.ttf.",
                summary, FONTS_DIR_ENV
            ),
            io::Error::new(io::ErrorKind::NotFound, "fonts not found"),
        )))
    }
}

/// Whether any complete proportional family can be found. Rendering tests skip when it is `false`.
pub fn fonts_available() -> bool {
    font_sources()
        .iter()
        .any(|source| source.directory.is_dir() && source.sans.present_in(&source.directory))
}
