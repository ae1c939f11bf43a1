//! Desktop menu entry so the monitor shows up in the application launcher.
//!
//! Also generates the application icon (a light "Δ" on blue) used by both
//! the menu entry and the main window.

use anyhow::{anyhow, Context, Result};
use image::{Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};

const DESKTOP_FILE_NAME: &str = "delta-monitor.desktop";
const ICON_FILE_NAME: &str = "icon.png";

pub const ICON_SIZE: u32 = 64;
const ICON_MARGIN: f32 = 12.0;
const ICON_BACKGROUND: Rgba<u8> = Rgba([0x3d, 0x5a, 0x80, 0xff]);
const ICON_FOREGROUND: Rgba<u8> = Rgba([0xe8, 0xec, 0xf0, 0xff]);

/// Renders the application icon.
pub fn icon_image() -> RgbaImage {
    let size = ICON_SIZE as f32;
    let apex = (size / 2.0, ICON_MARGIN);
    let right = (size - ICON_MARGIN, size - ICON_MARGIN);
    let left = (ICON_MARGIN, size - ICON_MARGIN);

    RgbaImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        let p = (x as f32 + 0.5, y as f32 + 0.5);
        if in_triangle(p, apex, right, left) {
            ICON_FOREGROUND
        } else {
            ICON_BACKGROUND
        }
    })
}

fn in_triangle(p: (f32, f32), a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> bool {
    let edge = |u: (f32, f32), v: (f32, f32)| (v.0 - u.0) * (p.1 - u.1) - (v.1 - u.1) * (p.0 - u.0);
    let (d1, d2, d3) = (edge(a, b), edge(b, c), edge(c, a));
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Writes the icon PNG into the data directory if it is missing.
pub fn ensure_icon() -> Result<PathBuf> {
    let path = crate::paths::get_data_dir().join(ICON_FILE_NAME);
    if !path.is_file() {
        icon_image()
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        crate::log(&format!("Created icon: {}", path.display()));
    }
    Ok(path)
}

/// Writes `~/.local/share/applications/delta-monitor.desktop` for the running executable.
///
/// The entry references `icon` when given. Returns the path written.
pub fn install_desktop_entry(icon: Option<&Path>) -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate current executable")?;
    let applications = dirs::data_dir()
        .ok_or_else(|| anyhow!("No data directory for desktop entries"))?
        .join("applications");

    fs::create_dir_all(&applications)
        .with_context(|| format!("Failed to create {}", applications.display()))?;

    let path = applications.join(DESKTOP_FILE_NAME);
    let contents = desktop_entry_contents(&exe, icon);

    // Skip the write when nothing changed
    if fs::read_to_string(&path).ok().as_deref() == Some(contents.as_str()) {
        return Ok(path);
    }

    fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    crate::log(&format!("Installed desktop entry: {}", path.display()));
    Ok(path)
}

/// Contents of the `.desktop` file launching `exe`.
pub fn desktop_entry_contents(exe: &Path, icon: Option<&Path>) -> String {
    let icon_line = match icon {
        Some(icon) => format!("Icon={}\n", icon.display()),
        None => String::new(),
    };
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name=Delta Monitor\n\
         Comment=Watch a number on screen and alert when it changes\n\
         Exec=\"{}\"\n\
         {}\
         Terminal=false\n\
         Categories=Utility;\n",
        exe.display(),
        icon_line
    )
}
