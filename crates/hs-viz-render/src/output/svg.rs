use std::path::Path;

/// Write SVG string to a file, creating parent directories.
pub fn save_svg(svg: &str, path: &Path) -> crate::Result<()> {
    save_bytes(svg.as_bytes(), path)
}

pub(crate) fn save_bytes(bytes: &[u8], path: &Path) -> crate::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}
