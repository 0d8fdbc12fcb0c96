use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Maximum length (in characters) for a generated base filename
const MAX_BASE_NAME_CHARS: usize = 200;

/// Sanitizes arbitrary text into a safe filename base
///
/// Alphanumerics, `-`, `_`, `.`, and spaces pass through; every other
/// character becomes `_`. The result is truncated to 200 characters.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_BASE_NAME_CHARS)
        .collect()
}

/// Finds a free path for `base + extension` under `dir`
///
/// If the path already exists, an incrementing numeric suffix is appended
/// before the extension (`name_1.md`, `name_2.md`, ...) until a free path is
/// found. Race-free only with respect to this process's own sequential
/// writes.
pub fn unique_path(dir: &Path, base: &str, extension: &str) -> PathBuf {
    let mut path = dir.join(format!("{}{}", base, extension));
    let mut counter = 1;

    while path.exists() {
        path = dir.join(format!("{}_{}{}", base, counter, extension));
        counter += 1;
    }

    path
}

/// Writes a harvested page file
///
/// The file contains a generated title line, the original (pre-redirect)
/// URL, and the rendered markdown body, UTF-8 encoded.
pub fn write_page_file(
    path: &Path,
    title: &str,
    original_url: &str,
    body: &str,
) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    write!(file, "# {}\n\nOriginal URL: {}\n\n{}", title, original_url, body)?;
    Ok(())
}
