use std::path::Path;

use molsift::io::Format;

pub fn output(path: &Path) -> Option<Format> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "svg" => Some(Format::Svg),
        "sdf" | "mol" => Some(Format::Sdf),
        _ => None,
    }
}
