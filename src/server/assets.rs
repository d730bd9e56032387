use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "assets/"]
pub struct Assets;

impl Assets {
    /// Returns an embedded text asset, or `None` if it is missing or not UTF-8.
    pub fn text(path: &str) -> Option<String> {
        Self::get(path).and_then(|f| String::from_utf8(f.data.into_owned()).ok())
    }
}
