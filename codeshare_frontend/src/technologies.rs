//! Static technology registry: display color, icon glyph, and syntax
//! language for the closed set of selectable tags, plus the extension
//! tables the repository explorer routes files with.

use eframe::egui::Color32;

#[derive(Debug, Clone, Copy)]
pub struct Technology {
    pub name: &'static str,
    pub color: Color32,
    pub icon: &'static str,
    pub language: &'static str,
}

const fn tech(
    name: &'static str,
    rgb: (u8, u8, u8),
    icon: &'static str,
    language: &'static str,
) -> Technology {
    Technology {
        name,
        color: Color32::from_rgb(rgb.0, rgb.1, rgb.2),
        icon,
        language,
    }
}

pub const TECHNOLOGIES: &[Technology] = &[
    // Frontend
    tech("HTML5", (0xE3, 0x4F, 0x26), "🌐", "html"),
    tech("CSS3", (0x15, 0x72, 0xB6), "🎨", "css"),
    tech("JavaScript", (0xF7, 0xDF, 0x1E), "🟨", "javascript"),
    tech("TypeScript", (0x31, 0x78, 0xC6), "🟦", "typescript"),
    tech("React", (0x61, 0xDA, 0xFB), "⚛", "javascript"),
    tech("Vue.js", (0x42, 0xB8, 0x83), "🟩", "javascript"),
    tech("Svelte", (0xFF, 0x3E, 0x00), "🔥", "javascript"),
    tech("Next.js", (0x00, 0x00, 0x00), "▲", "javascript"),
    tech("Angular", (0xDD, 0x00, 0x31), "🅰", "javascript"),
    tech("Tailwind CSS", (0x06, 0xB6, 0xD4), "🌊", "css"),
    tech("Bootstrap", (0x79, 0x52, 0xB3), "🅱", "css"),
    tech("ShadCN", (0x00, 0x00, 0x00), "⬛", "javascript"),
    // Backend
    tech("Node.js", (0x33, 0x99, 0x33), "🟢", "javascript"),
    tech("Express.js", (0x00, 0x00, 0x00), "🚏", "javascript"),
    tech("Python", (0x37, 0x76, 0xAB), "🐍", "python"),
    tech("Django", (0x09, 0x2E, 0x20), "🎸", "python"),
    tech("Ruby", (0xCC, 0x34, 0x2D), "💎", "ruby"),
    tech("Ruby on Rails", (0xCC, 0x00, 0x00), "🛤", "ruby"),
    tech("PHP", (0x77, 0x7B, 0xB4), "🐘", "php"),
    tech("Laravel", (0xFF, 0x2D, 0x20), "🏮", "php"),
    tech("Go", (0x00, 0xAD, 0xD8), "🐹", "go"),
    tech("Spring", (0x6D, 0xB3, 0x3F), "🌱", "java"),
    tech(".NET", (0x51, 0x2B, 0xD4), "🔷", "csharp"),
    tech("Java", (0x00, 0x73, 0x96), "☕", "java"),
    tech("Kotlin", (0x00, 0x95, 0xD5), "🏔", "kotlin"),
    // JavaScript libraries
    tech("Redux", (0x76, 0x4A, 0xBC), "🌀", "javascript"),
    tech("jQuery", (0x07, 0x69, 0xAD), "💲", "javascript"),
    tech("Lodash", (0x34, 0x92, 0xFF), "⛏", "javascript"),
    tech("Axios", (0x5A, 0x29, 0xE4), "📡", "javascript"),
    tech("Vite", (0x64, 0x6C, 0xFF), "⚡", "javascript"),
    tech("Webpack", (0x8D, 0xD6, 0xF9), "📦", "javascript"),
    // React libraries
    tech("Chakra UI", (0x31, 0x97, 0x95), "🪷", "javascript"),
    tech("Storybook", (0xFF, 0x47, 0x85), "📖", "javascript"),
    tech("React Query", (0xFF, 0x41, 0x54), "🔄", "javascript"),
    tech("NextAuth.js", (0x00, 0x00, 0x00), "🛡", "javascript"),
    // Databases
    tech("MongoDB", (0x47, 0xA2, 0x48), "🍃", "json"),
    tech("Firebase", (0xFF, 0xCA, 0x28), "🔥", "javascript"),
];

/// Case-insensitive lookup; the detail view matches stored tag names
/// against the registry without normalising case.
pub fn find(name: &str) -> Option<&'static Technology> {
    TECHNOLOGIES
        .iter()
        .find(|tech| tech.name.eq_ignore_ascii_case(name))
}

/// Syntax language for a post: the first selected technology known to the
/// registry decides, defaulting to plain text.
pub fn language_for(names: &[String]) -> &'static str {
    names
        .iter()
        .find_map(|name| find(name))
        .map(|tech| tech.language)
        .unwrap_or("plaintext")
}

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "svg", "webp"];

pub fn file_extension(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

pub fn is_image_file(file_name: &str) -> bool {
    file_extension(file_name)
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Editor language for a file name, from the fixed extension table.
pub fn language_for_file(file_name: &str) -> &'static str {
    match file_extension(file_name).as_deref() {
        Some("js") | Some("jsx") => "javascript",
        Some("ts") | Some("tsx") => "typescript",
        Some("html") => "html",
        Some("css") => "css",
        Some("json") => "json",
        Some("py") => "python",
        Some("java") => "java",
        Some("go") => "go",
        _ => "plaintext",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(find("react").map(|t| t.name), Some("React"));
        assert_eq!(find("RUBY ON RAILS").map(|t| t.name), Some("Ruby on Rails"));
        assert!(find("COBOL").is_none());
    }

    #[test]
    fn post_language_follows_first_known_technology() {
        let tags = vec!["made-up".to_string(), "Django".to_string(), "Go".to_string()];
        assert_eq!(language_for(&tags), "python");
        assert_eq!(language_for(&[]), "plaintext");
    }

    #[test]
    fn file_extensions_route_to_languages() {
        assert_eq!(language_for_file("main.go"), "go");
        assert_eq!(language_for_file("App.TSX"), "typescript");
        assert_eq!(language_for_file("build.zig"), "plaintext");
        assert_eq!(language_for_file("Makefile"), "plaintext");
    }

    #[test]
    fn image_extensions_are_detected() {
        assert!(is_image_file("logo.PNG"));
        assert!(is_image_file("photo.webp"));
        assert!(!is_image_file("main.go"));
        assert!(!is_image_file("noextension"));
    }
}
