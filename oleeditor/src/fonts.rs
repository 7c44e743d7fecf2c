//! System font discovery for the hex view.

use crate::hexlayout::PREFERRED_FAMILIES;
use eframe::egui;
use font_kit::family_name::FamilyName;
use font_kit::handle::Handle;
use font_kit::properties::Properties;
use font_kit::source::SystemSource;
use std::sync::Arc;

/// Where font files come from
pub trait FontSource {
    /// Raw font file and face index of the family, if installed
    fn load(&self, family: &str) -> Option<(Vec<u8>, u32)>;
}

/// Fonts installed on this machine
pub struct SystemFonts {
    source: SystemSource,
}

impl SystemFonts {
    pub fn new() -> Self {
        Self {
            source: SystemSource::new(),
        }
    }
}

impl Default for SystemFonts {
    fn default() -> Self {
        Self::new()
    }
}

impl FontSource for SystemFonts {
    fn load(&self, family: &str) -> Option<(Vec<u8>, u32)> {
        let handle = self
            .source
            .select_best_match(&[FamilyName::Title(family.to_string())], &Properties::new())
            .ok()?;

        match handle {
            Handle::Path { path, font_index } => match std::fs::read(&path) {
                Ok(data) => Some((data, font_index)),
                Err(err) => {
                    log::warn!("Failed to read font '{}': {err}", path.display());
                    None
                }
            },
            Handle::Memory { bytes, font_index } => Some((bytes.to_vec(), font_index)),
        }
    }
}

/// Register the first preferred monospace family found in `source` under its own
/// name, with egui's monospace fonts behind it as fallback. Returns the family name.
pub fn install_preferred_font(
    defs: &mut egui::FontDefinitions,
    source: &impl FontSource,
) -> Option<&'static str> {
    let (name, data, index) = PREFERRED_FAMILIES
        .iter()
        .find_map(|&name| source.load(name).map(|(data, index)| (name, data, index)))?;

    let mut font_data = egui::FontData::from_owned(data);
    font_data.index = index;
    defs.font_data.insert(name.to_owned(), Arc::new(font_data));

    let mut chain = vec![name.to_owned()];
    if let Some(fallback) = defs.families.get(&egui::FontFamily::Monospace) {
        chain.extend(fallback.iter().cloned());
    }
    defs.families.insert(egui::FontFamily::Name(name.into()), chain);

    log::info!("Hex view font: {name}");
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hexlayout::pick_monospace_family;

    /// Source with a fixed set of installed families
    struct FakeFonts(&'static [&'static str]);

    impl FontSource for FakeFonts {
        fn load(&self, family: &str) -> Option<(Vec<u8>, u32)> {
            self.0
                .contains(&family)
                .then(|| (family.as_bytes().to_vec(), 0))
        }
    }

    fn families(defs: &egui::FontDefinitions) -> Vec<egui::FontFamily> {
        defs.families.keys().cloned().collect()
    }

    #[test]
    fn test_install_registers_installed_family() {
        // Arrange
        let mut defs = egui::FontDefinitions::default();

        // Act
        let installed = install_preferred_font(&mut defs, &FakeFonts(&["Courier"]));

        // Assert
        assert_eq!(installed, Some("Courier"));
        assert!(defs.font_data.contains_key("Courier"));
        let chain = defs.families.get(&egui::FontFamily::Name("Courier".into()));
        assert!(chain.is_some_and(|c| {
            c.first().map(String::as_str) == Some("Courier") && c.len() > 1
        }));
        assert_eq!(
            pick_monospace_family(&families(&defs)),
            egui::FontFamily::Name("Courier".into())
        );
    }

    #[test]
    fn test_install_follows_preference_order() {
        let mut defs = egui::FontDefinitions::default();

        let source = FakeFonts(&["Courier", "TypeWriter"]);
        let installed = install_preferred_font(&mut defs, &source);

        assert_eq!(installed, Some("TypeWriter"));
        assert!(!defs.font_data.contains_key("Courier"));
        assert_eq!(
            pick_monospace_family(&families(&defs)),
            egui::FontFamily::Name("TypeWriter".into())
        );
    }

    #[test]
    fn test_install_without_preferred_fonts_keeps_defaults() {
        // Arrange
        let mut defs = egui::FontDefinitions::default();
        let before = families(&defs);

        // Act
        let installed = install_preferred_font(&mut defs, &FakeFonts(&["Arial"]));

        // Assert
        assert_eq!(installed, None);
        assert_eq!(families(&defs), before);
        assert_eq!(pick_monospace_family(&before), egui::FontFamily::Monospace);
    }
}
