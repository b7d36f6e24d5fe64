//! Source of the default settings file used on first run.

/// Default `settings.xml` compiled into the binary.
pub const BUNDLED_SETTINGS: &str = include_str!("../../../resources/settings.xml");

/// Supplies the contents written when no settings file exists yet.
///
/// Returning `None` means no default is available and provisioning fails.
#[cfg_attr(test, mockall::automock)]
pub trait DefaultResource {
    fn contents(&self) -> Option<Vec<u8>>;
}

/// The compiled-in default, [`BUNDLED_SETTINGS`].
#[derive(Debug, Default, Clone, Copy)]
pub struct BundledSettings;

impl DefaultResource for BundledSettings {
    fn contents(&self) -> Option<Vec<u8>> {
        Some(BUNDLED_SETTINGS.as_bytes().to_vec())
    }
}

/// No default at all; provisioning always fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDefault;

impl DefaultResource for NoDefault {
    fn contents(&self) -> Option<Vec<u8>> {
        None
    }
}
